//! Progressive accumulation across frames.
//!
//! A two-slot film arena holds the running average of path-traced
//! sample frames. Exactly one slot is current (the read source) while
//! the other is the target (the write destination); the roles flip
//! after every integrated frame, so no film is ever read and written in
//! the same pass.

use glam::Vec3;

use crate::film::{Film, Precision};

/// Ping-pong accumulation buffer with a frame counter.
pub struct Accumulator {
    films: [Film; 2],
    current: usize,
    frame: u32,
}

impl Accumulator {
    /// Create an accumulator for the given resolution and storage.
    pub fn new(width: u32, height: u32, precision: Precision) -> Self {
        Self {
            films: [
                Film::new(width, height, precision),
                Film::new(width, height, precision),
            ],
            current: 0,
            frame: 0,
        }
    }

    /// Number of frames folded into the current average.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// The film holding the most recently written average.
    pub fn current(&self) -> &Film {
        &self.films[self.current]
    }

    /// Drop the accumulated history.
    ///
    /// Film contents are left stale; they are overwritten before the
    /// next read because frame 0 ignores the previous average.
    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// Reallocate both slots for a new resolution or storage precision.
    pub fn reallocate(&mut self, width: u32, height: u32, precision: Precision) {
        self.films = [
            Film::new(width, height, precision),
            Film::new(width, height, precision),
        ];
        self.current = 0;
        self.frame = 0;
    }

    /// Fold one new sample frame into the running average.
    ///
    /// Writes `(prev * frame + sample) / (frame + 1)` per pixel into the
    /// target slot, flips the slots, and advances the counter. The
    /// streaming mean is numerically stabler over long runs than
    /// keeping a growing sum.
    pub fn integrate(&mut self, samples: &[Vec3]) -> &Film {
        let width = self.films[0].width();
        let height = self.films[0].height();
        debug_assert_eq!(samples.len(), (width * height) as usize);

        let n = self.frame as f32;
        let first = self.frame == 0;
        let inv = 1.0 / (n + 1.0);
        let (cur, tgt) = self.split_slots();

        let mut i = 0;
        for y in 0..height {
            for x in 0..width {
                let avg = if first {
                    samples[i]
                } else {
                    (cur.get(x, y) * n + samples[i]) * inv
                };
                tgt.set(x, y, avg);
                i += 1;
            }
        }

        self.current ^= 1;
        self.frame += 1;
        self.current()
    }

    fn split_slots(&mut self) -> (&Film, &mut Film) {
        let (left, right) = self.films.split_at_mut(1);
        if self.current == 0 {
            (&left[0], &mut right[0])
        } else {
            (&right[0], &mut left[0])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(width: u32, height: u32, value: Vec3) -> Vec<Vec3> {
        vec![value; (width * height) as usize]
    }

    #[test]
    fn test_first_frame_passes_through() {
        let mut accum = Accumulator::new(2, 2, Precision::F32);
        let out = accum.integrate(&flat(2, 2, Vec3::splat(0.8)));
        assert_eq!(out.get(0, 0), Vec3::splat(0.8));
        assert_eq!(accum.frame(), 1);
    }

    #[test]
    fn test_streaming_mean_matches_arithmetic_mean() {
        let mut accum = Accumulator::new(1, 1, Precision::F32);
        let values = [0.9, 0.1, 0.5, 0.3, 0.7, 0.2];
        for v in values {
            accum.integrate(&flat(1, 1, Vec3::splat(v)));
        }
        let expected = values.iter().sum::<f32>() / values.len() as f32;
        assert!((accum.current().get(0, 0).x - expected).abs() < 1e-5);
        assert_eq!(accum.frame(), values.len() as u32);
    }

    #[test]
    fn test_slots_alternate() {
        let mut accum = Accumulator::new(1, 1, Precision::F32);
        let first = accum.current;
        accum.integrate(&flat(1, 1, Vec3::ONE));
        assert_ne!(accum.current, first);
        accum.integrate(&flat(1, 1, Vec3::ONE));
        assert_eq!(accum.current, first);
    }

    #[test]
    fn test_reset_restarts_average() {
        let mut accum = Accumulator::new(1, 1, Precision::F32);
        accum.integrate(&flat(1, 1, Vec3::splat(1.0)));
        accum.integrate(&flat(1, 1, Vec3::splat(1.0)));
        accum.reset();
        assert_eq!(accum.frame(), 0);

        // First frame after reset ignores stale history entirely
        let out = accum.integrate(&flat(1, 1, Vec3::splat(0.25)));
        assert_eq!(out.get(0, 0), Vec3::splat(0.25));
    }

    #[test]
    fn test_u8_storage_still_averages() {
        let mut accum = Accumulator::new(1, 1, Precision::U8);
        accum.integrate(&flat(1, 1, Vec3::splat(1.0)));
        accum.integrate(&flat(1, 1, Vec3::splat(0.0)));
        // Quantized halfway point, within a step of 1/255
        let got = accum.current().get(0, 0).x;
        assert!((got - 0.5).abs() < 2.0 / 255.0);
    }

    #[test]
    fn test_reallocate_clears_state() {
        let mut accum = Accumulator::new(2, 2, Precision::F32);
        accum.integrate(&flat(2, 2, Vec3::ONE));
        accum.reallocate(3, 1, Precision::U8);
        assert_eq!(accum.frame(), 0);
        assert_eq!(accum.current().width(), 3);
        assert_eq!(accum.current().precision(), Precision::U8);
    }
}
