//! Image buffers with selectable channel precision.
//!
//! The renderer works in linear RGB `Vec3` values; the film decides how
//! they are stored. F32 is the preferred accumulation storage. U8 is the
//! accepted fallback when the host reports no float-buffer capability:
//! values quantize on every write, which degrades convergence quality
//! but keeps every contract intact.

use glam::Vec3;

/// Channel storage precision for a film.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// 32-bit float RGB (half-float capability also maps here on CPU).
    F32,
    /// 8-bit RGB fallback, quantized linear storage.
    U8,
}

enum Storage {
    F32(Vec<f32>),
    U8(Vec<u8>),
}

/// A width x height RGB image that can be written then read back.
pub struct Film {
    width: u32,
    height: u32,
    storage: Storage,
}

impl Film {
    /// Create a film cleared to black.
    pub fn new(width: u32, height: u32, precision: Precision) -> Self {
        let len = (width as usize) * (height as usize) * 3;
        let storage = match precision {
            Precision::F32 => Storage::F32(vec![0.0; len]),
            Precision::U8 => Storage::U8(vec![0; len]),
        };
        Self {
            width,
            height,
            storage,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn precision(&self) -> Precision {
        match self.storage {
            Storage::F32(_) => Precision::F32,
            Storage::U8(_) => Precision::U8,
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        ((y * self.width + x) as usize) * 3
    }

    /// Read the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        let i = self.offset(x, y);
        match &self.storage {
            Storage::F32(data) => Vec3::new(data[i], data[i + 1], data[i + 2]),
            Storage::U8(data) => {
                Vec3::new(data[i] as f32, data[i + 1] as f32, data[i + 2] as f32) / 255.0
            }
        }
    }

    /// Write the pixel at (x, y). U8 storage clamps and quantizes.
    pub fn set(&mut self, x: u32, y: u32, color: Vec3) {
        let i = self.offset(x, y);
        match &mut self.storage {
            Storage::F32(data) => {
                data[i] = color.x;
                data[i + 1] = color.y;
                data[i + 2] = color.z;
            }
            Storage::U8(data) => {
                let q = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
                data[i] = q.x as u8;
                data[i + 1] = q.y as u8;
                data[i + 2] = q.z as u8;
            }
        }
    }

    /// Convert to tightly packed RGBA bytes for display.
    ///
    /// No transfer function is applied here; the engine writes
    /// display-ready values into its output film.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let c = (self.get(x, y).clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
                bytes.extend_from_slice(&[c.x as u8, c.y as u8, c.z as u8, 255]);
            }
        }
        bytes
    }

    /// Raw little-endian byte view of F32 storage for host upload.
    ///
    /// Returns `None` for U8 storage, where `to_rgba8` is the upload path.
    pub fn as_f32_bytes(&self) -> Option<&[u8]> {
        match &self.storage {
            Storage::F32(data) => Some(bytemuck::cast_slice(data)),
            Storage::U8(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_round_trip_is_exact() {
        let mut film = Film::new(4, 3, Precision::F32);
        let c = Vec3::new(0.125, 1.75, -0.5);
        film.set(2, 1, c);
        assert_eq!(film.get(2, 1), c);
        // Other pixels untouched
        assert_eq!(film.get(0, 0), Vec3::ZERO);
    }

    #[test]
    fn test_u8_round_trip_quantizes() {
        let mut film = Film::new(2, 2, Precision::U8);
        film.set(1, 1, Vec3::new(0.2, 0.4, 0.9));
        let got = film.get(1, 1);
        assert!((got - Vec3::new(0.2, 0.4, 0.9)).abs().max_element() <= 0.5 / 255.0 + 1e-6);
        // Out-of-range values clamp instead of wrapping
        film.set(0, 0, Vec3::new(2.0, -1.0, 0.5));
        let clamped = film.get(0, 0);
        assert_eq!(clamped.x, 1.0);
        assert_eq!(clamped.y, 0.0);
    }

    #[test]
    fn test_to_rgba8_layout() {
        let mut film = Film::new(2, 1, Precision::F32);
        film.set(0, 0, Vec3::new(1.0, 0.0, 0.0));
        film.set(1, 0, Vec3::new(0.0, 1.0, 0.0));
        let bytes = film.to_rgba8();
        assert_eq!(bytes, vec![255, 0, 0, 255, 0, 255, 0, 255]);
    }

    #[test]
    fn test_f32_byte_view() {
        let film = Film::new(2, 2, Precision::F32);
        let bytes = film.as_f32_bytes().unwrap();
        assert_eq!(bytes.len(), 2 * 2 * 3 * 4);

        let u8_film = Film::new(2, 2, Precision::U8);
        assert!(u8_film.as_f32_bytes().is_none());
    }

    #[test]
    fn test_single_pixel_film() {
        let mut film = Film::new(1, 1, Precision::F32);
        film.set(0, 0, Vec3::splat(0.5));
        assert_eq!(film.to_rgba8().len(), 4);
    }
}
