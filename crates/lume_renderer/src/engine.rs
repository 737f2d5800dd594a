//! Frame driver and engine facade.
//!
//! The engine owns the film buffers, the orbit camera and the render
//! settings, and exposes the per-frame `render_frame` entry point. Any
//! change that invalidates the accumulated average (camera, scene,
//! sample or bounce counts, mode, resolution) resets the accumulator
//! before the next frame is driven. Pixels are independent, so both
//! render modes fan out over rayon; the accumulation swap is the only
//! join point.

use glam::{Vec2, Vec3};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lume_math::OrbitCamera;
use lume_scene::SceneId;

use crate::accum::Accumulator;
use crate::film::{Film, Precision};
use crate::path;
use crate::shade::{self, tone_map};

/// Which renderer produces the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// Analytic single-bounce shading, a complete image per frame.
    Direct,
    /// Progressive path tracing with cross-frame accumulation.
    PathTraced,
}

/// Scalar render settings resolved by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub mode: RenderMode,
    pub samples_per_pixel: u32,
    pub bounces: u32,
    pub scene: SceneId,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mode: RenderMode::Direct,
            samples_per_pixel: 1,
            bounces: 5,
            scene: SceneId::StaticSpheres,
        }
    }
}

/// Errors for malformed configuration.
///
/// A rejected call leaves the engine state exactly as it was; invalid
/// configuration is never partially applied.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("resolution must be at least 1x1 (got {width}x{height})")]
    ZeroResolution { width: u32, height: u32 },
    #[error("samples per pixel must be positive")]
    ZeroSamples,
    #[error("bounce count must be positive")]
    ZeroBounces,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Informational outcome of buffer allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionStatus {
    /// Float accumulation storage was available and is in use.
    AsRequested,
    /// The host reported no float capability; storage quantizes to 8-bit.
    Downgraded,
}

/// Per-frame output handed to the host.
pub struct Frame<'a> {
    /// Display-ready image; the 2.2 gamma transfer is already applied.
    pub image: &'a Film,
    /// Total accumulated samples per pixel. `None` in direct mode.
    pub samples: Option<u32>,
}

/// Derive the render resolution from the display surface.
///
/// Device pixel ratio clamps at 2.0 and each dimension floors to at
/// least one pixel, so extreme scales still produce a valid image.
pub fn resolve_resolution(
    display_width: f32,
    display_height: f32,
    device_pixel_ratio: f32,
    scale: f32,
) -> (u32, u32) {
    let dpr = device_pixel_ratio.min(2.0);
    let w = ((display_width * dpr * scale).floor() as u32).max(1);
    let h = ((display_height * dpr * scale).floor() as u32).max(1);
    (w, h)
}

/// The dual-mode rendering engine.
pub struct Engine {
    settings: RenderSettings,
    camera: OrbitCamera,
    width: u32,
    height: u32,
    accum: Accumulator,
    display: Film,
    scratch: Vec<Vec3>,
}

impl Engine {
    /// Create an engine with freshly allocated buffers.
    pub fn new(
        width: u32,
        height: u32,
        available: Precision,
        settings: RenderSettings,
    ) -> ConfigResult<Self> {
        validate_resolution(width, height)?;
        validate_settings(&settings)?;
        if available == Precision::U8 {
            log::warn!("float accumulation storage unavailable, falling back to 8-bit");
        }
        log::info!(
            "engine buffers allocated: {}x{} ({:?})",
            width,
            height,
            available
        );
        Ok(Self {
            settings,
            camera: OrbitCamera::default(),
            width,
            height,
            accum: Accumulator::new(width, height, available),
            display: Film::new(width, height, Precision::F32),
            scratch: Vec::new(),
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Frames folded into the current accumulated average.
    pub fn accumulated_frames(&self) -> u32 {
        self.accum.frame()
    }

    /// Reallocate buffers for a new resolution and storage capability.
    ///
    /// Rejects a zero dimension without touching existing buffers.
    /// Returns whether the preferred float storage was honored.
    pub fn configure(
        &mut self,
        width: u32,
        height: u32,
        available: Precision,
    ) -> ConfigResult<PrecisionStatus> {
        validate_resolution(width, height)?;
        self.width = width;
        self.height = height;
        self.accum.reallocate(width, height, available);
        self.display = Film::new(width, height, Precision::F32);
        log::info!("render target resized to {}x{} ({:?})", width, height, available);
        if available == Precision::U8 {
            log::warn!("float accumulation storage unavailable, falling back to 8-bit");
            Ok(PrecisionStatus::Downgraded)
        } else {
            Ok(PrecisionStatus::AsRequested)
        }
    }

    /// Select a scene by index; out-of-range falls back to the last scene.
    pub fn set_scene(&mut self, index: usize) {
        let scene = SceneId::from_index(index);
        if self.settings.scene != scene {
            self.settings.scene = scene;
            self.invalidate("scene");
        }
    }

    /// Switch renderer. Takes effect at the next frame boundary, never
    /// mid-frame.
    pub fn set_mode(&mut self, mode: RenderMode) {
        if self.settings.mode != mode {
            self.settings.mode = mode;
            self.invalidate("mode");
        }
    }

    pub fn set_samples_per_pixel(&mut self, samples: u32) -> ConfigResult<()> {
        if samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.settings.samples_per_pixel != samples {
            self.settings.samples_per_pixel = samples;
            self.invalidate("samples per pixel");
        }
        Ok(())
    }

    pub fn set_bounces(&mut self, bounces: u32) -> ConfigResult<()> {
        if bounces == 0 {
            return Err(ConfigError::ZeroBounces);
        }
        if self.settings.bounces != bounces {
            self.settings.bounces = bounces;
            self.invalidate("bounce count");
        }
        Ok(())
    }

    /// Update the orbit state. Distance and pitch clamp into their legal
    /// ranges before the change comparison.
    pub fn set_camera_orbit(
        &mut self,
        target: Vec3,
        distance: f32,
        yaw: f32,
        pitch: f32,
        fov_y: f32,
    ) {
        let camera = OrbitCamera::new(target, distance, yaw, pitch, fov_y);
        if self.camera != camera {
            self.camera = camera;
            self.invalidate("camera");
        }
    }

    /// Restore the home view.
    pub fn reset_camera(&mut self) {
        let camera = OrbitCamera::default();
        if self.camera != camera {
            self.camera = camera;
            self.invalidate("camera reset");
        }
    }

    /// Render one frame at the given scene time.
    ///
    /// Returns the display film and, in path mode, the total accumulated
    /// sample count per pixel.
    pub fn render_frame(&mut self, time: f32) -> Frame<'_> {
        match self.settings.mode {
            RenderMode::Direct => self.render_direct(time),
            RenderMode::PathTraced => self.render_path(time),
        }
    }

    fn render_direct(&mut self, time: f32) -> Frame<'_> {
        let basis = self.camera.basis();
        let tan_half_fov = (0.5 * self.camera.fov_y).tan();
        let (w, h) = (self.width, self.height);
        let scene = self.settings.scene;

        (0..w * h)
            .into_par_iter()
            .map(|i| {
                let (x, y) = (i % w, i / w);
                let ndc = pixel_ndc(x, y, w, h, Vec2::splat(0.5));
                let ray = basis.ray_through(ndc, tan_half_fov);
                tone_map(shade::trace(&ray, scene, time))
            })
            .collect_into_vec(&mut self.scratch);

        blit(&self.scratch, &mut self.display);
        Frame {
            image: &self.display,
            samples: None,
        }
    }

    fn render_path(&mut self, time: f32) -> Frame<'_> {
        let basis = self.camera.basis();
        let tan_half_fov = (0.5 * self.camera.fov_y).tan();
        let (w, h) = (self.width, self.height);
        let scene = self.settings.scene;
        let spp = self.settings.samples_per_pixel;
        let bounces = self.settings.bounces;
        let frame_index = self.accum.frame();

        (0..w * h)
            .into_par_iter()
            .map(|i| {
                let (x, y) = (i % w, i / w);
                let mut rng = path::pixel_rng(x, y, frame_index);
                let mut radiance = Vec3::ZERO;
                for _ in 0..spp {
                    let jitter = Vec2::new(rng.gen::<f32>(), rng.gen::<f32>());
                    let ndc = pixel_ndc(x, y, w, h, jitter);
                    let ray = basis.ray_through(ndc, tan_half_fov);
                    radiance += path::sample(ray, scene, time, bounces, &mut rng);
                }
                radiance / spp as f32
            })
            .collect_into_vec(&mut self.scratch);

        let average = self.accum.integrate(&self.scratch);
        for y in 0..h {
            for x in 0..w {
                self.display.set(x, y, tone_map(average.get(x, y)));
            }
        }

        Frame {
            image: &self.display,
            samples: Some(self.accum.frame() * spp),
        }
    }

    fn invalidate(&mut self, why: &str) {
        log::debug!("accumulation reset: {} changed", why);
        self.accum.reset();
    }
}

fn validate_resolution(width: u32, height: u32) -> ConfigResult<()> {
    if width == 0 || height == 0 {
        return Err(ConfigError::ZeroResolution { width, height });
    }
    Ok(())
}

fn validate_settings(settings: &RenderSettings) -> ConfigResult<()> {
    if settings.samples_per_pixel == 0 {
        return Err(ConfigError::ZeroSamples);
    }
    if settings.bounces == 0 {
        return Err(ConfigError::ZeroBounces);
    }
    Ok(())
}

/// Image-plane coordinates of a pixel sample: offset from the image
/// center divided by height, y up.
fn pixel_ndc(x: u32, y: u32, width: u32, height: u32, jitter: Vec2) -> Vec2 {
    let px = x as f32 + jitter.x;
    let py = y as f32 + jitter.y;
    Vec2::new(px - 0.5 * width as f32, 0.5 * height as f32 - py) / height as f32
}

fn blit(pixels: &[Vec3], film: &mut Film) {
    let (w, h) = (film.width(), film.height());
    let mut i = 0;
    for y in 0..h {
        for x in 0..w {
            film.set(x, y, pixels[i]);
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(mode: RenderMode) -> Engine {
        let settings = RenderSettings {
            mode,
            samples_per_pixel: 2,
            bounces: 3,
            ..Default::default()
        };
        Engine::new(16, 12, Precision::F32, settings).unwrap()
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        assert_eq!(
            Engine::new(0, 10, Precision::F32, RenderSettings::default()).err(),
            Some(ConfigError::ZeroResolution {
                width: 0,
                height: 10
            })
        );

        let mut e = engine(RenderMode::Direct);
        assert_eq!(e.set_samples_per_pixel(0), Err(ConfigError::ZeroSamples));
        assert_eq!(e.set_bounces(0), Err(ConfigError::ZeroBounces));
        assert_eq!(
            e.configure(5, 0, Precision::F32),
            Err(ConfigError::ZeroResolution {
                width: 5,
                height: 0
            })
        );
        // Prior state survives the rejected calls
        assert_eq!(e.settings().samples_per_pixel, 2);
        assert_eq!(e.settings().bounces, 3);
        assert_eq!(e.display.width(), 16);
    }

    #[test]
    fn test_direct_mode_is_deterministic() {
        let mut e = engine(RenderMode::Direct);
        let first = e.render_frame(0.0).image.to_rgba8();
        let second = e.render_frame(0.0).image.to_rgba8();
        assert_eq!(first, second);
        assert!(e.render_frame(0.0).samples.is_none());
    }

    #[test]
    fn test_path_mode_reports_sample_counts() {
        let mut e = engine(RenderMode::PathTraced);
        for k in 1..=4 {
            let frame = e.render_frame(0.0);
            assert_eq!(frame.samples, Some(k * 2));
        }
    }

    #[test]
    fn test_path_frames_are_decorrelated() {
        // Re-rendering the same accumulation frame index reproduces it
        // exactly, while the next frame draws different samples.
        let mut a = engine(RenderMode::PathTraced);
        let mut b = engine(RenderMode::PathTraced);
        let first_a = a.render_frame(0.0).image.to_rgba8();
        let first_b = b.render_frame(0.0).image.to_rgba8();
        assert_eq!(first_a, first_b);

        let second_a = a.render_frame(0.0).image.to_rgba8();
        assert_ne!(first_a, second_a);
    }

    #[test]
    fn test_every_invalidating_call_resets_accumulation() {
        let cases: Vec<(&str, Box<dyn Fn(&mut Engine)>)> = vec![
            ("scene", Box::new(|e: &mut Engine| e.set_scene(1))),
            (
                "mode",
                Box::new(|e: &mut Engine| e.set_mode(RenderMode::Direct)),
            ),
            (
                "samples",
                Box::new(|e: &mut Engine| e.set_samples_per_pixel(7).unwrap()),
            ),
            ("bounces", Box::new(|e: &mut Engine| e.set_bounces(9).unwrap())),
            (
                "camera",
                Box::new(|e: &mut Engine| {
                    e.set_camera_orbit(Vec3::ZERO, 8.0, 1.0, 0.2, 1.0)
                }),
            ),
            ("camera reset", Box::new(|e: &mut Engine| {
                e.set_camera_orbit(Vec3::ZERO, 8.0, 1.0, 0.2, 1.0);
                e.reset_camera();
            })),
            (
                "resolution",
                Box::new(|e: &mut Engine| {
                    e.configure(8, 8, Precision::F32).unwrap();
                }),
            ),
        ];

        for (name, change) in cases {
            let mut e = engine(RenderMode::PathTraced);
            e.render_frame(0.0);
            e.render_frame(0.0);
            assert_eq!(e.accumulated_frames(), 2, "{}", name);
            change(&mut e);
            assert_eq!(e.accumulated_frames(), 0, "{} must reset", name);
            let mode = e.settings.mode;
            let spp = e.settings.samples_per_pixel;
            let frame = e.render_frame(0.0);
            if mode == RenderMode::PathTraced {
                assert_eq!(frame.samples, Some(spp), "{}", name);
            }
        }
    }

    #[test]
    fn test_unchanged_setter_keeps_accumulation() {
        let mut e = engine(RenderMode::PathTraced);
        e.render_frame(0.0);
        e.render_frame(0.0);

        e.set_scene(0);
        e.set_mode(RenderMode::PathTraced);
        e.set_samples_per_pixel(2).unwrap();
        e.set_bounces(3).unwrap();
        let cam = *e.camera();
        e.set_camera_orbit(cam.target, cam.distance, cam.yaw, cam.pitch, cam.fov_y);

        assert_eq!(e.accumulated_frames(), 2);
    }

    #[test]
    fn test_one_by_one_resolution() {
        let mut e = engine(RenderMode::PathTraced);
        e.configure(1, 1, Precision::F32).unwrap();
        let frame = e.render_frame(0.0);
        assert_eq!(frame.image.width(), 1);
        assert_eq!(frame.image.to_rgba8().len(), 4);

        e.set_mode(RenderMode::Direct);
        let frame = e.render_frame(0.0);
        assert_eq!(frame.image.to_rgba8().len(), 4);
    }

    #[test]
    fn test_precision_downgrade_is_reported_not_fatal() {
        let mut e = engine(RenderMode::PathTraced);
        let status = e.configure(8, 6, Precision::U8).unwrap();
        assert_eq!(status, PrecisionStatus::Downgraded);

        // Rendering keeps working on the degraded storage
        let frame = e.render_frame(0.0);
        assert_eq!(frame.samples, Some(2));

        let mut e = engine(RenderMode::PathTraced);
        assert_eq!(
            e.configure(8, 6, Precision::F32).unwrap(),
            PrecisionStatus::AsRequested
        );
    }

    #[test]
    fn test_scene_fallback_index() {
        let mut e = engine(RenderMode::Direct);
        e.set_scene(99);
        assert_eq!(e.settings().scene, SceneId::OrbitRing);
    }

    #[test]
    fn test_resolve_resolution_policy() {
        // DPR clamps at 2.0
        assert_eq!(resolve_resolution(100.0, 50.0, 3.0, 1.0), (200, 100));
        assert_eq!(resolve_resolution(100.0, 50.0, 1.5, 1.0), (150, 75));
        // Scale applies after DPR
        assert_eq!(resolve_resolution(100.0, 50.0, 1.0, 0.5), (50, 25));
        // Dimensions floor to at least one pixel
        assert_eq!(resolve_resolution(3.0, 3.0, 1.0, 0.1), (1, 1));
    }

    #[test]
    fn test_mode_switch_direct_to_path_starts_fresh() {
        let mut e = engine(RenderMode::Direct);
        e.render_frame(0.0);
        e.set_mode(RenderMode::PathTraced);
        let frame = e.render_frame(0.0);
        assert_eq!(frame.samples, Some(2));
    }
}
