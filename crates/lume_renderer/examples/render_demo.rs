//! Dual-mode render example.
//!
//! Renders every built-in scene once in direct mode, then accumulates a
//! path-traced image of the default scene, saving PNGs.

use anyhow::{Context, Result};
use lume_renderer::{Engine, Film, Precision, RenderMode, RenderSettings, SceneId};

fn main() -> Result<()> {
    env_logger::init();

    println!("Lume Renderer - Dual-Mode Example");
    println!("=================================");

    let mut engine = Engine::new(640, 360, Precision::F32, RenderSettings::default())?;

    // Direct mode: one complete image per scene
    for scene in SceneId::ALL {
        engine.set_scene(scene.index());
        let start = std::time::Instant::now();
        let frame = engine.render_frame(1.0);
        println!("Direct {:?} rendered in {:?}", scene, start.elapsed());

        let filename = format!("direct_{}.png", scene.index());
        save_png(frame.image, &filename)?;
        println!("Saved to {}", filename);
    }

    // Path mode: accumulate the default scene for a while
    engine.set_scene(0);
    engine.set_mode(RenderMode::PathTraced);
    engine.set_samples_per_pixel(4)?;
    engine.set_bounces(5)?;

    let start = std::time::Instant::now();
    let frames = 32;
    for _ in 0..frames - 1 {
        engine.render_frame(1.0);
    }
    let frame = engine.render_frame(1.0);
    println!(
        "Path traced {} frames ({} samples/pixel) in {:?}",
        frames,
        frame.samples.unwrap_or(0),
        start.elapsed()
    );

    save_png(frame.image, "path_traced.png")?;
    println!("Saved to path_traced.png");

    Ok(())
}

fn save_png(film: &Film, filename: &str) -> Result<()> {
    let img = image::RgbaImage::from_raw(film.width(), film.height(), film.to_rgba8())
        .context("display film size mismatch")?;
    img.save(filename)
        .with_context(|| format!("failed to save {}", filename))?;
    Ok(())
}
