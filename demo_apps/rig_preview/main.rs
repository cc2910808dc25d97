//! Builds a three-part rig (body, swaying tail, wiggling head), keys a bounce
//! and a sway at frame 0 and writes the first two seconds as PNG frames.
//!
//! ```text
//! rig_preview [OUTPUT_DIR] [SETTINGS_JSON]
//! ```

use std::path::PathBuf;

use anyhow::Context;
use image::{Rgba, RgbaImage};

use puppet::{ColorClipping, Engine, EngineSettings, MotionType, SwayExtent, Vec2, WiggleParam};

/// Filled ellipse on a transparent background.
fn blob(width: u32, height: u32, color: [u8; 3]) -> RgbaImage {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    RgbaImage::from_fn(width, height, |x, y| {
        let dx = (x as f32 + 0.5 - cx) / cx;
        let dy = (y as f32 + 0.5 - cy) / cy;
        if dx * dx + dy * dy <= 1.0 {
            Rgba([color[0], color[1], color[2], 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Vertical stripes, used as the clipped pattern on the body.
fn stripes(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if (x / 12) % 2 == 0 {
            Rgba([255, 255, 255, 160])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "rig_preview_frames".into()));
    let settings = match args.next() {
        Some(path) => EngineSettings::load(&path).with_context(|| format!("loading {path}"))?,
        None => EngineSettings {
            canvas_width: 640,
            canvas_height: 480,
            background: [32, 32, 48, 255],
            ..Default::default()
        },
    };
    std::fs::create_dir_all(&out_dir)?;

    let mut engine = Engine::new(settings);
    let scene = &mut engine.scene;

    // === 1. Rig ===
    let body = scene
        .build_layer("body")
        .with_image(blob(160, 220, [220, 120, 60]))
        .with_bounce()
        .with_position(320.0, 300.0)
        .with_anchor(0.5, 1.0)
        .build();

    let head = scene
        .build_layer("head")
        .with_image(blob(110, 100, [240, 200, 150]))
        .with_position(0.0, -150.0)
        .with_parent(body)
        .build();

    let tail = scene
        .build_layer("tail")
        .with_image(blob(40, 160, [180, 90, 40]))
        .with_bounce()
        .with_position(90.0, 40.0)
        .with_rotation(-30.0)
        .with_anchor(0.5, 1.0)
        .with_parent(body)
        .build();

    let pattern = scene
        .build_layer("pattern")
        .with_image(stripes(160, 220))
        .with_position(320.0, 300.0)
        .build();

    // === 2. Motion ===
    scene.insert_keyframe(body)?;

    if let Some(params) = scene.layer_mut(tail).and_then(|l| l.bounce_mut()) {
        params.settings.motion_type = MotionType::Sway;
        params.settings.sway_amplitude = 60.0;
        params.settings.sway_extent = SwayExtent::Up;
    }
    scene.add_pin(tail, 70.0, 15.0)?;
    scene.insert_keyframe(tail)?;

    scene.enable_wiggle(head, 0.25)?;
    scene.set_wiggle_param(head, WiggleParam::AmplitudeX(3.0))?;
    scene.set_wiggle_param(head, WiggleParam::DecayEnabled(true))?;

    // === 3. Clip the stripes to the body silhouette ===
    scene.set_color_clipping(pattern, ColorClipping::new(body))?;
    scene.set_anchor(pattern, Vec2::new(0.5, 0.5))?;

    // === 4. Export ===
    let frames = (engine.settings().fps * 2.0).round() as u32;
    engine.export(frames, |index, frame| {
        let path = out_dir.join(format!("frame_{index:04}.png"));
        frame.save(&path)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    })?;

    log::info!("Wrote {frames} frames to {}", out_dir.display());
    Ok(())
}
