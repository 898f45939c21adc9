use manga_fx::capture::save_capture;
use manga_fx::config::filter::{self, EffectConfig};
use manga_fx::cpu::{CpuExecutor, CpuImagePool};
use manga_fx::effects::{
    ApplyOutcome, DepthOutlineEffect, Effect, NormalDepthOutlineEffect, OutlineEffect,
    SharpnessEffect, SobelAngleEffect,
};
use manga_fx::image::io::{load_rgba_image, load_texture, save_rgba_png, write_json_file};
use manga_fx::image::ImageRgbaF32;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = filter::load_config(Path::new(&config_path))?;

    let source = load_rgba_image(&config.input)?;
    let mut destination = ImageRgbaF32::with_format(source.w, source.h, source.format);
    let mut exec = CpuExecutor::with_camera(config.camera.load()?);
    let mut pool = CpuImagePool::new();

    let outcome = match &config.effect {
        EffectConfig::Outline(params) => apply_once(
            OutlineEffect::default(),
            params,
            &source,
            &mut destination,
            &mut exec,
            &mut pool,
        ),
        EffectConfig::DepthOutline(params) => apply_once(
            DepthOutlineEffect::default(),
            params,
            &source,
            &mut destination,
            &mut exec,
            &mut pool,
        ),
        EffectConfig::NormalDepthOutline(params) => {
            let mut params = params.clone();
            if let Some(path) = &config.distortion_texture {
                params.distortion_texture = Some(load_texture(path)?);
            }
            apply_once(
                NormalDepthOutlineEffect::default(),
                &params,
                &source,
                &mut destination,
                &mut exec,
                &mut pool,
            )
        }
        EffectConfig::SobelAngle(params) => apply_once(
            SobelAngleEffect::default(),
            params,
            &source,
            &mut destination,
            &mut exec,
            &mut pool,
        ),
        EffectConfig::Sharpness(params) => apply_once(
            SharpnessEffect::default(),
            params,
            &source,
            &mut destination,
            &mut exec,
            &mut pool,
        ),
    }?;

    match &outcome {
        ApplyOutcome::Rendered(trace) => println!(
            "{}: rendered {}x{} in {:.3} ms",
            config.effect.kind(),
            trace.width,
            trace.height,
            trace.total_ms
        ),
        ApplyOutcome::PassThrough(reason) => {
            println!("{}: pass-through ({reason:?})", config.effect.kind())
        }
    }

    save_rgba_png(&destination, &config.output.image)?;
    println!("Saved frame to {}", config.output.image.display());

    if let Some(path) = &config.output.trace_json {
        write_json_file(path, &outcome)?;
        println!("Trace written to {}", path.display());
    }
    if let Some(dir) = &config.output.capture_dir {
        let path = save_capture(&destination, dir, config.effect.kind())?;
        println!("Capture written to {}", path.display());
    }
    Ok(())
}

fn apply_once<F: Effect>(
    mut effect: F,
    params: &F::Params,
    source: &ImageRgbaF32,
    destination: &mut ImageRgbaF32,
    exec: &mut CpuExecutor,
    pool: &mut CpuImagePool,
) -> Result<ApplyOutcome, String> {
    effect
        .apply(source, destination, params, exec, pool)
        .map_err(|e| format!("{} effect failed: {e}", effect.name()))
}

fn usage() -> String {
    "Usage: filter_demo <config.json>".to_string()
}
