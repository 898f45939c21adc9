use manga_fx::capture::{save_capture, DEFAULT_CAPTURE_PREFIX};
use manga_fx::config::manga;
use manga_fx::cpu::{CpuExecutor, CpuImagePool, PoolStats};
use manga_fx::effects::{ApplyOutcome, Effect, MangaEffect};
use manga_fx::image::io::{load_rgba_image, save_rgba_png, write_json_file};
use manga_fx::image::ImageRgbaF32;
use serde::Serialize;
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
    let config = manga::load_config(Path::new(&config_path))?;
    let params = config.resolve_params()?;

    let source = load_rgba_image(&config.input)?;
    let mut destination = ImageRgbaF32::with_format(source.w, source.h, source.format);
    let mut exec = CpuExecutor::new();
    let mut pool = CpuImagePool::new();
    let mut effect = MangaEffect::new(config.program.clone());

    let mut frames = Vec::with_capacity(config.frames.max(1));
    for _ in 0..config.frames.max(1) {
        let outcome = effect
            .apply(&source, &mut destination, &params, &mut exec, &mut pool)
            .map_err(|e| format!("Manga effect failed: {e}"))?;
        frames.push(outcome);
    }

    print_summary(&frames, &exec, pool.stats());

    save_rgba_png(&destination, &config.output.image)?;
    println!("Saved frame to {}", config.output.image.display());

    if let Some(path) = &config.output.trace_json {
        let report = DemoReport {
            width: source.w,
            height: source.h,
            program: config.program.as_ref().map(|p| p.to_string()),
            frames,
            passes_run: exec.passes_run(),
            bindings_created: exec.bindings_created(),
            pool: pool.stats(),
        };
        write_json_file(path, &report)?;
        println!("Trace written to {}", path.display());
    }

    if let Some(dir) = &config.output.capture_dir {
        let path = save_capture(&destination, dir, DEFAULT_CAPTURE_PREFIX)?;
        println!("Capture written to {}", path.display());
    }

    Ok(())
}

fn print_summary(frames: &[ApplyOutcome], exec: &CpuExecutor, pool: PoolStats) {
    for (i, outcome) in frames.iter().enumerate() {
        match outcome {
            ApplyOutcome::Rendered(trace) => {
                println!("frame {i}: rendered in {:.3} ms", trace.total_ms);
                for stage in &trace.stages {
                    println!(
                        "  {:<20} pass={} {:.3} ms",
                        stage.label,
                        stage
                            .pass
                            .map(|p| p.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        stage.elapsed_ms
                    );
                }
            }
            ApplyOutcome::PassThrough(reason) => {
                println!("frame {i}: pass-through ({reason:?})");
            }
        }
    }
    println!(
        "passes={} bindings={} scratch acquired={} released={} peak_live={}",
        exec.passes_run(),
        exec.bindings_created(),
        pool.acquired,
        pool.released,
        pool.peak_live
    );
}

fn usage() -> String {
    "Usage: manga_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoReport {
    width: usize,
    height: usize,
    program: Option<String>,
    frames: Vec<ApplyOutcome>,
    passes_run: usize,
    bindings_created: usize,
    pool: PoolStats,
}
