mod common;

use common::init_logging;
use common::recording::{RecordingExecutor, RecordingPool};
use common::synthetic_image::{checkerboard, edge_pixels, flat_gray, vertical_step};
use manga_fx::backend::PassExecutor;
use manga_fx::cpu::{canny, CpuExecutor, CpuImagePool};
use manga_fx::edges::EdgeDetectionPipeline;
use manga_fx::image::ImageRgbaF32;
use manga_fx::params::{BindParams, BlurKind, CannyParams, MangaParams};
use manga_fx::program::{Binding, MangaPass, ProgramPass};
use manga_fx::FxError;

fn manga_binding(exec: &mut impl PassExecutor, params: &MangaParams) -> Binding {
    let mut binding = exec
        .create_binding(&MangaPass::PROGRAM)
        .expect("manga program is built in");
    params.bind(&mut binding);
    binding
}

#[test]
fn detect_edges_releases_every_scratch_image() {
    init_logging();
    let source = checkerboard(48, 32, 8);
    let mut output = ImageRgbaF32::new(48, 32);
    let mut exec = CpuExecutor::new();
    let mut pool = CpuImagePool::new();
    let binding = manga_binding(&mut exec, &MangaParams::default());

    EdgeDetectionPipeline::default()
        .detect_edges(&source, &mut output, &binding, &mut exec, &mut pool)
        .expect("edge detection succeeds");

    let stats = pool.stats();
    assert_eq!(stats.acquired, stats.released);
    assert_eq!(stats.live, 0);
    assert_eq!(stats.peak_live, 2, "only two ping-pong buffers are needed");
    assert_eq!(exec.passes_run(), 6);
}

#[test]
fn scratch_is_released_when_a_pass_fails() {
    init_logging();
    let source = checkerboard(16, 16, 4);
    let mut output = ImageRgbaF32::new(16, 16);
    let mut exec = RecordingExecutor::new();
    exec.fail_on_pass = Some(MangaPass::Gradient.index());
    let mut pool = CpuImagePool::new();
    let binding = manga_binding(&mut exec, &MangaParams::default());

    let err = EdgeDetectionPipeline::default()
        .detect_edges(&source, &mut output, &binding, &mut exec, &mut pool)
        .unwrap_err();
    assert!(matches!(err, FxError::Backend(_)));
    assert_eq!(pool.stats().live, 0);
    assert_eq!(pool.stats().acquired, pool.stats().released);
}

#[test]
fn stages_run_in_order_at_source_resolution() {
    init_logging();
    let (w, h) = (37, 23);
    let source = checkerboard(w, h, 5);
    let mut output = ImageRgbaF32::new(w, h);
    let mut exec = RecordingExecutor::new();
    let mut pool = RecordingPool::new();
    let binding = manga_binding(&mut exec, &MangaParams::default());

    let trace = EdgeDetectionPipeline::default()
        .detect_edges(&source, &mut output, &binding, &mut exec, &mut pool)
        .expect("edge detection succeeds");

    let expected: Vec<usize> = [
        MangaPass::Luminance,
        MangaPass::Blur,
        MangaPass::Gradient,
        MangaPass::MagnitudeThreshold,
        MangaPass::DoubleThreshold,
        MangaPass::Hysteresis,
    ]
    .iter()
    .map(|p| p.index())
    .collect();
    assert_eq!(exec.pass_order(), expected);
    for call in &exec.calls {
        assert_eq!(call.output, (w, h));
        assert_eq!(call.inputs, vec![(w, h)]);
    }
    assert!(pool.acquired_sizes.iter().all(|&size| size == (w, h)));
    assert_eq!((trace.width, trace.height), (w, h));
    assert_eq!(
        trace.labels().collect::<Vec<_>>(),
        vec![
            "luminance",
            "blur",
            "gradient",
            "magnitude_threshold",
            "double_threshold",
            "hysteresis"
        ]
    );
}

#[test]
fn hysteresis_links_weak_pixels_to_strong_neighbors() {
    let mut classification = ImageRgbaF32::filled(12, 6, [0.0, 0.0, 0.0, 1.0]);
    let strong = [canny::STRONG, canny::STRONG, canny::STRONG, 1.0];
    let weak = [canny::WEAK, canny::WEAK, canny::WEAK, 1.0];
    classification.set(3, 3, strong);
    classification.set(4, 2, weak);
    classification.set(9, 3, weak);
    let mut output = ImageRgbaF32::new(12, 6);
    let mut exec = CpuExecutor::new();
    let binding = manga_binding(&mut exec, &MangaParams::default());

    exec.run_pass(
        MangaPass::Hysteresis.index(),
        &[&classification],
        &mut output,
        &binding,
    )
    .expect("hysteresis runs");

    assert_eq!(output.get(3, 3)[0], 1.0);
    assert_eq!(output.get(4, 2)[0], 1.0, "adjacent weak pixel is linked");
    assert_eq!(output.get(9, 3)[0], 0.0, "isolated weak pixel is suppressed");
    assert_eq!(edge_pixels(&output).len(), 2);
}

#[test]
fn vertical_step_yields_a_one_pixel_line() {
    init_logging();
    let (w, h) = (16, 8);
    let source = vertical_step(w, h, 8);
    let mut output = ImageRgbaF32::new(w, h);
    let mut exec = CpuExecutor::new();
    let mut pool = CpuImagePool::new();
    let binding = manga_binding(&mut exec, &MangaParams::default());

    EdgeDetectionPipeline::default()
        .detect_edges(&source, &mut output, &binding, &mut exec, &mut pool)
        .expect("edge detection succeeds");

    let edges = edge_pixels(&output);
    assert_eq!(edges.len(), h - 2, "one edge pixel per interior row: {edges:?}");
    assert!(edges.iter().all(|&(x, _)| x == 7));
}

#[test]
fn flat_image_has_no_edges_for_any_blur() {
    for blur in [BlurKind::None, BlurKind::Box, BlurKind::Gaussian] {
        let source = flat_gray(20, 12, 0.5);
        let mut output = ImageRgbaF32::new(20, 12);
        let mut exec = CpuExecutor::new();
        let mut pool = CpuImagePool::new();
        let params = MangaParams {
            canny: CannyParams {
                blur,
                ..CannyParams::default()
            },
            ..MangaParams::default()
        };
        let binding = manga_binding(&mut exec, &params);

        EdgeDetectionPipeline::default()
            .detect_edges(&source, &mut output, &binding, &mut exec, &mut pool)
            .expect("edge detection succeeds");
        assert!(edge_pixels(&output).is_empty(), "blur {blur:?} produced edges");
    }
}

#[test]
fn selecting_a_blur_twice_matches_selecting_it_once() {
    let mut once = Binding::new(MangaPass::PROGRAM);
    once.select(BlurKind::Box);
    let mut twice = Binding::new(MangaPass::PROGRAM);
    twice.select(BlurKind::Box);
    twice.select(BlurKind::Box);
    assert_eq!(
        once.active_keywords().collect::<Vec<_>>(),
        twice.active_keywords().collect::<Vec<_>>()
    );

    twice.select(BlurKind::Gaussian);
    twice.select(BlurKind::None);
    assert_eq!(twice.active_keywords().count(), 0);
}

#[test]
fn inverted_thresholds_still_render() {
    init_logging();
    let source = vertical_step(16, 8, 8);
    let mut output = ImageRgbaF32::new(16, 8);
    let mut exec = CpuExecutor::new();
    let mut pool = CpuImagePool::new();
    let params = MangaParams {
        canny: CannyParams {
            high_threshold: 0.1,
            low_threshold: 0.8,
            ..CannyParams::default()
        },
        ..MangaParams::default()
    };
    assert!(!params.canny.is_ordered());
    let binding = manga_binding(&mut exec, &params);

    let result = EdgeDetectionPipeline::default().detect_edges(
        &source,
        &mut output,
        &binding,
        &mut exec,
        &mut pool,
    );
    assert!(result.is_ok());
}

#[test]
fn zero_sized_input_fails_in_the_pool() {
    let source = ImageRgbaF32::new(0, 0);
    let mut output = ImageRgbaF32::new(0, 0);
    let mut exec = CpuExecutor::new();
    let mut pool = CpuImagePool::new();
    let binding = manga_binding(&mut exec, &MangaParams::default());

    let err = EdgeDetectionPipeline::default()
        .detect_edges(&source, &mut output, &binding, &mut exec, &mut pool)
        .unwrap_err();
    assert!(matches!(err, FxError::InvalidDimensions { .. }));
    assert_eq!(exec.passes_run(), 0);
    assert_eq!(pool.stats().live, 0);
}
