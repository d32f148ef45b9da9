use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;
use pipe_draw_engine::core::{tessellate, AxisSnapper, Camera, PipePathBuilder};
use pipe_draw_engine::{DrawSession, RecordingHost, ToolEvent, ToolOptions, ToolPreset};
use std::hint::black_box;

fn build_cursor_path(count: usize) -> Vec<DVec3> {
    (0..count)
        .map(|i| {
            let t = i as f64 * 0.01;
            DVec3::new(10.0 * t.cos(), 10.0 * t.sin(), (i % 50) as f64 * 0.02)
        })
        .collect()
}

fn bench_tessellation(c: &mut Criterion) {
    let mut group = c.benchmark_group("bezier_tessellate");
    let p0 = DVec3::ZERO;
    let p2 = DVec3::new(10.0, 0.0, 0.0);
    let control = DVec3::new(5.0, 20.0, 0.0);

    for &segments in &[16usize, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("segments", segments),
            &segments,
            |b, &segments| {
                b.iter(|| {
                    let points = tessellate(black_box(p0), black_box(p2), control, segments)
                        .expect("Tessellierung fehlgeschlagen");
                    black_box(points.len())
                })
            },
        );
    }
    group.finish();
}

fn bench_axis_inference(c: &mut Criterion) {
    let snapper = AxisSnapper::default();
    let camera = Camera::default();
    let cursors = build_cursor_path(1024);

    c.bench_function("axis_infer_batch_1024", |b| {
        b.iter(|| {
            let mut locked = 0usize;
            for &cursor in &cursors {
                let result = snapper.infer(DVec3::ZERO, cursor, black_box(cursor), &camera);
                if result.direction().is_some() {
                    locked += 1;
                }
            }
            black_box(locked)
        })
    });
}

fn bench_pipe_segments(c: &mut Criterion) {
    let builder = PipePathBuilder::default();
    let camera = Camera::front();
    let end = DVec3::new(3.0, 1.0, 2.0);

    c.bench_function("pipe_build_segment_curved", |b| {
        b.iter(|| black_box(builder.build_segment(DVec3::ZERO, black_box(end), 0.4, &camera)))
    });

    c.bench_function("pipe_preview_cylinder", |b| {
        b.iter(|| black_box(builder.preview_cylinder(DVec3::ZERO, black_box(end))))
    });
}

fn bench_session_pointer_moves(c: &mut Criterion) {
    let cursors = build_cursor_path(256);

    c.bench_function("session_pointer_move_preview_256", |b| {
        b.iter(|| {
            let mut session = DrawSession::from_preset(ToolPreset::CurveLine, ToolOptions::default())
                .expect("Sitzung fehlgeschlagen");
            let mut host = RecordingHost::new();
            session
                .handle_event(&ToolEvent::Click { point: DVec3::ZERO }, &mut host)
                .expect("Klick fehlgeschlagen");
            let mut primitives = 0usize;
            for &point in &cursors {
                session
                    .handle_event(&ToolEvent::PointerMove { point }, &mut host)
                    .expect("Bewegung fehlgeschlagen");
                primitives += session.preview().primitives.len();
            }
            black_box(primitives)
        })
    });
}

criterion_group!(
    benches,
    bench_tessellation,
    bench_axis_inference,
    bench_pipe_segments,
    bench_session_pointer_moves
);
criterion_main!(benches);
