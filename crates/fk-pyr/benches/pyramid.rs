use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fk_pyr::{Pyramid, build_image_pyramid, downsample2x2_mean, flow_pyramid_synthesis};
use ndarray::Array4;

fn frame(width: usize, height: usize) -> Array4<f32> {
    Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
        ((x * 7 + y * 13 + c * 31) % 251) as f32 / 250.0
    })
}

fn bench_downsample(c: &mut Criterion) {
    let img = frame(1280, 1024);

    c.bench_function("downsample2x2_mean_rgb_1280x1024", |b| {
        b.iter(|| {
            let out = downsample2x2_mean(black_box(img.view()));
            black_box(out);
        });
    });
}

fn bench_pyramid_build(c: &mut Criterion) {
    let img = frame(1280, 1024);

    c.bench_function("pyramid_build_rgb_6_levels_1280x1024", |b| {
        b.iter(|| {
            let pyr = build_image_pyramid(black_box(img.view()), 6).expect("large enough");
            black_box(pyr.num_levels());
        });
    });
}

fn bench_flow_synthesis(c: &mut Criterion) {
    let residuals: Pyramid = (0..5)
        .map(|i| Array4::from_elem((1, 2, 512 >> i, 512 >> i), 0.25f32))
        .collect();

    c.bench_function("flow_pyramid_synthesis_5_levels_512", |b| {
        b.iter(|| {
            let flows = flow_pyramid_synthesis(black_box(&residuals)).expect("consistent residuals");
            black_box(flows);
        });
    });
}

criterion_group!(benches, bench_downsample, bench_pyramid_build, bench_flow_synthesis);
criterion_main!(benches);
