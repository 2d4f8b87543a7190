use criterion::{Criterion, black_box, criterion_group, criterion_main};
use vr_core::{ElementType, Image};
use vr_resize::{
    FixedProbe, Method, ResizeConfig, ResizeParams, Tier, create_resampler,
    create_resampler_with,
};

const SRC_W: usize = 1280;
const SRC_H: usize = 1024;

fn ramp_u8(channels: usize) -> Image<u8> {
    let n = SRC_W * SRC_H * channels;
    let data = (0..n).map(|i| (i % 251) as u8).collect();
    Image::from_vec(SRC_W, SRC_H, channels, data).expect("valid image")
}

fn bench_u8_methods(c: &mut Criterion) {
    let img = ramp_u8(3);
    let view = img.as_view();

    for method in [
        Method::Nearest,
        Method::Bilinear,
        Method::BilinearCompat,
        Method::Bicubic,
        Method::Area,
    ] {
        for (dw, dh) in [(640, 512), (1920, 1536)] {
            let params = ResizeParams::new(SRC_W, SRC_H, dw, dh, 3, ElementType::U8, method)
                .expect("valid params");
            let resampler = create_resampler(params).expect("resampler");
            let mut dst = Image::new_fill(dw, dh, 3, 0u8);

            c.bench_function(&format!("{method:?}_u8x3_1280x1024_to_{dw}x{dh}"), |b| {
                b.iter(|| {
                    resampler
                        .resample(black_box(&view), &mut dst.as_view_mut())
                        .expect("resample");
                    black_box(dst.data());
                });
            });
        }
    }
}

fn bench_tiers(c: &mut Criterion) {
    let img = ramp_u8(1);
    let view = img.as_view();
    let params = ResizeParams::new(SRC_W, SRC_H, 960, 768, 1, ElementType::U8, Method::Bilinear)
        .expect("valid params");
    let probe = FixedProbe::all();

    for tier in [Tier::Avx2, Tier::Sse41, Tier::Scalar] {
        let config = ResizeConfig::default().with_max_tier(tier);
        let resampler = create_resampler_with(params, &probe, &config).expect("resampler");
        let mut dst = Image::new_fill(960, 768, 1, 0u8);

        let label = format!("bilinear_u8_1280x1024_to_960x768_{}", resampler.tier().name());
        c.bench_function(&label, |b| {
            b.iter(|| {
                resampler
                    .resample(black_box(&view), &mut dst.as_view_mut())
                    .expect("resample");
                black_box(dst.data());
            });
        });
    }
}

fn bench_float_bilinear(c: &mut Criterion) {
    let n = SRC_W * SRC_H;
    let data = (0..n).map(|i| (i % 1000) as f32 * 0.001).collect();
    let img = Image::from_vec(SRC_W, SRC_H, 1, data).expect("valid image");
    let view = img.as_view();
    let params = ResizeParams::new(SRC_W, SRC_H, 800, 600, 1, ElementType::F32, Method::Bilinear)
        .expect("valid params");
    let resampler = create_resampler(params).expect("resampler");
    let mut dst = Image::new_fill(800, 600, 1, 0.0f32);

    c.bench_function("bilinear_f32_1280x1024_to_800x600", |b| {
        b.iter(|| {
            resampler
                .resample(black_box(&view), &mut dst.as_view_mut())
                .expect("resample");
            black_box(dst.data());
        });
    });
}

criterion_group!(benches, bench_u8_methods, bench_tiers, bench_float_bilinear);
criterion_main!(benches);
