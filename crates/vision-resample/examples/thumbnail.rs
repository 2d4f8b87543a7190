//! Example: thumbnails of a synthetic RGB test card with every method.
//!
//! Builds one resampler per method, reports the capability tier each one
//! was dispatched to, and prints timing plus a checksum of the output.
//!
//! Run from the workspace root:
//!   cargo run -p vision-resample --example thumbnail

use std::time::Instant;

use vision_resample::{ElementType, Image, Method, ResizeParams, Result, create_resampler};

const SRC_W: usize = 1920;
const SRC_H: usize = 1080;
const DST_W: usize = 320;
const DST_H: usize = 180;

fn test_card() -> Image<u8> {
    let mut data = Vec::with_capacity(SRC_W * SRC_H * 3);
    for y in 0..SRC_H {
        for x in 0..SRC_W {
            let checker = if (x / 64 + y / 64) % 2 == 0 { 255 } else { 0 };
            data.push((x * 255 / (SRC_W - 1)) as u8);
            data.push((y * 255 / (SRC_H - 1)) as u8);
            data.push(checker);
        }
    }
    Image::from_vec(SRC_W, SRC_H, 3, data).expect("test card dimensions")
}

fn main() -> Result<()> {
    let card = test_card();
    println!("source: {SRC_W}x{SRC_H} rgb8 -> {DST_W}x{DST_H}");

    for method in Method::ALL {
        let params = ResizeParams::new(SRC_W, SRC_H, DST_W, DST_H, 3, ElementType::U8, method)?;
        let resampler = create_resampler(params)?;
        let mut thumb = Image::new_fill(DST_W, DST_H, 3, 0u8);

        let t0 = Instant::now();
        resampler.resample(&card.as_view(), &mut thumb.as_view_mut())?;
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

        let checksum: u64 = thumb.data().iter().map(|&v| v as u64).sum();
        println!(
            "  {method:?}: tier {} variant {:?} ({elapsed_ms:.2} ms, checksum {checksum})",
            resampler.tier().name(),
            resampler.params().variant()
        );
    }
    Ok(())
}
