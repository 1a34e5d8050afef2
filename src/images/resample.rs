//! Thumbnail resampling.
//!
//! Filters shipped by the `image` crate go through `imageops::resize`.
//! Mitchell-Netravali and Lanczos-2 use a separable convolution with the
//! same rules: the kernel is widened by the downscale factor, sampled at
//! pixel centres, and normalised so every output row of weights sums to one.

use gallery_common::Interpolation;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// Resize `src` to exactly `width`×`height` with the chosen filter.
pub fn resize(src: &RgbImage, width: u32, height: u32, interpolation: Interpolation) -> RgbImage {
    match interpolation {
        Interpolation::NearestNeighbor => imageops::resize(src, width, height, FilterType::Nearest),
        Interpolation::Bilinear => imageops::resize(src, width, height, FilterType::Triangle),
        Interpolation::Bicubic => imageops::resize(src, width, height, FilterType::CatmullRom),
        Interpolation::Lanczos3 => imageops::resize(src, width, height, FilterType::Lanczos3),
        Interpolation::MitchellNetravali => convolve(src, width, height, &MITCHELL_NETRAVALI),
        Interpolation::Lanczos2 => convolve(src, width, height, &LANCZOS2),
    }
}

struct Kernel {
    /// Half-width of the kernel at scale 1.
    support: f32,
    eval: fn(f32) -> f32,
}

const MITCHELL_NETRAVALI: Kernel = Kernel {
    support: 2.0,
    eval: mitchell_netravali,
};

const LANCZOS2: Kernel = Kernel {
    support: 2.0,
    eval: lanczos2,
};

/// Mitchell-Netravali cubic with B = C = 1/3.
fn mitchell_netravali(x: f32) -> f32 {
    const B: f32 = 1.0 / 3.0;
    const C: f32 = 1.0 / 3.0;

    let x = x.abs();
    if x < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * x.powi(3)
            + (-18.0 + 12.0 * B + 6.0 * C) * x.powi(2)
            + (6.0 - 2.0 * B))
            / 6.0
    } else if x < 2.0 {
        ((-B - 6.0 * C) * x.powi(3)
            + (6.0 * B + 30.0 * C) * x.powi(2)
            + (-12.0 * B - 48.0 * C) * x
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

fn sinc(x: f32) -> f32 {
    if x == 0.0 {
        1.0
    } else {
        let px = std::f32::consts::PI * x;
        px.sin() / px
    }
}

fn lanczos2(x: f32) -> f32 {
    if x.abs() < 2.0 {
        sinc(x) * sinc(x / 2.0)
    } else {
        0.0
    }
}

/// Contributions of source samples to one output sample.
struct Taps {
    first: usize,
    weights: Vec<f32>,
}

fn taps(src_len: u32, dst_len: u32, kernel: &Kernel) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    let filter_scale = scale.max(1.0);
    let support = kernel.support * filter_scale;

    (0..dst_len)
        .map(|out| {
            let center = (out as f32 + 0.5) * scale;
            let first = (center - support).floor().max(0.0) as usize;
            let last = ((center + support).ceil() as usize).min(src_len as usize);

            let mut weights: Vec<f32> = (first..last)
                .map(|i| (kernel.eval)((i as f32 + 0.5 - center) / filter_scale))
                .collect();

            let sum: f32 = weights.iter().sum();
            if sum.abs() > f32::EPSILON {
                weights.iter_mut().for_each(|w| *w /= sum);
                Taps { first, weights }
            } else {
                // Degenerate window: fall back to the nearest sample.
                let nearest = (center as usize).min(src_len as usize - 1);
                Taps {
                    first: nearest,
                    weights: vec![1.0],
                }
            }
        })
        .collect()
}

fn convolve(src: &RgbImage, width: u32, height: u32, kernel: &Kernel) -> RgbImage {
    let (src_width, src_height) = src.dimensions();

    // Horizontal pass into an intermediate float buffer of width × src_height.
    let columns = taps(src_width, width, kernel);
    let mut horizontal = vec![[0f32; 3]; width as usize * src_height as usize];
    for y in 0..src_height {
        for (x, tap) in columns.iter().enumerate() {
            let mut acc = [0f32; 3];
            for (k, weight) in tap.weights.iter().enumerate() {
                let px = src.get_pixel((tap.first + k) as u32, y);
                for c in 0..3 {
                    acc[c] += px[c] as f32 * weight;
                }
            }
            horizontal[y as usize * width as usize + x] = acc;
        }
    }

    // Vertical pass.
    let rows = taps(src_height, height, kernel);
    let mut out = RgbImage::new(width, height);
    for (y, tap) in rows.iter().enumerate() {
        for x in 0..width as usize {
            let mut acc = [0f32; 3];
            for (k, weight) in tap.weights.iter().enumerate() {
                let sample = horizontal[(tap.first + k) * width as usize + x];
                for c in 0..3 {
                    acc[c] += sample[c] * weight;
                }
            }
            out.put_pixel(
                x as u32,
                y as u32,
                Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8)),
            );
        }
    }

    out
}
