use std::time::Instant;

use gallery_common::{Error, Interpolation, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};

use super::resample;

/// Knobs for [`ingest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Thumbnail bounding box width in pixels.
    pub thumbnail_width: u32,
    /// Thumbnail bounding box height in pixels.
    pub thumbnail_height: u32,
    pub interpolation: Interpolation,
    /// JPEG quality; values outside 1..=100 are clamped.
    pub quality: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            thumbnail_width: 640,
            thumbnail_height: 360,
            interpolation: Interpolation::Lanczos3,
            quality: 80,
        }
    }
}

/// Both encoded renditions of an ingested image.
#[derive(Debug, Clone)]
pub struct Ingested {
    /// Full-resolution JPEG.
    pub full: Vec<u8>,
    /// Bounded JPEG thumbnail.
    pub thumbnail: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
}

/// Decode `raw` (JPEG, PNG, GIF, or anything else the `image` crate
/// recognises), then produce the full-size and thumbnail JPEGs.
///
/// Animated GIFs contribute their first frame. Transparent pixels are
/// composited over black.
pub fn ingest(raw: &[u8], options: &IngestOptions) -> Result<Ingested> {
    let started = Instant::now();

    let decoded = image::load_from_memory(raw).map_err(|e| Error::decode(e.to_string()))?;
    let full = flatten(decoded);
    let (width, height) = full.dimensions();

    let (thumbnail_width, thumbnail_height) = fit_within(
        width,
        height,
        options.thumbnail_width,
        options.thumbnail_height,
    );

    let quality = options.quality.clamp(1, 100);
    let full_jpeg = encode_jpeg(&full, quality)?;
    let thumbnail_jpeg = if (thumbnail_width, thumbnail_height) == (width, height) {
        full_jpeg.clone()
    } else {
        let thumbnail = resample::resize(
            &full,
            thumbnail_width,
            thumbnail_height,
            options.interpolation,
        );
        encode_jpeg(&thumbnail, quality)?
    };

    tracing::debug!(
        width,
        height,
        thumbnail_width,
        thumbnail_height,
        interpolation = %options.interpolation,
        quality,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Ingested image"
    );

    Ok(Ingested {
        full: full_jpeg,
        thumbnail: thumbnail_jpeg,
        width,
        height,
        thumbnail_width,
        thumbnail_height,
    })
}

/// Largest size with the aspect ratio of `width`×`height` that fits in
/// `max_width`×`max_height`. Never upscales; never returns a zero side.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let max_width = max_width.max(1);
    let max_height = max_height.max(1);

    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let fit = |side: u32, bound: u32| ((side as f64 * scale).round() as u32).clamp(1, bound);

    (fit(width, max_width), fit(height, max_height))
}

/// Drop alpha by compositing over black, so fully transparent pixels come
/// out black whatever colour they carry.
fn flatten(decoded: DynamicImage) -> RgbImage {
    if !decoded.color().has_alpha() {
        return decoded.into_rgb8();
    }

    let rgba = decoded.into_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let premultiply = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        Rgb([premultiply(r), premultiply(g), premultiply(b)])
    })
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(image)
        .map_err(|e| Error::pipeline("encode", e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 200])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn jpeg_dimensions(bytes: &[u8]) -> (u32, u32) {
        assert_eq!(
            image::guess_format(bytes).unwrap(),
            ImageFormat::Jpeg,
            "output must be JPEG"
        );
        let img = image::load_from_memory(bytes).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn fit_preserves_aspect() {
        assert_eq!(fit_within(1280, 1280, 640, 360), (360, 360));
        assert_eq!(fit_within(1920, 1080, 640, 360), (640, 360));
        assert_eq!(fit_within(1000, 200, 640, 360), (640, 128));
        assert_eq!(fit_within(100, 4000, 640, 360), (9, 360));
    }

    #[test]
    fn fit_never_upscales() {
        assert_eq!(fit_within(200, 100, 640, 360), (200, 100));
        assert_eq!(fit_within(640, 360, 640, 360), (640, 360));
    }

    #[test]
    fn fit_degenerate_bounds() {
        assert_eq!(fit_within(5000, 1, 640, 360), (640, 1));
        assert_eq!(fit_within(100, 100, 0, 0), (1, 1));
    }

    #[test]
    fn ingest_png_with_alpha() {
        let out = ingest(&png(1280, 1280), &IngestOptions::default()).unwrap();
        assert_eq!((out.width, out.height), (1280, 1280));
        assert_eq!((out.thumbnail_width, out.thumbnail_height), (360, 360));
        assert_eq!(jpeg_dimensions(&out.full), (1280, 1280));
        assert_eq!(jpeg_dimensions(&out.thumbnail), (360, 360));
    }

    #[test]
    fn transparent_pixels_flatten_to_black() {
        let img = RgbaImage::from_fn(3, 1, |x, _| match x {
            0 => Rgba([255, 255, 255, 0]),
            1 => Rgba([200, 100, 50, 255]),
            _ => Rgba([200, 100, 50, 128]),
        });
        let flat = flatten(DynamicImage::ImageRgba8(img));
        assert_eq!(flat.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(flat.get_pixel(1, 0).0, [200, 100, 50]);
        assert_eq!(flat.get_pixel(2, 0).0, [100, 50, 25]);
    }

    #[test]
    fn transparent_upload_encodes_dark() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([255, 255, 255, 0]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();

        let out = ingest(&buf.into_inner(), &IngestOptions::default()).unwrap();
        let decoded = image::load_from_memory(&out.full).unwrap().into_rgb8();
        assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c < 16)));
    }

    #[test]
    fn small_source_keeps_its_size() {
        let out = ingest(&png(120, 80), &IngestOptions::default()).unwrap();
        assert_eq!(jpeg_dimensions(&out.thumbnail), (120, 80));
    }

    #[test]
    fn every_filter_produces_bounded_thumbnail() {
        let raw = png(800, 600);
        for interpolation in Interpolation::all() {
            let options = IngestOptions {
                interpolation: *interpolation,
                ..IngestOptions::default()
            };
            let out = ingest(&raw, &options).unwrap();
            assert_eq!(
                jpeg_dimensions(&out.thumbnail),
                (480, 360),
                "filter {interpolation}"
            );
        }
    }

    #[test]
    fn quality_is_clamped() {
        let raw = png(64, 64);
        for quality in [0, 1, 100, 255] {
            let options = IngestOptions {
                quality,
                ..IngestOptions::default()
            };
            assert!(ingest(&raw, &options).is_ok(), "quality {quality}");
        }
    }

    #[test]
    fn malformed_bytes_are_decode_errors() {
        let err = ingest(b"definitely not an image", &IngestOptions::default()).unwrap_err();
        assert_matches!(err, Error::Decode(_));
        assert_eq!(err.http_status(), 422);

        let truncated = &png(64, 64)[..40];
        assert_matches!(
            ingest(truncated, &IngestOptions::default()),
            Err(Error::Decode(_))
        );
    }
}
