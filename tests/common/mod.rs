//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which opens a [`GalleryStore`] on a temporary
//! database file, plus fixture generators that synthesize images in memory.
//! [`TestHarness::with_server`] starts Axum on a random port for HTTP-level
//! testing.

#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;

use gallery::config::Config;
use gallery::images::IngestOptions;
use gallery::server::{create_router, AppContext, PrincipalResolver};
use gallery::GalleryStore;
use image::{ImageFormat, Rgb, RgbImage};

/// Store on a temp file; the directory lives as long as the harness.
pub struct TestHarness {
    pub store: GalleryStore,
    pub dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a harness with default ingest options.
    pub fn new() -> Self {
        Self::with_options(IngestOptions::default())
    }

    pub fn with_options(options: IngestOptions) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = GalleryStore::open(dir.path().join("gallery.db"), options)
            .expect("failed to open store");
        Self { store, dir }
    }

    /// Start an Axum server with default config on a random port.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::new();
        let ctx = AppContext::new(harness.store.clone(), config);
        let addr = serve(ctx).await;
        (harness, addr)
    }

    /// Start an Axum server with a custom principal resolver.
    pub async fn with_server_resolver(resolver: Arc<dyn PrincipalResolver>) -> (Self, SocketAddr) {
        let harness = Self::new();
        let ctx = AppContext::with_resolver(harness.store.clone(), Config::default(), resolver);
        let addr = serve(ctx).await;
        (harness, addr)
    }
}

async fn serve(ctx: AppContext) -> SocketAddr {
    let app = create_router(ctx, None);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let addr = listener.local_addr().expect("failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    addr
}

fn pattern(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 251) as u8, (y % 241) as u8, ((x + y) % 255) as u8])
    })
}

fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).expect("failed to encode fixture");
    buf.into_inner()
}

/// A PNG fixture of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(&pattern(width, height), ImageFormat::Png)
}

/// A JPEG fixture of the given size.
pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(&pattern(width, height), ImageFormat::Jpeg)
}

/// A GIF fixture of the given size.
pub fn gif(width: u32, height: u32) -> Vec<u8> {
    let rgba = image::DynamicImage::ImageRgb8(pattern(width, height)).into_rgba8();
    let mut buf = Cursor::new(Vec::new());
    rgba.write_to(&mut buf, ImageFormat::Gif)
        .expect("failed to encode fixture");
    buf.into_inner()
}

/// Decode stored bytes, asserting they are JPEG, and return the dimensions.
pub fn jpeg_dimensions(bytes: &[u8]) -> (u32, u32) {
    assert_eq!(
        image::guess_format(bytes).expect("unrecognised image bytes"),
        ImageFormat::Jpeg
    );
    let img = image::load_from_memory(bytes).expect("stored bytes do not decode");
    (img.width(), img.height())
}
