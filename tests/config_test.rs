//! Integration tests for configuration-driven behaviour.

mod common;

use common::{jpeg_dimensions, png, TestHarness};
use gallery::config::{self, Config};
use gallery::server::{create_router, AppContext};
use gallery::GalleryStore;
use gallery_common::Interpolation;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn file_settings_drive_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("from-config.db");
    let config_path = dir.path().join("gallery.toml");
    std::fs::write(
        &config_path,
        format!(
            "[storage]\ndb_path = {:?}\n\n[images]\ninterpolation = \"lanczos2\"\nthumbnail_width = 64\nthumbnail_height = 64\n",
            db_path.to_string_lossy()
        ),
    )
    .unwrap();

    let config = config::load_config_or_default(Some(&config_path)).unwrap();
    assert_eq!(config.images.interpolation, Interpolation::Lanczos2);

    let store = GalleryStore::open(&config.storage.db_path, config.images.ingest_options()).unwrap();
    let g = store.create_gallery("g").unwrap();
    let a = store.create_album(g, "a").unwrap();
    let i = store.add_image(g, a, &png(256, 128)).unwrap();

    assert!(db_path.exists());
    assert_eq!(
        jpeg_dimensions(&store.get_thumbnail(g, a, i).unwrap().data),
        (64, 32)
    );
}

#[test]
fn unknown_filter_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gallery.toml");
    std::fs::write(&path, "[images]\ninterpolation = \"sharpest\"\n").unwrap();
    assert!(config::load_config(&path).is_err());
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(config::load_config_or_default(Some(&dir.path().join("absent.toml"))).is_err());
}

// ---------------------------------------------------------------------------
// Server settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_limit_is_enforced() {
    let mut config = Config::default();
    config.server.max_upload_bytes = 1024;
    let (h, addr) = TestHarness::with_server_config(config).await;
    let g = h.store.create_gallery("g").unwrap();
    let a = h.store.create_album(g, "a").unwrap();

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/gallery/{g}/album/{a}/images"))
        .body(vec![0u8; 4096])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 413);
}

#[tokio::test]
async fn static_dir_serves_admin_ui() {
    let assets = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("index.html"), "<div id=\"app\"></div>").unwrap();
    std::fs::write(assets.path().join("admin.js"), "console.log(1)").unwrap();

    let h = TestHarness::new();
    let app = create_router(
        AppContext::new(h.store.clone(), Config::default()),
        Some(assets.path().to_path_buf()),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let js = reqwest::get(format!("http://{addr}/admin.js")).await.unwrap();
    assert_eq!(js.text().await.unwrap(), "console.log(1)");

    // Unknown paths fall back to the SPA entry point.
    let page = reqwest::get(format!("http://{addr}/admin/galleries")).await.unwrap();
    assert!(page.text().await.unwrap().contains("id=\"app\""));

    // API routes still win over the fallback.
    let api = reqwest::get(format!("http://{addr}/api/gallery")).await.unwrap();
    assert_eq!(api.status(), 200);
}
