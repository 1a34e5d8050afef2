use gallery_common::Interpolation;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::images::IngestOptions;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of admin UI assets served for unmatched paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Largest accepted request body, in bytes (image uploads)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_upload_bytes() -> usize {
    32 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path of the database file (created on first open)
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./gallery.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesConfig {
    /// Resampling filter used for thumbnails
    #[serde(default)]
    pub interpolation: Interpolation,

    /// JPEG quality for both stored renditions (clamped to 1..=100)
    #[serde(default = "default_quality")]
    pub quality: u8,

    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,

    #[serde(default = "default_thumbnail_height")]
    pub thumbnail_height: u32,
}

fn default_quality() -> u8 {
    80
}
fn default_thumbnail_width() -> u32 {
    640
}
fn default_thumbnail_height() -> u32 {
    360
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::default(),
            quality: default_quality(),
            thumbnail_width: default_thumbnail_width(),
            thumbnail_height: default_thumbnail_height(),
        }
    }
}

impl ImagesConfig {
    /// Pipeline options described by this section.
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            thumbnail_width: self.thumbnail_width,
            thumbnail_height: self.thumbnail_height,
            interpolation: self.interpolation,
            quality: self.quality,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Require a principal for write requests
    #[serde(default)]
    pub enabled: bool,

    /// API key accepted as `Authorization: Bearer <key>`
    #[serde(default)]
    pub api_key: Option<String>,
}
