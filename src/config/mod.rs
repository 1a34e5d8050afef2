mod types;

pub use types::*;

use anyhow::{Context, Result};
use gallery_common::Interpolation;
use std::path::{Path, PathBuf};

/// Environment variable overriding `storage.db_path`.
pub const ENV_DB_PATH: &str = "GALLERY_DB_PATH";
/// Environment variable overriding `images.interpolation`.
pub const ENV_INTERPOLATION: &str = "GALLERY_INTERPOLATION";
/// Environment variable overriding `images.quality`.
pub const ENV_QUALITY: &str = "GALLERY_QUALITY";

/// Unprefixed names accepted for older deployments. The `GALLERY_*` name
/// wins when both are set.
pub const LEGACY_ENV_DB_PATH: &str = "BOLT";
pub const LEGACY_ENV_INTERPOLATION: &str = "INTERPOLATION";
pub const LEGACY_ENV_QUALITY: &str = "QUALITY";

/// Load configuration from a TOML file, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./gallery.toml", "~/.config/gallery/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Apply `GALLERY_*` (or legacy unprefixed) environment variables on top of `config`.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`. Empty values are ignored.
pub(crate) fn apply_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let get = |key: &'static str, legacy: &'static str| -> Option<(&'static str, String)> {
        [key, legacy]
            .into_iter()
            .find_map(|k| lookup(k).filter(|v| !v.trim().is_empty()).map(|v| (k, v)))
    };

    if let Some((_, path)) = get(ENV_DB_PATH, LEGACY_ENV_DB_PATH) {
        config.storage.db_path = PathBuf::from(shellexpand::tilde(&path).as_ref());
    }

    if let Some((key, name)) = get(ENV_INTERPOLATION, LEGACY_ENV_INTERPOLATION) {
        config.images.interpolation = name
            .parse::<Interpolation>()
            .map_err(|e| anyhow::anyhow!("{key}: {e}"))?;
    }

    if let Some((key, quality)) = get(ENV_QUALITY, LEGACY_ENV_QUALITY) {
        config.images.quality = quality
            .trim()
            .parse()
            .with_context(|| format!("{key} must be an integer in 1..=100"))?;
    }

    Ok(())
}

/// Validate configuration.
///
/// Hard errors fail; suspicious but usable values are returned as warnings
/// (and logged).
pub fn validate(config: &Config) -> Result<Vec<String>> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }
    if config.storage.db_path.as_os_str().is_empty() {
        anyhow::bail!("storage.db_path cannot be empty");
    }

    let mut warnings = Vec::new();

    if !(1..=100).contains(&config.images.quality) {
        warnings.push(format!(
            "images.quality {} is outside 1..=100 and will be clamped",
            config.images.quality
        ));
    }
    if config.images.thumbnail_width == 0 || config.images.thumbnail_height == 0 {
        warnings.push(format!(
            "thumbnail bounds {}x{} contain a zero; thumbnails will be 1 pixel wide",
            config.images.thumbnail_width, config.images.thumbnail_height
        ));
    }
    if config.auth.enabled && config.auth.api_key.as_deref().map_or(true, str::is_empty) {
        warnings.push("auth is enabled but no api_key is set; all writes will be refused".into());
    }
    if let Some(dir) = &config.server.static_dir {
        if !dir.exists() {
            warnings.push(format!("static_dir does not exist: {:?}", dir));
        }
    }

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    Ok(warnings)
}
