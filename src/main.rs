mod cli;

use gallery::{config, server, GalleryStore};
use gallery_common::{AlbumId, GalleryId};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn open_store(config: &config::Config) -> Result<GalleryStore> {
    let db_path = &config.storage.db_path;
    GalleryStore::open(db_path, config.images.ingest_options())
        .with_context(|| format!("Failed to open gallery store at {}", db_path.display()))
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting gallery server");
    tracing::info!(
        db_path = %config.storage.db_path.display(),
        interpolation = %config.images.interpolation,
        quality = config.images.quality,
        "Storage and image settings"
    );

    let store = open_store(&config)?;
    server::start_server(config, store).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "gallery=trace,gallery_db=debug,gallery_common=debug,tower_http=debug".to_string()
        } else {
            "gallery=info,gallery_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Galleries { json } => list_galleries(cli.config.as_deref(), json),
        Commands::CreateGallery { title } => {
            let store = open_store(&config::load_config_or_default(cli.config.as_deref())?)?;
            println!("{}", store.create_gallery(&title)?);
            Ok(())
        }
        Commands::Albums { gallery, json } => {
            list_albums(cli.config.as_deref(), GalleryId::new(gallery), json)
        }
        Commands::CreateAlbum { gallery, title } => {
            let store = open_store(&config::load_config_or_default(cli.config.as_deref())?)?;
            println!("{}", store.create_album(GalleryId::new(gallery), &title)?);
            Ok(())
        }
        Commands::Upload {
            gallery,
            album,
            file,
        } => upload(
            cli.config.as_deref(),
            GalleryId::new(gallery),
            AlbumId::new(album),
            &file,
        ),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("gallery {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn list_galleries(config_path: Option<&Path>, json: bool) -> Result<()> {
    let store = open_store(&config::load_config_or_default(config_path)?)?;
    let galleries = store.list_galleries()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&galleries)?);
        return Ok(());
    }

    if galleries.is_empty() {
        println!("No galleries.");
    }
    for gallery in galleries {
        println!("{:>6}  {}", gallery.id, gallery.title);
    }
    Ok(())
}

fn list_albums(config_path: Option<&Path>, gallery: GalleryId, json: bool) -> Result<()> {
    let store = open_store(&config::load_config_or_default(config_path)?)?;
    let albums = store.list_albums(gallery)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&albums)?);
        return Ok(());
    }

    if albums.is_empty() {
        println!("Gallery {} has no albums.", gallery);
    }
    for album in albums {
        let cover = album
            .cover_image()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:>6}  {}  (cover: {})", album.id, album.title, cover);
    }
    Ok(())
}

fn upload(config_path: Option<&Path>, gallery: GalleryId, album: AlbumId, file: &Path) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let store = open_store(&config::load_config_or_default(config_path)?)?;
    let raw = std::fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;

    let id = store
        .add_image(gallery, album, &raw)
        .with_context(|| format!("Failed to ingest {:?}", file))?;
    println!("{}", id);
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(path)?;
    let warnings = config::validate(&config)?;

    println!("Configuration is valid");
    println!("  Database: {}", config.storage.db_path.display());
    println!(
        "  Images: {} at quality {}, thumbnails within {}x{}",
        config.images.interpolation,
        config.images.quality,
        config.images.thumbnail_width,
        config.images.thumbnail_height
    );
    println!("  Auth: {}", if config.auth.enabled { "enabled" } else { "disabled" });

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}
