use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(author, version, about = "Hierarchical image gallery store")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List galleries
    Galleries {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a gallery and print its id
    CreateGallery {
        /// Gallery title
        title: String,
    },

    /// List the albums of a gallery
    Albums {
        /// Gallery id
        gallery: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an album in a gallery and print its id
    CreateAlbum {
        /// Gallery id
        gallery: u64,

        /// Album title
        title: String,
    },

    /// Ingest an image file into an album and print its id
    Upload {
        /// Gallery id
        gallery: u64,

        /// Album id
        album: u64,

        /// Image file (JPEG, PNG, GIF, ...)
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
