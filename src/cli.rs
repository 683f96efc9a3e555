use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hlsgate")]
#[command(author, version, about = "Serve HLS playlists and segments from object storage")]
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
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        #[arg(value_name = "CONFIG")]
        file: Option<PathBuf>,
    },

    /// Encode an object name into a segment token
    Encode {
        /// Storage object name, e.g. `720p/segment0.ts`
        name: String,
    },

    /// Decode a segment token back into its object name
    Decode {
        /// Token taken from a rewritten playlist URL
        token: String,
    },

    /// Rewrite a local playlist file the way the server would
    Rewrite {
        /// Playlist file to read
        #[arg(required = true)]
        file: PathBuf,

        /// Video name used in segment URLs
        #[arg(long)]
        video: String,

        /// Public origin, e.g. `https://video.example.com`
        #[arg(long)]
        base_url: String,
    },

    /// Display version information
    Version,
}
