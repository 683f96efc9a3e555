mod cli;

use hlsgate::{
    config, server,
    server::RequestBase,
    streaming::rewrite_manifest,
};
use hlsgate_common::{decode_segment_token, encode_segment_token, VideoName};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting hlsgate server");
    tracing::info!(
        "Server will listen on {}:{}, container '{}'",
        config.server.host,
        config.server.port,
        config.storage.container
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "hlsgate=trace,hlsgate_storage=trace,tower_http=debug".to_string()
        } else {
            "hlsgate=info,hlsgate_storage=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate { file } => {
            let path = file.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Encode { name } => {
            println!("{}", encode_segment_token(&name));
            Ok(())
        }
        Commands::Decode { token } => {
            let name = decode_segment_token(&token)
                .with_context(|| format!("Invalid segment token: {token}"))?;
            println!("{}", name);
            Ok(())
        }
        Commands::Rewrite {
            file,
            video,
            base_url,
        } => rewrite_file(&file, &video, &base_url),
        Commands::Version => {
            println!("hlsgate {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Container: {}", config.storage.container);
            println!("  Default video: {}", config.storage.default_video);
            match hlsgate_storage::ConnectionString::parse(&config.storage.connection_string) {
                Ok(cs) => println!("  Storage backend: {}", cs.backend_name()),
                Err(e) => println!("  Storage backend: not configured ({e})"),
            }
            if let Some(ref base) = config.server.public_base_url {
                println!("  Public base URL: {}", base);
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Container: {}", config.storage.container);
        }
    }

    Ok(())
}

fn rewrite_file(file: &std::path::Path, video: &str, base_url: &str) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("Playlist file does not exist: {:?}", file);
    }

    let video = VideoName::parse(video)?;
    let manifest = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read playlist: {:?}", file))?;

    let base = RequestBase::from_origin(base_url);
    print!("{}", rewrite_manifest(&manifest, &base.segment_base(&video)));
    Ok(())
}
