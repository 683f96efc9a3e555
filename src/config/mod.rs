mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variable overriding `storage.connection_string`.
pub const CONNECTION_STRING_ENV: &str = "HLSGATE_CONNECTION_STRING";

/// Legacy name for [`CONNECTION_STRING_ENV`], still honoured.
pub const LEGACY_CONNECTION_STRING_ENV: &str = "BLOB_CONNECTION_STRING";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./hlsgate.toml",
        "~/.config/hlsgate/config.toml",
        "/etc/hlsgate/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Take the connection string from the environment when one is set there.
pub fn apply_env_overrides(config: &mut Config) {
    for var in [CONNECTION_STRING_ENV, LEGACY_CONNECTION_STRING_ENV] {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                tracing::debug!("Using storage connection string from {var}");
                config.storage.connection_string = value;
                return;
            }
        }
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let server = &config.server;
    if server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if !matches!(server.default_scheme.as_str(), "http" | "https") {
        anyhow::bail!(
            "server.default_scheme must be 'http' or 'https', got '{}'",
            server.default_scheme
        );
    }

    if let Some(base) = &server.public_base_url {
        let rest = base
            .strip_prefix("https://")
            .or_else(|| base.strip_prefix("http://"))
            .with_context(|| format!("server.public_base_url '{base}' must start with http:// or https://"))?;
        if rest.trim_end_matches('/').is_empty() {
            anyhow::bail!("server.public_base_url '{base}' has no host");
        }
    }

    validate_container_name(&config.storage.container)?;

    if config.storage.default_video.is_empty() {
        anyhow::bail!("storage.default_video cannot be empty");
    }

    if config.storage.connection_string.trim().is_empty() {
        tracing::warn!(
            "No storage connection string configured; set storage.connection_string or {CONNECTION_STRING_ENV}"
        );
    }

    Ok(())
}

/// Container names follow the Blob service rules: 3-63 characters of
/// lowercase letters, digits and single hyphens, starting and ending with a
/// letter or digit.
fn validate_container_name(name: &str) -> Result<()> {
    let valid = (3..=63).contains(&name.len())
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains("--");
    if !valid {
        anyhow::bail!("Invalid storage container name '{name}'");
    }
    Ok(())
}
