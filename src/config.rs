use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::NodeConfig;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("nfsdecl"))
}

/// Get the default node file path
pub fn default_node_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("node.toml"))
}

/// Node file format, detected from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Expand `~` and environment variables in a user-supplied path
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| format!("Could not expand {path}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Parse a node file
pub fn load_node(path: &Path) -> Result<NodeConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    match ConfigFormat::detect(path) {
        ConfigFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display())),
        ConfigFormat::Toml => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in {}", path.display())),
    }
}

/// Load the node file given on the command line, or the default one
///
/// A missing default file yields an empty node, so facts can come from flags.
pub fn load(explicit: Option<&str>) -> Result<NodeConfig> {
    if let Some(path) = explicit {
        let path = expand_path(path)?;
        log::info!("Loading node file {}", path.display());
        return load_node(&path);
    }

    let path = default_node_path()?;
    if !path.exists() {
        log::debug!("No node file at {}, using defaults", path.display());
        return Ok(NodeConfig::default());
    }
    log::info!("Loading node file {}", path.display());
    load_node(&path)
}
