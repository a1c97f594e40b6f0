use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File server configuration, loadable from TOML. Command-line flags override
/// whatever is set here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address to bind to
    pub bind: String,

    /// Port to listen on
    pub port: u16,

    /// Root directories to serve, in priority order
    pub roots: Vec<String>,

    /// List and serve entries whose name starts with a dot. When off, any path
    /// with a dot segment is answered with 404.
    pub show_hidden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
            roots: Vec::new(),
            show_hidden: true,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Root arguments split on commas with `~` expanded. Falls back to the
    /// current directory when nothing is configured.
    pub fn root_paths(&self) -> std::io::Result<Vec<PathBuf>> {
        let roots = expand_roots(&self.roots);
        if roots.is_empty() {
            return Ok(vec![std::env::current_dir()?]);
        }
        Ok(roots)
    }
}

/// Split each argument on commas, trim, drop empty pieces and expand a
/// leading `~`.
pub fn expand_roots<S: AsRef<str>>(args: &[S]) -> Vec<PathBuf> {
    args.iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| PathBuf::from(shellexpand::tilde(piece).into_owned()))
        .collect()
}
