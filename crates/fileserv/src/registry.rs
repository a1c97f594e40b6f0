//! Root directory registry.
//!
//! Turns the configured directory arguments into canonical [`Root`] entries.
//! Each root is exposed under `/{name}`, where `name` is the final component of
//! its canonical path. Order is preserved: it decides which root wins when a
//! request could match more than one.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// A configured top-level directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    /// URL segment the root is served under.
    pub name: String,
    /// Canonical absolute path of the directory.
    pub path: PathBuf,
}

impl Root {
    /// URL prefix for this root, e.g. `/docs`.
    pub fn url_prefix(&self) -> String {
        format!("/{}", self.name)
    }
}

/// Startup-time configuration failures. Fatal: the server never starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid path {}: {source}", path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot access {}: {source}", path.display())]
    NotAccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("{} has no UTF-8 name to serve it under", path.display())]
    Unnamed { path: PathBuf },

    #[error(
        "root name {name:?} is used by both {} and {}",
        first.display(),
        second.display()
    )]
    NameCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Validate raw directory arguments into roots.
///
/// Duplicate canonical paths are dropped silently (first one wins). Two
/// different directories sharing a basename are rejected, since both would be
/// served under the same URL segment.
pub fn validate<I, P>(raw_paths: I) -> Result<Vec<Root>, ConfigError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut roots: Vec<Root> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut names: HashMap<String, PathBuf> = HashMap::new();

    for raw in raw_paths {
        let raw = raw.as_ref();

        let absolute = std::path::absolute(raw).map_err(|source| ConfigError::InvalidPath {
            path: raw.to_path_buf(),
            source,
        })?;

        let canonical = absolute
            .canonicalize()
            .map_err(|source| ConfigError::NotAccessible {
                path: raw.to_path_buf(),
                source,
            })?;

        if !seen.insert(canonical.clone()) {
            debug!("Skipping duplicate root {}", canonical.display());
            continue;
        }

        let metadata = std::fs::metadata(&canonical).map_err(|source| {
            ConfigError::NotAccessible {
                path: raw.to_path_buf(),
                source,
            }
        })?;
        if !metadata.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: raw.to_path_buf(),
            });
        }

        let name = canonical
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ConfigError::Unnamed {
                path: canonical.clone(),
            })?;

        if let Some(first) = names.get(&name) {
            return Err(ConfigError::NameCollision {
                name,
                first: first.clone(),
                second: canonical,
            });
        }
        names.insert(name.clone(), canonical.clone());

        roots.push(Root {
            name,
            path: canonical,
        });
    }

    Ok(roots)
}
