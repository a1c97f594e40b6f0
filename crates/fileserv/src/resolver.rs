//! Request path resolution.
//!
//! Maps a percent-decoded request path onto one of the configured roots. Matching is a
//! linear scan in configuration order and the first root whose prefix matches
//! wins, so root order is significant when names overlap. Paths are handled
//! as raw bytes so file names that are not UTF-8 stay reachable on unix.
//!
//! This module never touches the filesystem. The caller is expected to
//! canonicalize [`ResolvedTarget::fs_path`] and confirm it still lies under
//! the root before reading anything (see [`ResolvedTarget::confine`]).

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::error::FileServerError;
use crate::registry::Root;

/// Outcome of resolving a request path.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// `/` itself: show the root selector.
    RootListing,
    /// A path inside one of the roots.
    Target(ResolvedTarget<'a>),
    /// The path escapes its root.
    Rejected,
    /// No root matches.
    NotFound,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ResolvedTarget<'a> {
    pub root: &'a Root,
    /// Root path joined with the cleaned relative path.
    pub fs_path: PathBuf,
    /// Cleaned path below the root for display, always starting with `/`.
    pub relative_path: String,
    /// Same path percent-encoded from the raw segments, for building links.
    pub relative_url: String,
}

impl ResolvedTarget<'_> {
    /// Canonicalize the target and verify it did not leave the root through a
    /// symlink. Returns the canonical path.
    pub async fn confine(&self) -> Result<PathBuf, FileServerError> {
        let canonical = match tokio::fs::canonicalize(&self.fs_path).await {
            Ok(path) => path,
            Err(err) => {
                return Err(match err.kind() {
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory => {
                        FileServerError::NotFound(self.display_path())
                    }
                    std::io::ErrorKind::PermissionDenied => FileServerError::Forbidden {
                        path: self.fs_path.clone(),
                        source: err,
                    },
                    _ => FileServerError::Io(err),
                });
            }
        };

        if !canonical.starts_with(&self.root.path) {
            warn!(
                "Symlink escape attempt: {:?} resolved to {:?} which is outside {:?}",
                self.fs_path, canonical, self.root.path
            );
            return Err(FileServerError::PathTraversal);
        }

        Ok(canonical)
    }

    /// Whether any segment below the root is a dot entry.
    pub fn is_hidden(&self) -> bool {
        self.relative_path
            .split('/')
            .any(|segment| segment.starts_with('.'))
    }

    /// The URL-space path this target was reached by, e.g. `/docs/a/b`.
    pub fn display_path(&self) -> String {
        if self.relative_path == "/" {
            format!("/{}/", self.root.name)
        } else {
            format!("/{}{}", self.root.name, self.relative_path)
        }
    }
}

/// Resolves request paths against an immutable, ordered set of roots.
#[derive(Debug, Clone)]
pub struct PathResolver {
    roots: Arc<[Root]>,
}

impl PathResolver {
    pub fn new(roots: Vec<Root>) -> Self {
        Self {
            roots: roots.into(),
        }
    }

    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    pub fn resolve(&self, request_path: impl AsRef<[u8]>) -> Resolution<'_> {
        let request_path = request_path.as_ref();
        if request_path == b"/" {
            return Resolution::RootListing;
        }

        for root in self.roots.iter() {
            let Some(rest) = strip_root_prefix(request_path, root.name.as_bytes()) else {
                continue;
            };

            let Some(segments) = clean_segments(rest) else {
                warn!(
                    "Path traversal attempt rejected: {:?}",
                    String::from_utf8_lossy(request_path)
                );
                return Resolution::Rejected;
            };

            let mut fs_path = root.path.clone();
            fs_path.extend(&segments);

            if !fs_path.starts_with(&root.path) {
                warn!("Resolved path {:?} is outside {:?}", fs_path, root.path);
                return Resolution::Rejected;
            }

            return Resolution::Target(ResolvedTarget {
                root,
                fs_path,
                relative_path: join_segments(&segments, |s| s.to_string_lossy().into_owned()),
                relative_url: join_segments(&segments, encode_segment),
            });
        }

        Resolution::NotFound
    }
}

/// Strip `/{name}` from the request path. Only matches on a segment boundary,
/// so `/doc` and `/docs2` do not match a root named `docs`.
fn strip_root_prefix<'p>(request_path: &'p [u8], name: &[u8]) -> Option<&'p [u8]> {
    let rest = request_path.strip_prefix(b"/")?.strip_prefix(name)?;
    if rest.is_empty() || rest.starts_with(b"/") {
        Some(rest)
    } else {
        None
    }
}

/// Normalize a relative URL path into filesystem segments.
///
/// Empty and `.` segments are dropped and `..` pops the previous segment.
/// Returns `None` when a `..` would climb above the root or a segment is not a
/// plain file name on this platform.
fn clean_segments(relative: &[u8]) -> Option<Vec<&OsStr>> {
    let mut segments: Vec<&OsStr> = Vec::new();

    for segment in relative.split(|b| *b == b'/') {
        match segment {
            b"" | b"." => continue,
            b".." => {
                segments.pop()?;
            }
            name => {
                if name.contains(&0) {
                    return None;
                }
                let name = segment_os_str(name)?;
                let mut components = Path::new(name).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => segments.push(name),
                    _ => return None,
                }
            }
        }
    }

    Some(segments)
}

fn join_segments(segments: &[&OsStr], f: impl Fn(&OsStr) -> String) -> String {
    let parts: Vec<String> = segments.iter().map(|s| f(*s)).collect();
    format!("/{}", parts.join("/"))
}

#[cfg(unix)]
fn segment_os_str(bytes: &[u8]) -> Option<&OsStr> {
    use std::os::unix::ffi::OsStrExt;
    Some(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn segment_os_str(bytes: &[u8]) -> Option<&OsStr> {
    std::str::from_utf8(bytes).ok().map(OsStr::new)
}

/// Percent-encode one path segment from its raw bytes.
#[cfg(unix)]
pub(crate) fn encode_segment(name: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;
    urlencoding::encode_binary(name.as_bytes()).into_owned()
}

#[cfg(not(unix))]
pub(crate) fn encode_segment(name: &OsStr) -> String {
    urlencoding::encode(&name.to_string_lossy()).into_owned()
}
