use std::cmp::Ordering;
use std::fs::{DirEntry, Metadata};
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::FileServerError;
use crate::registry::Root;
use crate::resolver::encode_segment;

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Display name. Bytes that are not UTF-8 are replaced.
    pub name: String,
    pub is_dir: bool,
    /// Percent-encoded absolute URL path built from the raw file name, e.g.
    /// `/docs/sub/caf%E9.txt`.
    pub url_path: String,
    pub size_bytes: u64,
}

/// Reads directories into sorted [`ListEntry`] rows.
#[derive(Debug, Clone, Copy)]
pub struct ListingBuilder {
    show_hidden: bool,
}

impl Default for ListingBuilder {
    fn default() -> Self {
        Self { show_hidden: true }
    }
}

impl ListingBuilder {
    pub fn new(show_hidden: bool) -> Self {
        Self { show_hidden }
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// List the immediate children of `fs_path`. `relative_url` is the
    /// percent-encoded path of that directory below `root` (`/` or `/a/b`).
    /// Blocking.
    pub fn build(
        &self,
        root: &Root,
        fs_path: &Path,
        relative_url: &str,
    ) -> Result<Vec<ListEntry>, FileServerError> {
        // The handle is dropped on every return path, including `?` exits.
        let dir = std::fs::read_dir(fs_path).map_err(|source| {
            if source.kind() == ErrorKind::PermissionDenied {
                FileServerError::Forbidden {
                    path: fs_path.to_path_buf(),
                    source,
                }
            } else {
                warn!("Error opening directory {}: {}", fs_path.display(), source);
                FileServerError::Io(source)
            }
        })?;

        let base = format!(
            "/{}{}",
            urlencoding::encode(&root.name),
            relative_url.trim_end_matches('/')
        );
        let mut entries = Vec::new();

        for entry in dir {
            let entry = entry.map_err(|err| {
                warn!("Error reading directory {}: {}", fs_path.display(), err);
                FileServerError::Io(err)
            })?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy().to_string();

            if !self.show_hidden && name.starts_with('.') {
                continue;
            }

            let Some(metadata) = entry_metadata(&entry)? else {
                debug!("Entry {:?} vanished while listing", entry.path());
                continue;
            };

            entries.push(ListEntry {
                url_path: format!("{}/{}", base, encode_segment(&file_name)),
                is_dir: metadata.is_dir(),
                size_bytes: metadata.len(),
                name,
            });
        }

        debug!("Listed {} entries in {}", entries.len(), fs_path.display());

        sort_entries(&mut entries);
        Ok(entries)
    }
}

/// Metadata following symlinks; a dangling link is listed as what it is.
/// `None` when the entry was removed after the directory was read.
fn entry_metadata(entry: &DirEntry) -> Result<Option<Metadata>, FileServerError> {
    if let Ok(metadata) = std::fs::metadata(entry.path()) {
        return Ok(Some(metadata));
    }
    match entry.metadata() {
        Ok(metadata) => Ok(Some(metadata)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(FileServerError::Io(err)),
    }
}

/// Directories first, then names ascending without regard to case. Names that
/// differ only in case fall back to byte order so the ordering is total.
pub fn sort_entries(entries: &mut [ListEntry]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &ListEntry, b: &ListEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}
