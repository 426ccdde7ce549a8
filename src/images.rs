use crate::importer::FILE_PREFIX;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use eyre::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MIME: &str = "image/jpeg";

/// Lookup from the short file id embedded in an image's file name to the
/// image on disk.
///
/// The export stores uploads as `file-<ID>.<ext>` or `file-<ID>-<original name>`,
/// while messages refer to them as `file-service://file-<ID>`.
#[derive(Debug, Default, Clone)]
pub struct ImageIndex {
    files: BTreeMap<String, PathBuf>,
}

impl ImageIndex {
    /// Scan `folders` in order. Missing folders are skipped; an id seen again
    /// (in the same or a later folder) replaces the earlier path.
    pub fn build<P: AsRef<Path>>(folders: &[P]) -> Self {
        let mut index = Self::default();
        for folder in folders {
            index.scan(folder.as_ref());
        }
        index
    }

    fn scan(&mut self, folder: &Path) {
        if !folder.is_dir() {
            tracing::debug!(folder = %folder.display(), "image folder not found, skipping");
            return;
        }
        let entries = match fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(folder = %folder.display(), error = %e, "cannot read image folder");
                return;
            }
        };

        // read_dir order is platform dependent; sort so overwrites are reproducible.
        let mut entries: Vec<_> = entries.flatten().collect();
        entries.sort_by_key(|e| e.file_name());

        let before = self.files.len();
        for entry in entries {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let Some(id) = file_id(&name) else {
                continue;
            };
            self.insert(id.to_string(), path);
        }
        tracing::debug!(
            folder = %folder.display(),
            added = self.files.len() - before,
            "scanned image folder"
        );
    }

    pub fn insert(&mut self, id: impl Into<String>, path: impl Into<PathBuf>) {
        self.files.insert(id.into(), path.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Every indexed id that starts with the pointer's id, in key order.
    ///
    /// A pointer with an empty id (`file-service://file-`) matches nothing
    /// rather than every indexed image.
    pub fn matches<'a>(&'a self, asset_pointer: &str) -> Vec<(&'a str, &'a Path)> {
        let candidate = pointer_id(asset_pointer);
        if candidate.is_empty() {
            return Vec::new();
        }
        self.files
            .range(candidate.to_string()..)
            .take_while(|(id, _)| id.starts_with(candidate))
            .map(|(id, path)| (id.as_str(), path.as_path()))
            .collect()
    }

    /// Find the image behind an asset pointer.
    ///
    /// Ids on disk may carry more characters than the pointer, so this is a
    /// prefix match. When several ids match, the shortest wins and equal
    /// lengths fall back to lexicographic order.
    pub fn resolve(&self, asset_pointer: &str) -> Option<&Path> {
        self.matches(asset_pointer)
            .into_iter()
            .min_by_key(|(id, _)| (id.len(), *id))
            .map(|(_, path)| path)
    }
}

/// `file-ABC123.png` and `file-ABC123-photo.jpg` both yield `ABC123`.
fn file_id(file_name: &str) -> Option<&str> {
    let rest = file_name.strip_prefix(FILE_PREFIX)?;
    let id = rest.split(['-', '.']).next().unwrap_or(rest);
    (!id.is_empty()).then_some(id)
}

/// `file-service://file-ABC123` yields `ABC123`. Only a leading `file-` is
/// removed, so `file-a-file-b` yields `a-file-b`.
fn pointer_id(asset_pointer: &str) -> &str {
    let last = asset_pointer.rsplit('/').next().unwrap_or(asset_pointer);
    last.strip_prefix(FILE_PREFIX).unwrap_or(last)
}

/// Read an image and wrap it as a `data:` URL. An empty MIME type falls back
/// to [`DEFAULT_MIME`].
pub fn encode_data_url(path: &Path, mime_type: Option<&str>) -> Result<String> {
    let bytes = fs::read(path).wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let mime = mime_type.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MIME);
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}
