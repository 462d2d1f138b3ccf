//! Local download cache keyed by URI path.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use url::Url;

use crate::error::{CompendiumError, Result};

use super::Fetcher;

/// Relative cache location derived from a URI's path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheLocation {
    /// Directory relative to the cache root (may be empty).
    pub directory: PathBuf,
    /// File name (final path segment).
    pub filename: String,
}

impl CacheLocation {
    /// Path relative to the cache root.
    pub fn relative_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Derive the cache location for a URI.
///
/// The leading slash of the URI path is dropped; the final segment becomes
/// the file name and the remaining segments the directory. Host, query and
/// fragment do not take part.
pub fn cache_location(uri: &str) -> Result<CacheLocation> {
    let url = Url::parse(uri).map_err(|e| CompendiumError::Fetch {
        uri: uri.to_string(),
        message: format!("Invalid URI: {}", e),
    })?;

    let segments: Vec<&str> = url
        .path()
        .trim_start_matches('/')
        .split('/')
        .collect();

    if segments.iter().any(|s| *s == ".." || *s == ".") {
        return Err(CompendiumError::Fetch {
            uri: uri.to_string(),
            message: "URI path contains relative segments".to_string(),
        });
    }

    let (filename, directories) = match segments.split_last() {
        Some((last, rest)) if !last.is_empty() => (last.to_string(), rest),
        _ => {
            return Err(CompendiumError::Fetch {
                uri: uri.to_string(),
                message: "URI path has no file name to cache under".to_string(),
            });
        }
    };

    let directory = directories
        .iter()
        .filter(|s| !s.is_empty())
        .collect::<PathBuf>();

    Ok(CacheLocation {
        directory,
        filename,
    })
}

/// Download cache rooted at a directory.
pub struct Cache<'f> {
    root: PathBuf,
    fetcher: &'f dyn Fetcher,
}

impl<'f> Cache<'f> {
    pub fn new(root: impl Into<PathBuf>, fetcher: &'f dyn Fetcher) -> Self {
        Self {
            root: root.into(),
            fetcher,
        }
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (root-joined) path a URI is cached at.
    pub fn local_path(&self, uri: &str) -> Result<PathBuf> {
        Ok(self.root.join(cache_location(uri)?.relative_path()))
    }

    /// Make sure `uri` is cached locally and return its path.
    ///
    /// With `overwrite == false` an existing file is returned untouched and
    /// the fetcher is not called. New content is written to a temporary file
    /// beside the target and renamed into place, so the cache never holds a
    /// partial download.
    pub fn fetch(&self, uri: &str, overwrite: bool) -> Result<PathBuf> {
        let path = self.local_path(uri)?;

        if path.is_file() && !overwrite {
            tracing::debug!(uri, path = %path.display(), "using cached copy");
            return Ok(path);
        }

        let body = self.fetcher.fetch(uri)?;

        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir).map_err(|e| CompendiumError::Io {
            path: dir.to_path_buf(),
            message: format!("Failed to create cache directory: {}", e),
        })?;

        write_atomic(&path, &body)?;
        tracing::info!(uri, path = %path.display(), bytes = body.len(), "cached");

        Ok(path)
    }
}

/// Write `contents` to `path` through a sibling temporary file.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let io_err = |e: std::io::Error| CompendiumError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    temp.write_all(contents).map_err(io_err)?;
    temp.flush().map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;

    Ok(())
}
