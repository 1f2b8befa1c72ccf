//! Per-item errors.
//!
//! Every variant is scoped to a single mapset: the pipeline logs it and moves
//! on to the next URL.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the processing of one mapset.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Could not extract mapset ID from URL: {0}")]
    UnrecognizedUrlFormat(String),

    #[error("Failed to fetch metadata for {mapset_id}: {source}")]
    MetadataFetch {
        mapset_id: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Mapset {mapset_id} metadata has no `{field}` field")]
    MetadataFieldMissing {
        mapset_id: String,
        field: &'static str,
    },

    #[error("Error downloading {url}: {reason}")]
    ArchiveDownload { url: String, reason: String },

    #[error("Invalid archive {path}: {source}")]
    ArchiveExtract {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to write archive {path}: {source}")]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("{0} is not valid UTF-8 text")]
    FileEncoding(PathBuf),

    #[error("Renaming {from} would overwrite {to}")]
    RenameCollision { from: String, to: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ItemError {
    /// Whether the item was skipped rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::UnrecognizedUrlFormat(_))
    }
}

/// Result type for per-item operations.
pub type Result<T> = std::result::Result<T, ItemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_skip() {
        assert!(ItemError::UnrecognizedUrlFormat("https://example.com".into()).is_skip());
        assert!(!ItemError::FileEncoding(PathBuf::from("a.osu")).is_skip());
    }

    #[test]
    fn test_messages() {
        let err = ItemError::MetadataFieldMissing {
            mapset_id: "42".into(),
            field: "user_id",
        };
        assert_eq!(err.to_string(), "Mapset 42 metadata has no `user_id` field");

        let err = ItemError::ArchiveDownload {
            url: "https://catboy.best/d/42".into(),
            reason: "HTTP 404 Not Found".into(),
        };
        assert!(err.to_string().contains("HTTP 404"));
    }
}
