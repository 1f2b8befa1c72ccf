//! Client for the beatmap mirror API.
//!
//! Two endpoints are used:
//! - `GET {base}/api/v2/s/{id}`: mapset metadata as JSON
//! - `GET {base}/d/{id}`: the `.osz` archive

use std::path::Path;
use std::time::Instant;

use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::{ItemError, Result};
use crate::mapset::MapsetId;

/// Default mirror base URL.
pub const DEFAULT_MIRROR_URL: &str = "https://catboy.best";

/// Mapset metadata as returned by the mirror.
///
/// Only the fields this tool uses are decoded; the response carries many more.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MapsetMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Original creator's username.
    pub creator: Option<String>,
    /// Numeric id of the mapper the set is attributed to.
    pub user_id: Option<u64>,
}

impl MapsetMetadata {
    /// The `user_id` field, required for every rewrite.
    pub fn require_user_id(&self, id: &MapsetId) -> Result<u64> {
        self.user_id.ok_or_else(|| missing(id, "user_id"))
    }

    pub fn require_title(&self, id: &MapsetId) -> Result<&str> {
        self.title.as_deref().ok_or_else(|| missing(id, "title"))
    }

    pub fn require_artist(&self, id: &MapsetId) -> Result<&str> {
        self.artist.as_deref().ok_or_else(|| missing(id, "artist"))
    }
}

fn missing(id: &MapsetId, field: &'static str) -> ItemError {
    ItemError::MetadataFieldMissing {
        mapset_id: id.to_string(),
        field,
    }
}

/// HTTP client bound to one mirror.
#[derive(Debug, Clone)]
pub struct MirrorClient {
    client: Client,
    base_url: String,
}

impl MirrorClient {
    /// Create a client for `base_url` with the transport defaults.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from run configuration.
    pub fn from_config(config: &RunConfig) -> reqwest::Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.mirror_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn metadata_url(&self, id: &MapsetId) -> String {
        format!("{}/api/v2/s/{}", self.base_url, id)
    }

    pub fn download_url(&self, id: &MapsetId) -> String {
        format!("{}/d/{}", self.base_url, id)
    }

    /// Fetch mapset metadata.
    pub async fn fetch_metadata(&self, id: &MapsetId) -> Result<MapsetMetadata> {
        let fetch_error = |source| ItemError::MetadataFetch {
            mapset_id: id.to_string(),
            source,
        };

        let url = self.metadata_url(id);
        debug!(url = %url, "Fetching mapset metadata");

        self.client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?
            .json::<MapsetMetadata>()
            .await
            .map_err(fetch_error)
    }

    /// Download the mapset archive to `dest`. Returns the number of bytes written.
    pub async fn download_archive(&self, id: &MapsetId, dest: &Path) -> Result<u64> {
        let url = self.download_url(id);
        let download_error = |reason: String| ItemError::ArchiveDownload {
            url: url.clone(),
            reason,
        };

        let start = Instant::now();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(download_error(format!("HTTP {status} - {}", body.trim())));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut size = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_error(e.to_string()))?;
            file.write_all(&chunk).await?;
            size += chunk.len() as u64;
        }
        file.flush().await?;

        info!(
            file = %dest.display(),
            size = %format_bytes(size),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Downloaded archive"
        );

        Ok(size)
    }
}

/// Format bytes with appropriate unit.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    const GIB: u64 = 1024 * 1024 * 1024;

    if bytes >= GIB {
        format!("{:.2} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}
