//! Per-URL processing pipeline.
//!
//! Each URL runs through the stages strictly in order:
//!
//! ```text
//! ParseId → FetchMetadata → DownloadArchive → ExtractAndRewrite → Repackage → CleanupOriginal → Done
//! ```
//!
//! A failure at any stage ends that item; the batch moves on to the next URL.
//! Every item works inside its own scratch directory, removed when the item
//! finishes whichever way it finishes.

use std::fmt;
use std::io;
use std::path::PathBuf;

use tempfile::TempDir;
use tracing::{error, info, warn};

use crate::config::RunConfig;
use crate::error::{ItemError, Result};
use crate::mapset::MapsetId;
use crate::mirror::{MapsetMetadata, MirrorClient};
use crate::package;
use crate::rewrite::{self, RenameRule, RenameStyle, RewriteJob};

/// Pipeline stage, used to report where an item stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ParseId,
    FetchMetadata,
    DownloadArchive,
    ExtractAndRewrite,
    Repackage,
    CleanupOriginal,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParseId => "parse_id",
            Self::FetchMetadata => "fetch_metadata",
            Self::DownloadArchive => "download_archive",
            Self::ExtractAndRewrite => "extract_and_rewrite",
            Self::Repackage => "repackage",
            Self::CleanupOriginal => "cleanup_original",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// A successfully processed mapset.
#[derive(Debug, Clone)]
pub struct ItemReport {
    pub mapset_id: MapsetId,
    pub creator_id: u64,
    /// Number of description files rewritten.
    pub descriptions: usize,
    /// Total number of files in the produced archive.
    pub files: usize,
    pub output: PathBuf,
}

/// How processing one URL ended.
#[derive(Debug)]
pub enum ItemOutcome {
    Done(ItemReport),
    /// The URL was not recognised; nothing was fetched.
    Skipped(ItemError),
    Failed { stage: Stage, error: ItemError },
}

/// Totals for a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outputs: Vec<PathBuf>,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outputs.len()
    }

    pub fn total(&self) -> usize {
        self.succeeded() + self.skipped + self.failed
    }
}

/// Drives mapsets from URL to rewritten archive.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RunConfig,
    mirror: MirrorClient,
}

impl Pipeline {
    /// Create a pipeline with an HTTP client built from `config`.
    pub fn new(config: RunConfig) -> reqwest::Result<Self> {
        let mirror = MirrorClient::from_config(&config)?;
        Ok(Self { config, mirror })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Process every URL in order. Per-item errors are logged, never returned.
    pub async fn run_batch(&self, urls: &[String]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for url in urls {
            match self.process_url(url).await {
                ItemOutcome::Done(report) => summary.outputs.push(report.output),
                ItemOutcome::Skipped(_) => summary.skipped += 1,
                ItemOutcome::Failed { .. } => summary.failed += 1,
            }
        }

        info!(
            total = summary.total(),
            succeeded = summary.succeeded(),
            skipped = summary.skipped,
            failed = summary.failed,
            "Batch complete"
        );

        summary
    }

    /// Process a single URL.
    pub async fn process_url(&self, url: &str) -> ItemOutcome {
        info!(url = %url, "Processing URL");

        let mut stage = Stage::ParseId;
        match self.run_item(url, &mut stage).await {
            Ok(report) => {
                info!(
                    url = %url,
                    mapset_id = %report.mapset_id,
                    output = %report.output.display(),
                    descriptions = report.descriptions,
                    "Created modified archive"
                );
                ItemOutcome::Done(report)
            }
            Err(error) if error.is_skip() => {
                warn!(url = %url, error = %error, "Skipping URL");
                ItemOutcome::Skipped(error)
            }
            Err(error) => {
                error!(url = %url, stage = %stage, error = %error, "Failed to process mapset");
                ItemOutcome::Failed { stage, error }
            }
        }
    }

    async fn run_item(&self, url: &str, stage: &mut Stage) -> Result<ItemReport> {
        *stage = Stage::ParseId;
        let mapset_id = MapsetId::from_url(url)?;

        *stage = Stage::FetchMetadata;
        let metadata = self.mirror.fetch_metadata(&mapset_id).await?;
        let creator_id = metadata.require_user_id(&mapset_id)?;
        let rename = self.rename_rule(&metadata, &mapset_id)?;
        info!(mapset_id = %mapset_id, user_id = creator_id, "Mapper user ID");

        *stage = Stage::DownloadArchive;
        let scratch = self.scratch_dir()?;
        let archive_name = mapset_id.archive_file_name();
        let archive_path = scratch.path().join(&archive_name);
        self.mirror.download_archive(&mapset_id, &archive_path).await?;

        *stage = Stage::ExtractAndRewrite;
        let extracted = scratch.path().join("extracted");
        let job = RewriteJob {
            creator_id: creator_id.to_string(),
            rename,
        };
        let rewritten = {
            let archive_path = archive_path.clone();
            let extracted = extracted.clone();
            blocking(move || {
                package::extract(&archive_path, &extracted)?;
                rewrite::rewrite_directory(&extracted, &job)
            })
            .await?
        };
        if rewritten.is_empty() {
            warn!(mapset_id = %mapset_id, "Archive contains no description files");
        }

        *stage = Stage::Repackage;
        let output = self
            .config
            .output_dir
            .join(self.config.output_naming.file_name(&archive_name));
        let files = {
            let output = output.clone();
            blocking(move || package::repack(&extracted, &output)).await?
        };

        *stage = Stage::CleanupOriginal;
        tokio::fs::remove_file(&archive_path).await?;
        info!(file = %archive_name, "Deleted original archive");
        if let Err(e) = scratch.close() {
            warn!(error = %e, "Failed to remove scratch directory");
        }

        *stage = Stage::Done;
        Ok(ItemReport {
            mapset_id,
            creator_id,
            descriptions: rewritten.len(),
            files,
            output,
        })
    }

    fn rename_rule(&self, metadata: &MapsetMetadata, id: &MapsetId) -> Result<RenameRule> {
        Ok(match self.config.rename_style {
            RenameStyle::Simple => RenameRule::Simple,
            RenameStyle::Metadata => RenameRule::Metadata {
                artist: metadata.require_artist(id)?.to_string(),
                title: metadata.require_title(id)?.to_string(),
            },
        })
    }

    /// Uniquely named scratch directory for one item.
    fn scratch_dir(&self) -> Result<TempDir> {
        std::fs::create_dir_all(&self.config.work_dir)?;
        Ok(tempfile::Builder::new()
            .prefix("osz-rewriter-")
            .tempdir_in(&self.config.work_dir)?)
    }
}

/// Run blocking archive work off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ItemError::Io(io::Error::other(e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::ParseId.to_string(), "parse_id");
        assert_eq!(Stage::ExtractAndRewrite.to_string(), "extract_and_rewrite");
        assert_eq!(Stage::CleanupOriginal.to_string(), "cleanup_original");
    }

    #[test]
    fn test_summary_totals() {
        let summary = BatchSummary {
            outputs: vec![PathBuf::from("Maps/1_modified.osz")],
            skipped: 2,
            failed: 1,
        };
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.total(), 4);
    }

    #[tokio::test]
    async fn test_unrecognized_url_is_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let config = RunConfig::new(temp.path().join("Maps"))
            .with_mirror_url("http://127.0.0.1:1")
            .with_work_dir(temp.path().join("work"));
        let pipeline = Pipeline::new(config).unwrap();

        let outcome = pipeline.process_url("https://example.com/other/xyz").await;
        assert!(matches!(
            outcome,
            ItemOutcome::Skipped(ItemError::UnrecognizedUrlFormat(_))
        ));
        assert!(!temp.path().join("Maps").exists());
    }

    #[tokio::test]
    async fn test_unreachable_mirror_fails_at_metadata() {
        let temp = tempfile::tempdir().unwrap();
        let config = RunConfig::new(temp.path().join("Maps"))
            .with_mirror_url("http://127.0.0.1:1")
            .with_work_dir(temp.path().join("work"));
        let pipeline = Pipeline::new(config).unwrap();

        let outcome = pipeline.process_url("https://osu.ppy.sh/s/1").await;
        assert!(matches!(
            outcome,
            ItemOutcome::Failed {
                stage: Stage::FetchMetadata,
                error: ItemError::MetadataFetch { .. },
            }
        ));
    }
}
