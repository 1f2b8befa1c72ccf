//! osz-rewriter - re-attribute beatmap sets to a new mapper.
//!
//! For every mapset URL in a list, the set's metadata and `.osz` archive are
//! fetched from a mirror, every `.osu` description file inside is rewritten
//! (`Creator`, `BeatmapID`, `BeatmapSetID`, `Version`) and renamed, and the
//! result is packed into a new archive.
//!
//! # Pipeline
//!
//! ```text
//!  urls.txt ──► mapset::MapsetId ──► mirror::MirrorClient ──► package::extract
//!                                                                   │
//!  Maps/*_modified.osz ◄── package::repack ◄── rewrite::rewrite_directory
//! ```
//!
//! Items are processed one at a time. A failing item is logged and skipped;
//! it never stops the batch.

/// Run configuration.
pub mod config;

/// Per-item errors.
pub mod error;

/// Mapset identifiers and URL parsing.
pub mod mapset;

/// Mirror API client.
pub mod mirror;

/// Archive extraction and repackaging.
pub mod package;

/// Per-URL pipeline and batch driver.
pub mod pipeline;

/// Description file rewriting.
pub mod rewrite;

pub use config::RunConfig;
pub use error::ItemError;
pub use mapset::MapsetId;
pub use mirror::{MapsetMetadata, MirrorClient};
pub use package::OutputNaming;
pub use pipeline::{BatchSummary, ItemOutcome, Pipeline, Stage};
pub use rewrite::{RenameRule, RenameStyle};
