//! Run configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::mirror::DEFAULT_MIRROR_URL;
use crate::package::OutputNaming;
use crate::rewrite::RenameStyle;

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Mirror base URL, without trailing slash.
    pub mirror_url: String,

    /// Directory the repackaged archives are written to.
    pub output_dir: PathBuf,

    /// Directory per-item scratch directories are created in.
    /// Each item gets its own uniquely named directory, removed when the
    /// item finishes regardless of outcome.
    pub work_dir: PathBuf,

    /// How rewritten description files are named.
    pub rename_style: RenameStyle,

    /// How output archives are named.
    pub output_naming: OutputNaming,

    /// Per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl RunConfig {
    /// Create a config writing to `output_dir`, with defaults elsewhere.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            mirror_url: DEFAULT_MIRROR_URL.to_string(),
            output_dir: output_dir.into(),
            work_dir: std::env::temp_dir(),
            rename_style: RenameStyle::default(),
            output_naming: OutputNaming::default(),
            timeout: None,
        }
    }

    pub fn with_mirror_url(mut self, url: impl Into<String>) -> Self {
        self.mirror_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_rename_style(mut self, style: RenameStyle) -> Self {
        self.rename_style = style;
        self
    }

    pub fn with_output_naming(mut self, naming: OutputNaming) -> Self {
        self.output_naming = naming;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new("Maps")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.mirror_url, "https://catboy.best");
        assert_eq!(config.output_dir, PathBuf::from("Maps"));
        assert_eq!(config.rename_style, RenameStyle::Simple);
        assert_eq!(config.output_naming, OutputNaming::Suffix);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_builders() {
        let config = RunConfig::new("out")
            .with_mirror_url("http://localhost:9000/")
            .with_work_dir("/tmp/work")
            .with_rename_style(RenameStyle::Metadata)
            .with_output_naming(OutputNaming::Prefix)
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.mirror_url, "http://localhost:9000");
        assert_eq!(config.work_dir, PathBuf::from("/tmp/work"));
        assert_eq!(config.rename_style, RenameStyle::Metadata);
        assert_eq!(config.output_naming, OutputNaming::Prefix);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }
}
