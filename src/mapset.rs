//! Mapset identifiers and the URLs they come from.

use std::fmt;

use crate::error::{ItemError, Result};

/// Identifier of a remote beatmap set.
///
/// Opaque on purpose: mirrors accept whatever follows the last `/` of a
/// beatmapset URL, so no numeric parsing is done here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapsetId(String);

impl MapsetId {
    /// Wrap an identifier that is already known to be valid.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extract a mapset ID from a URL.
    ///
    /// Supported shapes:
    /// - `https://osu.ppy.sh/beatmapsets/2273815#osu/4844304`
    /// - `https://osu.ppy.sh/s/2273815`
    ///
    /// The fragment is dropped first, then the last path segment is taken.
    pub fn from_url(url: &str) -> Result<Self> {
        let trimmed = url.trim();
        let without_fragment = trimmed.split('#').next().unwrap_or_default();

        let recognized = without_fragment.contains("beatmapsets")
            || without_fragment.split('/').any(|segment| segment == "s");
        if !recognized {
            return Err(ItemError::UnrecognizedUrlFormat(url.to_string()));
        }

        match without_fragment.rsplit('/').next() {
            Some(id) if !id.is_empty() => Ok(Self(id.to_string())),
            _ => Err(ItemError::UnrecognizedUrlFormat(url.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name the downloaded archive is stored under.
    pub fn archive_file_name(&self) -> String {
        format!("{}.osz", self.0)
    }
}

impl fmt::Display for MapsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read a URL list: one URL per line, blank lines and `#` comments ignored.
pub fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
