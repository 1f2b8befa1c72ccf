//! Line classification for `.osu` description files.

use std::borrow::Cow;

use super::version::strip_possessive;

/// A description-file line, classified by the field it carries.
///
/// Only the fields that get rewritten are distinguished; everything else
/// (section headers, hit objects, timing points) is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Creator,
    BeatmapId,
    BeatmapSetId,
    /// Raw text after `Version:`, untrimmed.
    Version(&'a str),
    Other,
}

const CREATOR: &str = "Creator:";
const BEATMAP_ID: &str = "BeatmapID:";
const BEATMAP_SET_ID: &str = "BeatmapSetID:";
const VERSION: &str = "Version:";

impl<'a> Line<'a> {
    /// Classify a line (without its terminator). First matching prefix wins.
    pub fn classify(line: &'a str) -> Self {
        if line.starts_with(CREATOR) {
            Self::Creator
        } else if line.starts_with(BEATMAP_ID) {
            Self::BeatmapId
        } else if line.starts_with(BEATMAP_SET_ID) {
            Self::BeatmapSetId
        } else if let Some(value) = line.strip_prefix(VERSION) {
            Self::Version(value)
        } else {
            Self::Other
        }
    }
}

/// Rewrite a single line for the new creator.
///
/// Returns the input borrowed when the line is left alone, so callers can
/// tell untouched lines apart without comparing strings.
pub fn rewrite_line<'a>(line: &'a str, creator_id: &str) -> Cow<'a, str> {
    match Line::classify(line) {
        Line::Creator => Cow::Owned(format!("{CREATOR} {creator_id}")),
        Line::BeatmapId => Cow::Owned(format!("{BEATMAP_ID} 0")),
        Line::BeatmapSetId => Cow::Owned(format!("{BEATMAP_SET_ID} -1")),
        Line::Version(value) => match strip_possessive(value) {
            Some(name) => Cow::Owned(format!("{VERSION} {name}")),
            None => Cow::Borrowed(line),
        },
        Line::Other => Cow::Borrowed(line),
    }
}
