//! File names for rewritten description files.

use std::fmt;
use std::str::FromStr;

/// Characters that cannot appear in a file name on common filesystems.
const RESERVED_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// How rewritten description files are named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenameStyle {
    /// `{stem} ({creator}).osu`
    #[default]
    Simple,
    /// `{artist} - {title} ({creator}) [{difficulty}].osu`, rebuilt from the
    /// mapset metadata.
    Metadata,
}

impl FromStr for RenameStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "metadata" => Ok(Self::Metadata),
            other => Err(format!("unknown rename style `{other}` (expected simple or metadata)")),
        }
    }
}

impl fmt::Display for RenameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
            Self::Metadata => f.write_str("metadata"),
        }
    }
}

/// A rename style bound to the values it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameRule {
    Simple,
    Metadata { artist: String, title: String },
}

impl RenameRule {
    /// New file name for `original`, attributed to `creator_id`.
    pub fn file_name(&self, original: &str, creator_id: &str) -> String {
        match self {
            Self::Simple => {
                let stem = original.split(".osu").next().unwrap_or(original);
                format!("{stem} ({creator_id}).osu")
            }
            Self::Metadata { artist, title } => {
                // Everything after the first `[`, closing bracket and extension included.
                let difficulty = original.split_once('[').map_or(original, |(_, tag)| tag);
                format!(
                    "{} - {} ({creator_id}) [{difficulty}",
                    sanitize(artist),
                    sanitize(title)
                )
            }
        }
    }
}

fn sanitize(component: &str) -> String {
    component.chars().filter(|c| !RESERVED_CHARS.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple() {
        let name = RenameRule::Simple.file_name("Artist - Song (Orig) [Hard].osu", "777");
        assert_eq!(name, "Artist - Song (Orig) [Hard] (777).osu");
    }

    #[test]
    fn test_metadata() {
        let rule = RenameRule::Metadata {
            artist: "A".into(),
            title: "T".into(),
        };
        assert_eq!(
            rule.file_name("A - T (Orig) [Orig's Hard].osu", "777"),
            "A - T (777) [Orig's Hard].osu"
        );
    }

    #[test]
    fn test_metadata_without_bracket_keeps_whole_name() {
        let rule = RenameRule::Metadata {
            artist: "A".into(),
            title: "T".into(),
        };
        assert_eq!(rule.file_name("plain.osu", "5"), "A - T (5) [plain.osu");
    }

    #[test]
    fn test_metadata_strips_reserved_chars() {
        let rule = RenameRule::Metadata {
            artist: "AC/DC".into(),
            title: "What?".into(),
        };
        assert_eq!(rule.file_name("x [Easy].osu", "1"), "ACDC - What (1) [Easy].osu");
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("simple".parse::<RenameStyle>(), Ok(RenameStyle::Simple));
        assert_eq!("Metadata".parse::<RenameStyle>(), Ok(RenameStyle::Metadata));
        assert!("fancy".parse::<RenameStyle>().is_err());
        assert_eq!(RenameStyle::Metadata.to_string(), "metadata");
    }
}
