//! Re-attribution of description files to a new creator.
//!
//! The rewrite is split into a pure part (`line`, `version`, `rename`) that
//! works on strings, and [`rewrite_directory`] which applies it to an
//! extracted archive on disk.

pub mod line;
pub mod rename;
pub mod version;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ItemError, Result};
use crate::package::collect_files;

pub use line::{rewrite_line, Line};
pub use rename::{RenameRule, RenameStyle};
pub use version::strip_possessive;

/// Extension of description files inside an archive.
pub const DESCRIPTION_EXTENSION: &str = ".osu";

/// What to rewrite description files to.
#[derive(Debug, Clone)]
pub struct RewriteJob {
    /// New value of the `Creator:` field, also embedded in file names.
    pub creator_id: String,
    pub rename: RenameRule,
}

/// One description file after rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenFile {
    pub original: PathBuf,
    pub renamed: PathBuf,
    /// Number of lines that changed.
    pub changed_lines: usize,
}

/// Whether a file name denotes a description file.
pub fn is_description_file(name: &str) -> bool {
    name.ends_with(DESCRIPTION_EXTENSION)
}

/// Rewrite the contents of one description file.
///
/// Each line keeps its own terminator (`\n`, `\r\n` or none), so untouched
/// lines come out byte-identical.
pub fn rewrite_description(text: &str, creator_id: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut changed = 0;

    for raw in text.split_inclusive('\n') {
        let (body, terminator) = split_terminator(raw);
        let rewritten = rewrite_line(body, creator_id);
        if rewritten != body {
            changed += 1;
        }
        out.push_str(&rewritten);
        out.push_str(terminator);
    }

    (out, changed)
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Rewrite and rename every description file under `dir`, in place.
///
/// Other files are not touched. Files are processed in sorted path order so
/// the result does not depend on directory iteration order.
pub fn rewrite_directory(dir: &Path, job: &RewriteJob) -> Result<Vec<RewrittenFile>> {
    let mut rewritten = Vec::new();

    for path in collect_files(dir)? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_description_file(name) {
            continue;
        }

        info!(file = %name, "Modifying description file");

        let bytes = fs::read(&path)?;
        let text = String::from_utf8(bytes).map_err(|_| ItemError::FileEncoding(path.clone()))?;
        let (contents, changed_lines) = rewrite_description(&text, &job.creator_id);
        fs::write(&path, contents)?;

        let new_name = job.rename.file_name(name, &job.creator_id);
        let renamed = path.with_file_name(&new_name);
        if renamed != path {
            if renamed.exists() {
                return Err(ItemError::RenameCollision {
                    from: name.to_string(),
                    to: new_name,
                });
            }
            fs::rename(&path, &renamed)?;
        }

        debug!(from = %name, to = %new_name, changed_lines, "Renamed description file");

        rewritten.push(RewrittenFile {
            original: path,
            renamed,
            changed_lines,
        });
    }

    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn job() -> RewriteJob {
        RewriteJob {
            creator_id: "777".to_string(),
            rename: RenameRule::Simple,
        }
    }

    #[test]
    fn test_rewrite_description_scenario() {
        let input = "Creator: Orig\nBeatmapID: 123\nBeatmapSetID: 456\nVersion: Orig's Hard\n";
        let (out, changed) = rewrite_description(input, "777");
        assert_eq!(out, "Creator: 777\nBeatmapID: 0\nBeatmapSetID: -1\nVersion: Hard\n");
        assert_eq!(changed, 4);
    }

    #[test]
    fn test_rewrite_preserves_terminators() {
        let input = "osu file format v14\r\n\r\n[Metadata]\r\nCreator: Orig\r\nVersion: Insane";
        let (out, changed) = rewrite_description(input, "5");
        assert_eq!(
            out,
            "osu file format v14\r\n\r\n[Metadata]\r\nCreator: 5\r\nVersion: Insane"
        );
        assert_eq!(changed, 1);
    }

    #[test]
    fn test_rewrite_final_line_without_newline() {
        let (out, _) = rewrite_description("BeatmapSetID: 9", "1");
        assert_eq!(out, "BeatmapSetID: -1");
    }

    #[test]
    fn test_rewrite_empty() {
        assert_eq!(rewrite_description("", "1"), (String::new(), 0));
    }

    #[test]
    fn test_is_description_file() {
        assert!(is_description_file("A - T (x) [Hard].osu"));
        assert!(!is_description_file("audio.mp3"));
        assert!(!is_description_file("storyboard.osb"));
    }

    #[test]
    fn test_rewrite_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(
            dir.join("A - T (Orig) [Hard].osu"),
            "Creator: Orig\nVersion: Orig's Hard\n",
        )
        .unwrap();
        fs::write(dir.join("A - T (Orig) [Easy].osu"), "Creator: Orig\nVersion: Easy\n").unwrap();
        fs::write(dir.join("audio.mp3"), [0u8, 1, 2, 3]).unwrap();

        let files = rewrite_directory(dir, &job()).unwrap();
        assert_eq!(files.len(), 2);

        let hard = fs::read_to_string(dir.join("A - T (Orig) [Hard] (777).osu")).unwrap();
        assert_eq!(hard, "Creator: 777\nVersion: Hard\n");
        let easy = fs::read_to_string(dir.join("A - T (Orig) [Easy] (777).osu")).unwrap();
        assert_eq!(easy, "Creator: 777\nVersion: Easy\n");

        assert!(!dir.join("A - T (Orig) [Hard].osu").exists());
        assert_eq!(fs::read(dir.join("audio.mp3")).unwrap(), vec![0u8, 1, 2, 3]);
    }

    #[test]
    fn test_rewrite_directory_rejects_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.osu"), [0xffu8, 0xfe, 0x00]).unwrap();

        let result = rewrite_directory(temp.path(), &job());
        assert!(matches!(result, Err(ItemError::FileEncoding(_))));
    }

    #[test]
    fn test_rewrite_directory_detects_collision() {
        let temp = TempDir::new().unwrap();
        let rule = RenameRule::Metadata {
            artist: "A".into(),
            title: "T".into(),
        };
        // Both names share the same difficulty tag, so they map to one file name.
        fs::write(temp.path().join("one [Hard].osu"), "Creator: x\n").unwrap();
        fs::write(temp.path().join("two [Hard].osu"), "Creator: y\n").unwrap();

        let job = RewriteJob {
            creator_id: "1".into(),
            rename: rule,
        };
        let result = rewrite_directory(temp.path(), &job);
        assert!(matches!(result, Err(ItemError::RenameCollision { .. })));
    }
}
