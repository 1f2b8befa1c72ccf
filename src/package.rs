//! Archive extraction and repackaging.
//!
//! `.osz` files are plain zip archives. Extraction goes to a scratch
//! directory; repackaging walks that directory and writes a fresh archive.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{ItemError, Result};

/// How the repackaged archive is named relative to the downloaded one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputNaming {
    /// `2273815.osz` becomes `2273815_modified.osz`.
    #[default]
    Suffix,
    /// `2273815.osz` becomes `modified_2273815.osz`.
    Prefix,
}

impl OutputNaming {
    pub fn file_name(&self, archive_name: &str) -> String {
        match self {
            Self::Suffix => {
                let path = Path::new(archive_name);
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(archive_name);
                match path.extension().and_then(|e| e.to_str()) {
                    Some(ext) => format!("{stem}_modified.{ext}"),
                    None => format!("{stem}_modified"),
                }
            }
            Self::Prefix => format!("modified_{archive_name}"),
        }
    }
}

impl FromStr for OutputNaming {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suffix" => Ok(Self::Suffix),
            "prefix" => Ok(Self::Prefix),
            other => Err(format!("unknown output naming `{other}` (expected suffix or prefix)")),
        }
    }
}

impl fmt::Display for OutputNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suffix => f.write_str("suffix"),
            Self::Prefix => f.write_str("prefix"),
        }
    }
}

/// Extract `archive` into `dest`. Returns the number of entries.
pub fn extract(archive: &Path, dest: &Path) -> Result<usize> {
    let invalid = |source| ItemError::ArchiveExtract {
        path: archive.to_path_buf(),
        source,
    };

    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(invalid)?;
    fs::create_dir_all(dest)?;
    zip.extract(dest).map_err(invalid)?;

    debug!(archive = %archive.display(), entries = zip.len(), "Extracted archive");
    Ok(zip.len())
}

/// Write every file under `source_dir` into a new archive at `output`.
///
/// Entries are added in sorted order with `/`-separated relative names. The
/// archive is assembled in a temporary file next to `output` and moved into
/// place only once complete. Returns the number of files written.
pub fn repack(source_dir: &Path, output: &Path) -> Result<usize> {
    let failed = |source| ItemError::ArchiveWrite {
        path: output.to_path_buf(),
        source,
    };

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let files = collect_files(source_dir)?;
    let mut temp = tempfile::Builder::new()
        .prefix(".repack-")
        .suffix(".tmp")
        .tempfile_in(parent)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(&mut temp);
    for path in &files {
        let name = entry_name(source_dir, path);
        zip.start_file(name, options).map_err(failed)?;
        let mut input = File::open(path)?;
        io::copy(&mut input, &mut zip)?;
    }
    zip.finish().map_err(failed)?;

    temp.persist(output).map_err(|e| ItemError::Io(e.error))?;

    debug!(output = %output.display(), files = files.len(), "Wrote archive");
    Ok(files.len())
}

/// Archive entry name of `path` relative to `root`.
fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// All regular files under `root`, recursively, in sorted order.
pub(crate) fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() {
                files.push(entry.path());
            }
        }
    }

    files.sort();
    Ok(files)
}
