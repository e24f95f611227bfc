use std::path::{Path, PathBuf};

use tracing::{debug, warn};

// ============================================================================
// Artifact scanner — read-only access to result files and the coverage export
// ============================================================================

/// Raw content of one result file, tagged with where it came from.
#[derive(Debug, Clone)]
pub struct ResultFile {
    pub path: PathBuf,
    pub content: String,
}

/// Lazily read every file in `dir` whose extension is exactly `extension`.
///
/// Paths are listed up front and sorted so the iteration order is stable;
/// contents are only read as the iterator advances. A missing or unreadable
/// directory yields an empty sequence and a file that cannot be opened is
/// skipped. Invalid UTF-8 is replaced rather than rejected.
pub fn scan_results(dir: &Path, extension: &str) -> impl Iterator<Item = ResultFile> + use<> {
    list_result_paths(dir, extension)
        .into_iter()
        .filter_map(|path| match read_lossy(&path) {
            Ok(content) => Some(ResultFile { path, content }),
            Err(e) => {
                debug!("skipping unreadable result file {}: {}", path.display(), e);
                None
            }
        })
}

/// Sorted paths of the result files in `dir`. Extension matching is case-sensitive.
pub fn list_result_paths(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("results directory {} not readable: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| p.extension().map_or(false, |e| e == extension))
        .collect();

    paths.sort();
    debug!("found {} result files in {}", paths.len(), dir.display());
    paths
}

/// Read the coverage export if `path` is an existing regular file.
///
/// `None` means "no coverage available", which degrades the coverage
/// figure to 0 rather than failing the run.
pub fn read_coverage(path: &Path) -> Option<String> {
    if !path.is_file() {
        warn!("coverage file not found: {}", path.display());
        return None;
    }

    match read_lossy(path) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("coverage file {} not readable: {}", path.display(), e);
            None
        }
    }
}

/// Read a file as text, replacing invalid UTF-8 sequences with U+FFFD.
fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("{} is not valid UTF-8, decoding lossily", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}
