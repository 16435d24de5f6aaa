//! Side-car persistence of run artifacts.
//!
//! Layout, for a working directory holding a sweep:
//! ```text
//! ./
//!   run_phil2.csp     # rendered configuration
//!   run_phil2.json    # artifact for that configuration
//!   run_phil3.csp
//!   run_phil3.json
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::StoreError;
use crate::model::RunArtifact;

/// Extension of persisted artifacts
pub const ARTIFACT_EXTENSION: &str = "json";

/// Artifact path for a rendered configuration: same base name, `.json`
#[must_use]
pub fn artifact_path(rendered: &Path) -> PathBuf {
    rendered.with_extension(ARTIFACT_EXTENSION)
}

/// Persist an artifact next to its rendered configuration.
///
/// Overwrites any artifact already there. Returns the path written.
pub fn persist(artifact: &RunArtifact, rendered: &Path) -> Result<PathBuf, StoreError> {
    let path = artifact_path(rendered);
    let json = to_pretty_json(artifact)?;
    atomic_write_bytes(&path, &json)
        .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(path)
}

/// Load a persisted artifact
pub fn load(path: &Path) -> Result<RunArtifact, StoreError> {
    let content = fs::read_to_string(path)
        .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| StoreError::Parse(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Artifact files in `dir` whose name starts with `prefix`, sorted by name
pub fn scan(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, StoreError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| StoreError::Io(format!("Failed to list {}: {}", dir.display(), e)))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            let name_matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix));
            let ext_matches = path
                .extension()
                .is_some_and(|e| e == ARTIFACT_EXTENSION);
            name_matches && ext_matches
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// JSON with 4-space indentation
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| StoreError::Serialize(e.to_string()))?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write bytes to a file atomically using write-then-rename pattern.
fn atomic_write_bytes(path: &Path, content: &[u8]) -> io::Result<()> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
