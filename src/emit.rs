//! Report emitter: versioned JSON documents, written atomically.
//!
//! Every document shares one envelope (schema version, miner, repository,
//! branch, evaluation instant) followed by the miner's payload. Payloads
//! are built from ordered maps with rounded floats, so identical input
//! renders to identical bytes.
//!
//! A run's documents are staged as temporary files next to their
//! destinations and only renamed into place once all of them were
//! written; a failure drops every staged file and leaves previous
//! outputs untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::{NamedTempFile, TempPath};

use crate::error::{MineError, MineResult};
use crate::util::format_timestamp;

pub const SCHEMA_VERSION: u32 = 1;

/// Identifies the run a document belongs to.
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub repository: String,
    pub branch: String,
    /// Evaluation instant, unix seconds.
    pub evaluated_at: i64,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: u32,
    miner: &'a str,
    repository: &'a str,
    branch: &'a str,
    evaluated_at: String,
    #[serde(flatten)]
    payload: &'a T,
}

/// A rendered document and where it goes.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Render `payload` inside the shared envelope: pretty JSON plus a
/// trailing newline.
pub fn render<T: Serialize>(info: &RunInfo, miner: &str, payload: &T) -> MineResult<Vec<u8>> {
    let envelope = Envelope {
        schema_version: SCHEMA_VERSION,
        miner,
        repository: &info.repository,
        branch: &info.branch,
        evaluated_at: format_timestamp(info.evaluated_at),
        payload,
    };
    let mut bytes = serde_json::to_vec_pretty(&envelope)
        .map_err(|e| MineError::Computation(format!("cannot serialize {miner} document: {e}")))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write all documents or none of them.
///
/// If a rename fails part way, documents already moved into place are
/// rolled back to their previous contents (or removed when they did not
/// exist before).
pub fn write_all(documents: &[Document]) -> MineResult<()> {
    let mut staged: Vec<(NamedTempFile, Option<TempPath>, &Path)> =
        Vec::with_capacity(documents.len());
    for doc in documents {
        let file = stage(doc)?;
        let previous = backup(&doc.path)?;
        staged.push((file, previous, doc.path.as_path()));
    }

    let mut persisted: Vec<(&Path, Option<TempPath>)> = Vec::with_capacity(staged.len());
    for (file, previous, path) in staged {
        if let Err(e) = file.persist(path) {
            rollback(persisted);
            return Err(MineError::OutputWrite {
                path: path.to_path_buf(),
                source: e.error,
            });
        }
        tracing::debug!(path = %path.display(), "wrote document");
        persisted.push((path, previous));
    }
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn stage(doc: &Document) -> MineResult<NamedTempFile> {
    let write_err = |source: std::io::Error| MineError::OutputWrite {
        path: doc.path.clone(),
        source,
    };

    if doc.path.is_dir() {
        return Err(write_err(std::io::Error::other("destination is a directory")));
    }
    let dir = parent_dir(&doc.path);
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(&doc.bytes).map_err(write_err)?;
    if let Some(perms) = report_permissions(&doc.path) {
        file.as_file().set_permissions(perms).map_err(write_err)?;
    }
    file.as_file().sync_all().map_err(write_err)?;
    Ok(file)
}

/// Keep the mode of a report being replaced; new reports are 0644
/// rather than the owner-only mode of a temporary file.
fn report_permissions(path: &Path) -> Option<fs::Permissions> {
    if let Ok(meta) = fs::metadata(path) {
        return Some(meta.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

/// Copy of the current destination, if any, for `rollback`.
fn backup(path: &Path) -> MineResult<Option<TempPath>> {
    if !path.is_file() {
        return Ok(None);
    }
    let write_err = |source: std::io::Error| MineError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let copy = NamedTempFile::new_in(parent_dir(path))
        .map_err(write_err)?
        .into_temp_path();
    fs::copy(path, &copy).map_err(write_err)?;
    Ok(Some(copy))
}

fn rollback(persisted: Vec<(&Path, Option<TempPath>)>) {
    for (path, previous) in persisted.into_iter().rev() {
        let restored = match previous {
            Some(copy) => copy.persist(path).map_err(|e| e.error),
            None => fs::remove_file(path),
        };
        if let Err(e) = restored {
            tracing::warn!(path = %path.display(), error = %e, "cannot roll back document");
        }
    }
}

#[cfg(test)]
#[path = "emit_test.rs"]
mod tests;
