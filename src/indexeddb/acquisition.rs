//! Safe acquisition of IndexedDB directories that a running browser may hold locked.
//!
//! In safe mode the whole directory tree is copied into a fresh temporary directory
//! and the decoder reads the copy. The copy is a best-effort point-in-time snapshot:
//! files are copied one by one, so it is not atomic with respect to LevelDB's own
//! write batches. The temporary directory is owned by [`Acquired`] and removed when it
//! is released or dropped, including on error and panic paths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ExtractError, ExtractResult};

const TEMP_PREFIX: &str = "indexeddb_";

/// A directory that is safe to hand to a decode backend
#[derive(Debug)]
pub enum Acquired {
    /// The live directory, read in place
    Live(PathBuf),
    /// A copy inside a temporary directory that is deleted on release
    Snapshot { dir: TempDir, path: PathBuf },
}

impl Acquired {
    pub fn path(&self) -> &Path {
        match self {
            Acquired::Live(path) => path,
            Acquired::Snapshot { path, .. } => path,
        }
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, Acquired::Snapshot { .. })
    }

    /// Delete the snapshot, if any. Removal failures are logged, not returned.
    pub fn release(self) {
        if let Acquired::Snapshot { dir, .. } = self {
            let temp_path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                warn!("Failed to remove temporary copy {}: {}", temp_path.display(), e);
            } else {
                debug!("Removed temporary copy {}", temp_path.display());
            }
        }
    }
}

/// Acquire `source` for reading
///
/// Without `safe_copy` the path is returned unchanged. With it, the tree is copied into
/// a new temporary directory under `temp_root` (system temp dir if `None`).
///
/// # Errors
///
/// Returns [`ExtractError::AcquisitionFailed`] if the temporary directory cannot be
/// created or any file fails to copy. Nothing is left behind in that case.
pub fn acquire(
    source: &Path,
    safe_copy: bool,
    temp_root: Option<&Path>,
) -> ExtractResult<Acquired> {
    if !safe_copy {
        return Ok(Acquired::Live(source.to_path_buf()));
    }

    let failed =
        |e: io::Error| ExtractError::AcquisitionFailed { path: source.to_path_buf(), source: e };

    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX);
    let dir = match temp_root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
    .map_err(failed)?;

    let name = source.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "store".into());
    let dest = dir.path().join(name);

    // On failure `dir` is dropped here, removing the partial copy
    copy_tree(source, &dest).map_err(failed)?;
    debug!("Copied {} to {}", source.display(), dest.display());

    Ok(Acquired::Snapshot { dir, path: dest })
}

/// Run `read` against an acquired copy of `source`, releasing it afterwards
///
/// The snapshot is released whatever `read` returns.
pub fn with_acquired<T>(
    source: &Path,
    safe_copy: bool,
    temp_root: Option<&Path>,
    read: impl FnOnce(&Path) -> T,
) -> ExtractResult<T> {
    let acquired = acquire(source, safe_copy, temp_root)?;
    let result = read(acquired.path());
    acquired.release();
    Ok(result)
}

fn copy_tree(source: &Path, dest: &Path) -> io::Result<()> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(source).map_err(io::Error::other)?;
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)?;
        } else {
            debug!("Not copying special file {}", entry.path().display());
        }
    }
    Ok(())
}
