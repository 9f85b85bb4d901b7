//! Exclusive write lock for an index directory
//!
//! The lock is an OS file lock on `write.lock`, so it dies with the process
//! that holds it. The file itself is left in place; its presence means
//! nothing on its own.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::TrecdexError;
use crate::Result;

pub const LOCK_FILE: &str = "write.lock";

/// Held for the lifetime of a writer; the OS lock is released on drop
#[derive(Debug)]
pub struct IndexLock {
    path: PathBuf,
    file: File,
}

impl IndexLock {
    /// Lock `dir` for writing, failing if another writer holds it
    pub fn acquire(dir: &Path) -> Result<Self> {
        let path = dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                TrecdexError::IndexIo(format!("cannot open lock {}: {}", path.display(), e))
            })?;

        file.try_lock_exclusive().map_err(|e| {
            if e.kind() == io::ErrorKind::WouldBlock
                || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
            {
                TrecdexError::IndexLocked(dir.to_path_buf())
            } else {
                TrecdexError::IndexIo(format!("cannot lock {}: {}", path.display(), e))
            }
        })?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for IndexLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_is_exclusive_and_released() {
        let tmp = TempDir::new().unwrap();

        let lock = IndexLock::acquire(tmp.path()).unwrap();
        assert!(lock.path().exists());
        assert!(matches!(
            IndexLock::acquire(tmp.path()),
            Err(TrecdexError::IndexLocked(_))
        ));

        drop(lock);
        assert!(IndexLock::acquire(tmp.path()).is_ok());
    }

    #[test]
    fn test_leftover_lock_file_is_not_held() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(LOCK_FILE), "99999\n").unwrap();

        let lock = IndexLock::acquire(tmp.path()).unwrap();
        assert_eq!(lock.path(), tmp.path().join(LOCK_FILE));
    }
}
