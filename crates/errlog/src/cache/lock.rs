use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::CacheError;

/// Exclusive advisory lock on `<cache>.lock`, released on drop.
///
/// Held from restore through persist so two invocations sharing a cache
/// never interleave their read-modify-write cycles.
#[derive(Debug)]
pub struct CacheLock {
    file: File,
    path: PathBuf,
}

impl CacheLock {
    /// Block until the lock for `cache_path` is acquired.
    pub fn acquire(cache_path: &Path) -> Result<Self, CacheError> {
        let path = lock_path(cache_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| CacheError::io(&path, e))?;

        // Blocks if another process holds the lock
        file.lock_exclusive().map_err(|source| CacheError::Lock {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "cache: lock acquired");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "cache: failed to release lock");
        }
    }
}

pub fn lock_path(cache_path: &Path) -> PathBuf {
    let mut name = cache_path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_path_appends_suffix() {
        assert_eq!(
            lock_path(Path::new("/tmp/errlog.cache")),
            PathBuf::from("/tmp/errlog.cache.lock")
        );
    }

    #[test]
    fn test_lock_excludes_second_holder() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("nested").join("errlog.cache");

        let lock = CacheLock::acquire(&cache).unwrap();
        assert!(lock.path().exists());

        let other = File::open(lock.path()).unwrap();
        assert!(other.try_lock_exclusive().is_err(), "lock should be held");

        drop(lock);
        assert!(other.try_lock_exclusive().is_ok(), "lock should be released on drop");
    }
}
