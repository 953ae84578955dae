use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use fs2::FileExt;

/// Exclusive advisory lock on the state file, held for the lifetime of the
/// value. Two invocations never read-modify-write `state.toml` at once.
pub struct StateLock {
    file: File,
}

impl StateLock {
    /// Fails right away when another process holds the lock.
    pub fn acquire(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("opening {}", path.display()))?;

        if file.try_lock_exclusive().is_err() {
            bail!(
                "another gallery process is using {}",
                path.parent().unwrap_or(path).display()
            );
        }

        // the holder's pid is only replaced once the lock is ours
        let _ = file.set_len(0);
        let _ = write!(file, "{}", std::process::id());
        Ok(Self { file })
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_lock_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.lock");

        let first = StateLock::acquire(&path).unwrap();
        assert!(StateLock::acquire(&path).is_err());
        // a refused attempt leaves the holder's pid in place
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            std::process::id().to_string()
        );

        drop(first);
        assert!(StateLock::acquire(&path).is_ok());
    }
}
