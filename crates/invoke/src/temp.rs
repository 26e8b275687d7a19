use crate::error::{InvokeError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::NamedTempFile;

const PREFIX: &str = "codeprompt-";

/// Creates scratch files for snippets
#[derive(Debug, Clone, Default)]
pub struct TempArtifactManager {
    dir: Option<PathBuf>,
}

impl TempArtifactManager {
    /// Files go to `dir`, or the OS temp dir when `None`
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Write `content` to a new uniquely named `codeprompt-XXXXXX.<extension>`
    pub fn write(&self, content: &str, extension: &str) -> Result<TempArtifact> {
        let suffix = format!(".{}", extension.trim_start_matches('.'));
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX).suffix(&suffix);
        let mut file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(InvokeError::TempWrite)?;

        file.write_all(content.as_bytes())
            .and_then(|()| file.flush())
            .map_err(InvokeError::TempWrite)?;

        log::debug!(
            "wrote {} bytes to {}",
            content.len(),
            file.path().display()
        );
        Ok(TempArtifact {
            file,
            extension: extension.trim_start_matches('.').to_string(),
        })
    }
}

/// A scratch file that exists exactly as long as this value.
///
/// Dropping it deletes the file.
#[derive(Debug)]
pub struct TempArtifact {
    file: NamedTempFile,
    extension: String,
}

impl TempArtifact {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Read the content back from disk
    pub fn read(&self) -> Result<String> {
        std::fs::read_to_string(self.path()).map_err(|source| InvokeError::TempRead {
            path: self.path().to_path_buf(),
            source,
        })
    }

    /// Hand the file to a release thread.
    ///
    /// The file is deleted when the returned handle is released or dropped,
    /// or once `timeout` has elapsed, whichever comes first.
    pub fn release_after(self, timeout: Duration) -> ReleaseHandle {
        let path = self.path().to_path_buf();
        let (tx, rx) = mpsc::channel::<()>();
        let spawned = thread::Builder::new()
            .name("codeprompt-temp-release".to_string())
            .spawn(move || {
                let reason = match rx.recv_timeout(timeout) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => "released",
                    Err(mpsc::RecvTimeoutError::Timeout) => "timed out",
                };
                let path = self.path().to_path_buf();
                drop(self);
                log::debug!("removed {} ({reason})", path.display());
            });

        match spawned {
            Ok(join) => ReleaseHandle {
                path,
                tx: Some(tx),
                join: Some(join),
            },
            Err(e) => {
                // The closure (and the artifact in it) was dropped with the
                // failed spawn, so the file is already gone.
                log::warn!("could not start temp release thread: {e}");
                ReleaseHandle {
                    path,
                    tx: None,
                    join: None,
                }
            }
        }
    }
}

/// Pending deletion of a [`TempArtifact`]
#[derive(Debug)]
pub struct ReleaseHandle {
    path: PathBuf,
    tx: Option<Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl ReleaseHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete now and wait until the file is gone
    pub fn release(mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                log::warn!("temp release thread panicked for {}", self.path.display());
            }
        }
    }
}

impl Drop for ReleaseHandle {
    fn drop(&mut self) {
        // Disconnecting wakes the release thread.
        self.tx.take();
    }
}

/// Best-effort deletion of `path` after `delay`, detached from any owner.
///
/// Nothing waits for it; a missing file is not an error.
pub fn schedule_delete(path: impl Into<PathBuf>, delay: Duration) {
    let path = path.into();
    let result = thread::Builder::new()
        .name("codeprompt-delete".to_string())
        .spawn(move || {
            thread::sleep(delay);
            match std::fs::remove_file(&path) {
                Ok(()) => log::debug!("deleted {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("failed to delete {}: {e}", path.display()),
            }
        });
    if let Err(e) = result {
        log::warn!("could not schedule deletion: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn wait_until_gone(path: &Path, limit: Duration) -> bool {
        let start = Instant::now();
        while start.elapsed() < limit {
            if !path.exists() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        !path.exists()
    }

    #[test]
    fn write_creates_named_file_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let manager = TempArtifactManager::new(Some(dir.path().to_path_buf()));
        let artifact = manager.write("print(1)", "py").unwrap();

        let name = artifact.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(PREFIX), "{name}");
        assert!(name.ends_with(".py"), "{name}");
        assert_eq!(artifact.read().unwrap(), "print(1)");
        assert_eq!(artifact.extension(), "py");
    }

    #[test]
    fn names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let manager = TempArtifactManager::new(Some(dir.path().to_path_buf()));
        let a = manager.write("a", ".rs").unwrap();
        let b = manager.write("b", "rs").unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn drop_deletes() {
        let manager = TempArtifactManager::default();
        let artifact = manager.write("x", "txt").unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn release_deletes_immediately() {
        let manager = TempArtifactManager::default();
        let artifact = manager.write("x", "txt").unwrap();
        let handle = artifact.release_after(Duration::from_secs(60));
        let path = handle.path().to_path_buf();
        assert!(path.exists());
        handle.release();
        assert!(!path.exists());
    }

    #[test]
    fn dropping_handle_releases() {
        let manager = TempArtifactManager::default();
        let handle = manager
            .write("x", "txt")
            .unwrap()
            .release_after(Duration::from_secs(60));
        let path = handle.path().to_path_buf();
        drop(handle);
        assert!(wait_until_gone(&path, Duration::from_secs(5)));
    }

    #[test]
    fn timeout_releases_without_handle_activity() {
        let manager = TempArtifactManager::default();
        let handle = manager
            .write("x", "txt")
            .unwrap()
            .release_after(Duration::from_millis(20));
        let path = handle.path().to_path_buf();
        assert!(wait_until_gone(&path, Duration::from_secs(5)));
        // The handle outlived the file; releasing it is harmless.
        handle.release();
    }

    #[test]
    fn write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let manager = TempArtifactManager::new(Some(dir.path().join("nope")));
        assert!(matches!(
            manager.write("x", "txt"),
            Err(InvokeError::TempWrite(_))
        ));
    }

    #[test]
    fn schedule_delete_is_eventual() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.txt");
        std::fs::write(&path, "x").unwrap();
        schedule_delete(&path, Duration::from_millis(10));
        assert!(wait_until_gone(&path, Duration::from_secs(5)));
        // Missing files are ignored.
        schedule_delete(dir.path().join("never.txt"), Duration::ZERO);
    }
}
