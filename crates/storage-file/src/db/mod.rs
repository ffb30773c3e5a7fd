//! Line-oriented file access under a base directory.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use log::debug;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::errors::StorageError;

/// A directory of text files, appended to one line at a time.
///
/// Appends through one `FileDb` are serialized, so concurrent writers in this
/// process never interleave partial lines.
#[derive(Debug)]
pub struct FileDb {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileDb {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create the base directory if it does not exist yet.
    pub async fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|source| StorageError::Unavailable {
                path: self.base_dir.clone(),
                source,
            })
    }

    /// Succeeds when the base directory exists and is a directory.
    pub async fn ping(&self) -> Result<(), StorageError> {
        let metadata =
            fs::metadata(&self.base_dir)
                .await
                .map_err(|source| StorageError::Unavailable {
                    path: self.base_dir.clone(),
                    source,
                })?;

        if metadata.is_dir() {
            Ok(())
        } else {
            Err(StorageError::Unavailable {
                path: self.base_dir.clone(),
                source: std::io::Error::new(ErrorKind::Other, "not a directory"),
            })
        }
    }

    /// Append `line` followed by a newline, creating the file if needed.
    pub async fn append(&self, file: &str, line: &str) -> Result<(), StorageError> {
        let path = self.resolve(file)?;
        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };

        let _guard = self.write_lock.lock().await;

        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(io_err)?;

        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');

        handle.write_all(&data).await.map_err(io_err)?;
        handle.flush().await.map_err(io_err)?;

        debug!("Appended {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    /// Full contents of `file`; a missing file reads as empty.
    pub async fn read(&self, file: &str) -> Result<String, StorageError> {
        let path = self.resolve(file)?;
        match fs::read(&path).await {
            Ok(bytes) => String::from_utf8(bytes).map_err(|_| StorageError::Encoding { path }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    /// Only plain file names are accepted, never paths leaving `base_dir`.
    fn resolve(&self, file: &str) -> Result<PathBuf, StorageError> {
        let mut components = Path::new(file).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_dir.join(file)),
            _ => Err(StorageError::InvalidFileName(file.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_append_then_read() {
        let dir = tempdir().unwrap();
        let db = FileDb::new(dir.path());

        db.append("emails.txt", "a@x.io").await.unwrap();
        db.append("emails.txt", "b@x.io").await.unwrap();

        let contents = db.read("emails.txt").await.unwrap();
        assert_eq!(contents, "a@x.io\nb@x.io\n");
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let db = FileDb::new(dir.path());

        assert_eq!(db.read("nothing.txt").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_ping() {
        let dir = tempdir().unwrap();
        assert!(FileDb::new(dir.path()).ping().await.is_ok());

        let missing = FileDb::new(dir.path().join("missing"));
        assert!(matches!(
            missing.ping().await,
            Err(StorageError::Unavailable { .. })
        ));

        missing.init().await.unwrap();
        assert!(missing.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_ping_rejects_regular_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, b"x").unwrap();

        assert!(FileDb::new(&file).ping().await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempdir().unwrap();
        let db = FileDb::new(dir.path());

        for name in ["../escape.txt", "/etc/passwd", "nested/file.txt", ""] {
            assert!(
                matches!(
                    db.append(name, "x").await,
                    Err(StorageError::InvalidFileName(_))
                ),
                "{name} should be rejected"
            );
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_do_not_interleave() {
        let dir = tempdir().unwrap();
        let db = Arc::new(FileDb::new(dir.path()));

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move {
                    db.append("emails.txt", &format!("user{i}@example.com"))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let contents = db.read("emails.txt").await.unwrap();
        let mut lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 32);
        lines.sort_unstable();
        lines.dedup();
        assert_eq!(lines.len(), 32);
        assert!(lines.iter().all(|l| l.starts_with("user") && l.ends_with("@example.com")));
    }
}
