//! Media sideload: uploaded event images live on local disk, outside the
//! event store, and are served back as static files under `/uploads`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Mount point of the upload directory in the HTTP surface.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Attempts before giving up on finding a free filename.
const MAX_NAME_ATTEMPTS: i64 = 64;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No free filename after {0} attempts")]
    NameExhausted(i64),
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), MediaError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Writes `bytes` under a `<unix-millis><ext>` name and returns its public path.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, MediaError> {
        let extension = extension_of(original_name);
        let base = Utc::now().timestamp_millis();

        for offset in 0..MAX_NAME_ATTEMPTS {
            let filename = format!("{}{}", base + offset, extension);
            let path = self.dir.join(&filename);

            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(bytes).await?;
            file.flush().await?;

            tracing::info!(file = %filename, size = bytes.len(), "Stored uploaded image");
            return Ok(format!("{}/{}", PUBLIC_PREFIX, filename));
        }

        Err(MediaError::NameExhausted(MAX_NAME_ATTEMPTS))
    }
}

/// Extension of the client-supplied name including the dot, or empty when it
/// has none or contains anything but ASCII alphanumerics.
fn extension_of(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("poster.png"), ".png");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of("evil.p/../hp"), "");
        assert_eq!(extension_of("weird.p g"), "");
    }

    #[tokio::test]
    async fn test_save_writes_file_under_public_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());

        let url = media.save("flyer.jpg", b"jpeg-bytes").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".jpg"));

        let filename = url.trim_start_matches("/uploads/");
        let stem = filename.trim_end_matches(".jpg");
        assert!(stem.parse::<i64>().is_ok());

        let stored = std::fs::read(dir.path().join(filename)).unwrap();
        assert_eq!(stored, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_save_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());

        let first = media.save("a.png", b"one").await.unwrap();
        let second = media.save("b.png", b"two").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path().join("nested").join("uploads"));
        media.ensure_dir().await.unwrap();
        assert!(media.dir().is_dir());
    }

    #[tokio::test]
    async fn test_ensure_dir_reports_blocked_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("uploads");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let media = MediaStore::new(blocker.join("images"));
        assert!(matches!(media.ensure_dir().await, Err(MediaError::Io(_))));
    }
}
