use std::fmt::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::application::ports::storage_port::{StoragePort, StoredFile};

/// Stores uploads under `<root>/<owner_id>/<timestamp>_<name>`.
pub struct FsStorage {
    pub uploads_root: PathBuf,
}

impl FsStorage {
    pub fn new(uploads_root: impl Into<PathBuf>) -> Self {
        Self {
            uploads_root: uploads_root.into(),
        }
    }
}

fn split_name(name: &str) -> (String, String) {
    let p = Path::new(name);
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("file")
        .to_string();
    let ext = p
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string();
    (stem, ext)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(&mut out, "{:02x}", byte);
    }
    out
}

#[async_trait::async_trait]
impl StoragePort for FsStorage {
    async fn store(
        &self,
        owner_id: Uuid,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredFile> {
        use tokio::fs;
        use tokio::io::AsyncWriteExt;

        let dir = self.uploads_root.join(owner_id.to_string());
        fs::create_dir_all(&dir).await?;

        let original = super::sanitize_filename(original_filename.unwrap_or("file.bin"));
        let ts = chrono::Utc::now().format("%Y%m%d-%H%M%S");
        let (stem, ext) = split_name(&original);
        let base = format!("{}_{}", ts, stem);
        let with_ext = |name: &str| {
            if ext.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", name, ext)
            }
        };

        // create_new claims the name atomically; a taken name moves on to the next suffix.
        let mut counter = 0;
        let (candidate, mut file) = loop {
            let name = if counter == 0 {
                with_ext(&base)
            } else {
                with_ext(&format!("{}-{}", base, counter))
            };
            let candidate = dir.join(&name);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await
            {
                Ok(file) => break (candidate, file),
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => counter += 1,
                Err(err) => return Err(err.into()),
            }
        };

        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;
        if let Err(err) = written {
            let _ = fs::remove_file(&candidate).await;
            return Err(err.into());
        }
        let relative_path = super::relative_from_uploads(&self.uploads_root, &candidate);
        tracing::debug!(path = %relative_path, size = bytes.len(), "upload_stored");

        Ok(StoredFile {
            filename: original,
            relative_path,
            size: bytes.len() as i64,
            content_hash: sha256_hex(bytes),
        })
    }

    async fn read(&self, relative_path: &str) -> anyhow::Result<Vec<u8>> {
        let path = super::absolute_from_relative(&self.uploads_root, relative_path)?;
        Ok(tokio::fs::read(path).await?)
    }

    async fn delete(&self, relative_path: &str) -> anyhow::Result<()> {
        let path = super::absolute_from_relative(&self.uploads_root, relative_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %relative_path, "upload_already_missing");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
