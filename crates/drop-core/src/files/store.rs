//! Filesystem-backed store for the shared directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::naming::{candidate_name, validate_file_name};
use super::record::FileRecord;
use crate::error::{Error, Result};

/// The shared directory.
///
/// Mutations (store, delete) run under one store-wide lock so that picking a
/// free name and creating it cannot interleave with another writer. Reads do
/// not take the lock and may observe a listing that is already stale.
pub struct FileStore {
    root: PathBuf,
    max_upload_bytes: u64,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the store at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>, max_upload_bytes: u64) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            Error::storage(format!("creating upload directory {}", root.display()), e)
        })?;

        Ok(Self {
            root,
            max_upload_bytes,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// All visible regular files, newest first.
    ///
    /// The directory is re-read on every call.
    pub async fn list(&self) -> Result<Vec<FileRecord>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::storage("reading upload directory", e)),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::storage("reading upload directory", e))?
        {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                debug!("Skipping non UTF-8 file name {:?}", file_name);
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            let metadata = match fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                // Deleted between read_dir and stat
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::storage(format!("reading metadata of {}", name), e)),
            };
            if !metadata.is_file() {
                continue;
            }

            let record = FileRecord::describe(name, &metadata)
                .map_err(|e| Error::storage(format!("reading metadata of {}", name), e))?;
            records.push(record);
        }

        records.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(records)
    }

    /// Store `bytes` under `candidate`, or under the first free suffixed
    /// variant of it. Returns the name actually used.
    pub async fn store(&self, candidate: &str, bytes: &[u8]) -> Result<String> {
        let size = bytes.len() as u64;
        if size > self.max_upload_bytes {
            return Err(Error::SizeLimit {
                size,
                limit: self.max_upload_bytes,
            });
        }

        let name = validate_file_name(candidate)?;

        let _guard = self.write_lock.lock().await;
        let mut attempt = 0;
        loop {
            let final_name = candidate_name(name, attempt);
            let path = self.root.join(&final_name);

            let file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match file {
                Ok(mut file) => {
                    if let Err(e) = write_all(&mut file, bytes).await {
                        drop(file);
                        let _ = fs::remove_file(&path).await;
                        return Err(Error::storage(format!("writing {}", final_name), e));
                    }
                    info!("Stored {} ({} bytes)", final_name, size);
                    return Ok(final_name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    attempt += 1;
                }
                Err(e) => return Err(Error::storage(format!("creating {}", final_name), e)),
            }
        }
    }

    /// Full contents of a stored file.
    pub async fn retrieve(&self, name: &str) -> Result<Vec<u8>> {
        let (name, path) = self.existing_file(name).await?;
        fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(name.to_string()),
            _ => Error::storage(format!("reading {}", name), e),
        })
    }

    /// Current record for a stored file.
    pub async fn describe(&self, name: &str) -> Result<FileRecord> {
        let (name, path) = self.existing_file(name).await?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| Error::storage(format!("reading metadata of {}", name), e))?;
        FileRecord::describe(name, &metadata)
            .map_err(|e| Error::storage(format!("reading metadata of {}", name), e))
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let (name, path) = self.existing_file(name).await?;

        fs::remove_file(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(name.to_string()),
            _ => Error::storage(format!("deleting {}", name), e),
        })?;

        info!("Deleted {}", name);
        Ok(())
    }

    /// Validate `name` and confirm it refers to a regular file in the store.
    async fn existing_file<'a>(&self, name: &'a str) -> Result<(&'a str, PathBuf)> {
        let name = validate_file_name(name)?;
        let path = self.root.join(name);

        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok((name, path)),
            Ok(_) => Err(Error::NotFound(name.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound(name.to_string())),
            Err(e) => Err(Error::storage(format!("reading metadata of {}", name), e)),
        }
    }
}

async fn write_all(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.sync_all().await
}
