//! The shared text slot.
//!
//! Holds at most one value. Every accepted write replaces the whole content;
//! there is no history and no clear operation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::Rng;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{Error, Result};

pub struct TextSlot {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TextSlot {
    /// Open the slot persisted at `path`, creating its parent directory.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::storage(format!("creating text directory {}", parent.display()), e)
            })?;
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current content, or an empty string if nothing was ever written.
    pub async fn get(&self) -> Result<String> {
        let _guard = self.lock.lock().await;
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(Error::storage("reading shared text", e)),
        }
    }

    /// Replace the content. Blank input (after trimming) is rejected and
    /// leaves the previous value in place; accepted input is stored verbatim.
    pub async fn set(&self, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(Error::validation("Text content cannot be empty"));
        }

        let _guard = self.lock.lock().await;
        atomic_write(&self.path, content)
            .await
            .map_err(|e| Error::storage("writing shared text", e))?;

        info!("Shared text updated ({} bytes)", content.len());
        Ok(())
    }
}

/// Write via a temp file and rename so readers never see a partial value.
async fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let suffix: u64 = rand::rng().random();
    let temp_path = path.with_extension(format!("{:016x}.tmp", suffix));

    if let Err(e) = fs::write(&temp_path, content).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_slot() -> (TempDir, TextSlot) {
        let temp_dir = TempDir::new().unwrap();
        let slot = TextSlot::open(temp_dir.path().join("shared_texts/shared_text.txt"))
            .await
            .unwrap();
        (temp_dir, slot)
    }

    #[tokio::test]
    async fn test_open_creates_parent_directory() {
        let (temp_dir, _slot) = create_test_slot().await;
        assert!(temp_dir.path().join("shared_texts").is_dir());
    }

    #[tokio::test]
    async fn test_empty_slot_reads_as_empty_string() {
        let (_temp_dir, slot) = create_test_slot().await;
        assert_eq!(slot.get().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_set_replaces_content() {
        let (_temp_dir, slot) = create_test_slot().await;

        slot.set("hello").await.unwrap();
        assert_eq!(slot.get().await.unwrap(), "hello");

        slot.set("world").await.unwrap();
        assert_eq!(slot.get().await.unwrap(), "world");
    }

    #[tokio::test]
    async fn test_blank_content_is_rejected() {
        let (_temp_dir, slot) = create_test_slot().await;
        slot.set("keep me").await.unwrap();

        for blank in ["", "   ", "\n\t "] {
            let err = slot.set(blank).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }

        assert_eq!(slot.get().await.unwrap(), "keep me");
    }

    #[tokio::test]
    async fn test_blank_content_on_empty_slot_stays_empty() {
        let (_temp_dir, slot) = create_test_slot().await;
        assert!(slot.set(" ").await.is_err());
        assert!(!slot.path().exists());
        assert_eq!(slot.get().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_content_is_stored_verbatim() {
        let (_temp_dir, slot) = create_test_slot().await;
        slot.set("  indented\nlines  \n").await.unwrap();
        assert_eq!(slot.get().await.unwrap(), "  indented\nlines  \n");
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let (temp_dir, slot) = create_test_slot().await;
        slot.set("survives").await.unwrap();
        drop(slot);

        let reopened = TextSlot::open(temp_dir.path().join("shared_texts/shared_text.txt"))
            .await
            .unwrap();
        assert_eq!(reopened.get().await.unwrap(), "survives");
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let (temp_dir, slot) = create_test_slot().await;
        slot.set("one").await.unwrap();
        slot.set("two").await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path().join("shared_texts"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, ["shared_text.txt"]);
    }

    #[tokio::test]
    async fn test_unreadable_slot_is_storage_error() {
        let (_temp_dir, slot) = create_test_slot().await;
        // A directory where the file should be
        std::fs::create_dir(slot.path()).unwrap();

        assert!(matches!(slot.get().await, Err(Error::Storage { .. })));
        assert!(matches!(slot.set("x").await, Err(Error::Storage { .. })));
    }
}
