//! Display metadata for stored files.

use std::fs::Metadata;
use std::io;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::Serialize;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// One stored file as shown to callers.
///
/// The display strings are derived from `size_bytes` and `modified_at` each
/// time a record is built; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    pub name: String,
    pub size_bytes: u64,
    pub size_display: String,
    pub modified_at: DateTime<Local>,
    pub modified_display: String,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, size_bytes: u64, modified: SystemTime) -> Self {
        let modified_at: DateTime<Local> = modified.into();
        Self {
            name: name.into(),
            size_bytes,
            size_display: format_size(size_bytes),
            modified_display: format_modified(&modified_at),
            modified_at,
        }
    }

    /// Build a record from filesystem metadata.
    pub fn describe(name: impl Into<String>, metadata: &Metadata) -> io::Result<Self> {
        Ok(Self::new(name, metadata.len(), metadata.modified()?))
    }
}

/// Human-readable size: whole bytes below 1 KB, then one decimal place in
/// KB, MB or GB.
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GIB as f64)
    }
}

pub fn format_modified(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(123), "123 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * MIB), "5.0 MB");
        assert_eq!(format_size(MIB + MIB / 2), "1.5 MB");
        assert_eq!(format_size(2 * GIB), "2.0 GB");
        assert_eq!(format_size(1536 * GIB), "1536.0 GB");
    }

    #[test]
    fn test_record_derives_display_fields() {
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let record = FileRecord::new("a.txt", 2048, modified);

        assert_eq!(record.name, "a.txt");
        assert_eq!(record.size_display, "2.0 KB");
        assert_eq!(record.modified_at, DateTime::<Local>::from(modified));
        assert_eq!(record.modified_display, format_modified(&record.modified_at));
        assert_eq!(record.modified_display.len(), "2023-11-14 22:13:20".len());
    }

    #[test]
    fn test_describe_from_metadata() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("x.bin");
        std::fs::write(&path, vec![0u8; 3000]).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        let record = FileRecord::describe("x.bin", &metadata).unwrap();
        assert_eq!(record.size_bytes, 3000);
        assert_eq!(record.size_display, "2.9 KB");
    }

    #[test]
    fn test_serializes_all_fields() {
        let record = FileRecord::new("a.txt", 10, SystemTime::UNIX_EPOCH);
        let json = serde_json::to_value(&record).unwrap();
        for key in ["name", "size_bytes", "size_display", "modified_at", "modified_display"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
