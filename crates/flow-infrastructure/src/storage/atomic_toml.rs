//! Atomic TOML file operations.
//!
//! Provides a thin layer for safe access to TOML files.

use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use flow_core::error::{FlowError, Result};

/// A handle to an atomically written TOML file.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Consistency**: TOML schema validation on load/save
/// - **Durability**: Explicit fsync before rename
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the TOML file and deserializes it.
    ///
    /// Returns `Ok(None)` when the file does not exist or is empty.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Saves data to the TOML file atomically.
    ///
    /// Writes to a temporary file, fsyncs it, then renames over the target
    /// so readers never observe a half-written file.
    pub fn save(&self, data: &T) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(data)?;

        // Write to temporary file in the same directory
        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Removes the file. Removing a file that does not exist is not an
    /// error, so callers can clear state unconditionally.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| FlowError::io("Path has no parent directory"))?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| FlowError::io("Path has no file name"))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestDoc {
        name: String,
        count: u32,
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<TestDoc>::new(temp_dir.path().join("doc.toml"));

        let doc = TestDoc {
            name: "test".to_string(),
            count: 42,
        };
        file.save(&doc).unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn load_nonexistent_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<TestDoc>::new(temp_dir.path().join("missing.toml"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/deeper/doc.toml");
        let file = AtomicTomlFile::<TestDoc>::new(path.clone());

        file.save(&TestDoc {
            name: "x".to_string(),
            count: 1,
        })
        .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.toml");
        let file = AtomicTomlFile::<TestDoc>::new(path.clone());

        file.save(&TestDoc {
            name: "x".to_string(),
            count: 1,
        })
        .unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("doc.toml")]);
        assert!(path.exists());
    }

    #[test]
    fn remove_clears_the_file_and_tolerates_absence() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<TestDoc>::new(temp_dir.path().join("doc.toml"));

        file.save(&TestDoc {
            name: "gone".to_string(),
            count: 0,
        })
        .unwrap();
        file.remove().unwrap();
        assert!(file.load().unwrap().is_none());

        // Second remove is a no-op
        file.remove().unwrap();
    }
}
