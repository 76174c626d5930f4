use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::ScoreStore;
use crate::error::StorageError;

/// One file per key under a directory (native builds)
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.txt"))
    }
}

impl ScoreStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("blockstep-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_missing_key_reads_none() {
        let store = FileStore::new(scratch_dir("missing"));
        assert_eq!(store.read("nothing here").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = scratch_dir("rw");
        let mut store = FileStore::new(&dir);
        store.write("blockstepBest", "321").unwrap();
        assert_eq!(store.read("blockstepBest").unwrap().as_deref(), Some("321"));
        let _ = fs::remove_dir_all(dir);
    }
}
