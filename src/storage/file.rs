use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Storage;

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// The directory is created on first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, key: &str, blob: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Write aside, then rename over the target.
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, self.path_for(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("giftbox-{}-{}-{}", name, std::process::id(), nanos))
    }

    #[test]
    fn test_missing_key() {
        let storage = FileStorage::new(scratch_dir("missing"));
        assert_eq!(storage.load("nothing").unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("roundtrip");
        let mut storage = FileStorage::new(&dir);

        storage.save("data", "{\"a\":1}").unwrap();
        storage.save("data", "{\"a\":2}").unwrap();

        assert_eq!(storage.load("data").unwrap().as_deref(), Some("{\"a\":2}"));
        assert!(!dir.join(".data.json.tmp").exists());

        fs::remove_dir_all(dir).unwrap();
    }
}
