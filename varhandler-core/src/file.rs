use std::path::{Path, PathBuf};

use eyre::Result;

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File already held the same content and was left untouched
    Unchanged,
}

/// A file to be generated
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
    content: String,
}

impl File {
    /// Create a new file with the given path and content
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Write the file, leaving it untouched when it already holds the content
    pub fn write(&self) -> Result<WriteResult> {
        if let Ok(existing) = std::fs::read(&self.path)
            && existing == self.content.as_bytes()
        {
            return Ok(WriteResult::Unchanged);
        }

        write_file(&self.path, self.content.as_bytes())?;
        Ok(WriteResult::Written)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("out.rs");

        write_file(&path, b"nested").unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "nested");
    }

    #[test]
    fn test_file_write_creates_new() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("new.rs");

        let file = File::new(&path, "fn main() {}");
        assert!(!path.exists());
        assert_eq!(file.write().unwrap(), WriteResult::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "fn main() {}");
    }

    #[test]
    fn test_file_write_skips_identical() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.rs");

        fs::write(&path, "content").unwrap();

        let file = File::new(&path, "content");
        assert_eq!(file.write().unwrap(), WriteResult::Unchanged);
    }

    #[test]
    fn test_file_write_replaces_different() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.rs");

        fs::write(&path, "original").unwrap();

        let file = File::new(&path, "updated");
        assert_eq!(file.write().unwrap(), WriteResult::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
    }
}
