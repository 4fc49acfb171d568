use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes output files under a base directory, creating it as needed.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("nested"));

        storage.write_file("out/teams.csv", b"team").await.unwrap();

        let written = std::fs::read(temp_dir.path().join("nested/out/teams.csv")).unwrap();
        assert_eq!(written, b"team");
    }
}
