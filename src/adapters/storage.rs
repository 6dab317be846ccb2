use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_folders() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path().to_string_lossy().to_string());

        storage
            .write_file("March/05-03-2024/Alice.txt", b"invoice")
            .await
            .unwrap();

        let written = fs::read(temp.path().join("March/05-03-2024/Alice.txt")).unwrap();
        assert_eq!(written, b"invoice");
    }
}
