// 文件持久化键值存储
//
// 所有键值保存在同一个 JSON 文档中，每次写入后整体重写

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::modules::chat::ports::{KeyValueStore, StoreError};

pub const STORE_FILE_NAME: &str = "serenemind.json";

/// 文件键值存储
pub struct FileKeyValueStore {
    entries: RwLock<BTreeMap<String, String>>,
    file_path: PathBuf,
}

impl FileKeyValueStore {
    /// 打开（或创建）数据目录下的存储文件
    ///
    /// # Arguments
    /// * `data_dir` - 数据目录路径
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).await?;
        let file_path = data_dir.join(STORE_FILE_NAME);

        let entries = if fs::try_exists(&file_path).await? {
            let content = fs::read_to_string(&file_path).await?;
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                key: file_path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            BTreeMap::new()
        };

        debug!("[FileKeyValueStore] Opened {}", file_path.display());

        Ok(Self {
            entries: RwLock::new(entries),
            file_path,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// 写入临时文件后重命名，避免写到一半的文件
    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.file_path.with_extension("json.tmp");

        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &self.file_path).await?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        // 持有写锁直到文件写完，保证文件内容与写入顺序一致
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        self.persist(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::open(temp_dir.path()).await.unwrap();

        store.set("serenemind.userName", "Asha".to_string()).await.unwrap();
        let value = store.get("serenemind.userName").await.unwrap();

        assert_eq!(value.as_deref(), Some("Asha"));
        assert!(store.file_path().exists());
    }

    #[tokio::test]
    async fn test_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_path_buf();

        {
            let store = FileKeyValueStore::open(&path).await.unwrap();
            store.set("a", "1".to_string()).await.unwrap();
            store.set("b", "2".to_string()).await.unwrap();
            store.remove("b").await.unwrap();
        }

        // 重新打开，验证数据持久化
        {
            let store = FileKeyValueStore::open(&path).await.unwrap();
            assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
            assert!(store.get("b").await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(STORE_FILE_NAME), "not json").unwrap();

        let result = FileKeyValueStore::open(temp_dir.path()).await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");

        let store = FileKeyValueStore::open(&nested).await.unwrap();
        store.set("k", "v".to_string()).await.unwrap();
        assert!(nested.join(STORE_FILE_NAME).exists());
    }
}
