//! ローカルJSONファイルのストア
//!
//! Firebaseと同じツリーを1ファイルに保存する。
//! 読み込み→変更→書き込みはプロセス内でだけ排他される。

use super::{generate_id, SelectionStore, ROLLS_KEY};
use crate::error::{PhotoRollError, Result};
use async_trait::async_trait;
use photo_roll_common::{latest_record, parse_selection_tree, SelectionRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;

/// ファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// `photos` ノード（`rolls` と選択レコードが同居する）
    photos: serde_json::Map<String, serde_json::Value>,
}

impl StoreFile {
    const CURRENT_VERSION: u32 = 1;

    fn rolls(&self) -> u64 {
        self.photos
            .get(ROLLS_KEY)
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0)
    }

    fn records(&self) -> Vec<SelectionRecord> {
        let tree = serde_json::Value::Object(self.photos.clone());
        match parse_selection_tree(tree) {
            Ok(records) => records
                .into_iter()
                .collect::<BTreeMap<_, _>>()
                .into_values()
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            photos: serde_json::Map::new(),
        }
    }
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイルを読み込み（なし・JSON破損・バージョン違いは空）
    ///
    /// 読めないファイル（権限・UTF-8でない等）は上書きしないようエラーにする。
    async fn load(&self) -> Result<StoreFile> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(e) => {
                return Err(PhotoRollError::Store(format!(
                    "ストアファイルを読み込めません ({}): {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match serde_json::from_str::<StoreFile>(&content) {
            Ok(file) if file.version == StoreFile::CURRENT_VERSION => Ok(file),
            Ok(file) => {
                warn!(path = %self.path.display(), version = file.version, "store file version mismatch; starting empty");
                Ok(StoreFile::default())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store file is corrupted; starting empty");
                Ok(StoreFile::default())
            }
        }
    }

    async fn save(&self, file: &StoreFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(file)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl SelectionStore for FileStore {
    async fn increment_rolls(&self) -> Result<u64> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;
        let next = file.rolls() + 1;
        file.photos.insert(ROLLS_KEY.to_string(), serde_json::Value::from(next));
        self.save(&file).await?;
        Ok(next)
    }

    async fn roll_count(&self) -> Result<u64> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.rolls())
    }

    async fn push_selection(&self, record: &SelectionRecord) -> Result<String> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;
        let id = generate_id(record.timestamp);
        file.photos.insert(id.clone(), serde_json::to_value(record)?);
        self.save(&file).await?;
        Ok(id)
    }

    async fn last_selection(&self) -> Result<Option<SelectionRecord>> {
        let _guard = self.lock.lock().await;
        let records = self.load().await?.records();
        Ok(latest_record(&records).cloned())
    }
}
