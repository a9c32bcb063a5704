//! リモート選択ストア
//!
//! ツリー構造:
//! - `photos/rolls` → ロール回数（トランザクションで加算）
//! - `photos/<生成ID>` → `{url, timestamp}`（追記のみ）

mod file;
mod firebase;
mod memory;

pub use file::FileStore;
pub use firebase::FirebaseStore;
pub use memory::MemoryStore;

use crate::config::{Config, StoreBackend};
use crate::error::Result;
use async_trait::async_trait;
use photo_roll_common::SelectionRecord;
use std::sync::Arc;

/// ストアのルートノード
pub const ROOT_NODE: &str = "photos";
/// ロール回数のキー
pub const ROLLS_KEY: &str = "rolls";

#[async_trait]
pub trait SelectionStore: Send + Sync {
    /// ロール回数を1加算し、加算後の値を返す
    async fn increment_rolls(&self) -> Result<u64>;

    /// 現在のロール回数（未設定なら0）
    async fn roll_count(&self) -> Result<u64>;

    /// 選択レコードを追記し、生成されたIDを返す
    async fn push_selection(&self, record: &SelectionRecord) -> Result<String>;

    /// タイムスタンプ最大のレコード
    async fn last_selection(&self) -> Result<Option<SelectionRecord>>;
}

/// 設定に従ってストアを作る
pub fn open_store(config: &Config) -> Result<Arc<dyn SelectionStore>> {
    let store: Arc<dyn SelectionStore> = match config.store {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => Arc::new(FileStore::new(config.store_file_path()?)),
        StoreBackend::Firebase => Arc::new(FirebaseStore::from_config(config)?),
    };
    Ok(store)
}

/// 新しいレコードID
///
/// 時刻順に並ぶよう、ミリ秒のプレフィックスを付ける。
pub(crate) fn generate_id(timestamp: i64) -> String {
    format!("{:013x}-{}", timestamp.max(0), uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_unique_and_ordered() {
        let a = generate_id(1_700_000_000_000);
        let b = generate_id(1_700_000_000_000);
        let c = generate_id(1_700_000_000_001);
        assert_ne!(a, b);
        assert!(a[..13] < c[..13]);
    }

    #[test]
    fn test_open_memory_store() {
        let config = Config {
            store: StoreBackend::Memory,
            ..Config::default()
        };
        assert!(open_store(&config).is_ok());
    }
}
