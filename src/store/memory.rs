use super::{generate_id, SelectionStore};
use crate::error::Result;
use async_trait::async_trait;
use photo_roll_common::{latest_record, SelectionRecord};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tree {
    rolls: u64,
    records: Vec<(String, SelectionRecord)>,
}

/// プロセス内ストア
#[derive(Debug, Default)]
pub struct MemoryStore {
    tree: Mutex<Tree>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存レコード付きで作る
    pub fn with_records(records: impl IntoIterator<Item = SelectionRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (generate_id(record.timestamp), record))
            .collect();
        Self {
            tree: Mutex::new(Tree { rolls: 0, records }),
        }
    }

    pub async fn records(&self) -> Vec<SelectionRecord> {
        self.tree
            .lock()
            .await
            .records
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }
}

#[async_trait]
impl SelectionStore for MemoryStore {
    async fn increment_rolls(&self) -> Result<u64> {
        let mut tree = self.tree.lock().await;
        tree.rolls += 1;
        Ok(tree.rolls)
    }

    async fn roll_count(&self) -> Result<u64> {
        Ok(self.tree.lock().await.rolls)
    }

    async fn push_selection(&self, record: &SelectionRecord) -> Result<String> {
        let id = generate_id(record.timestamp);
        self.tree.lock().await.records.push((id.clone(), record.clone()));
        Ok(id)
    }

    async fn last_selection(&self) -> Result<Option<SelectionRecord>> {
        let tree = self.tree.lock().await;
        Ok(latest_record(tree.records.iter().map(|(_, record)| record)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_increment_rolls() {
        let store = MemoryStore::new();
        assert_eq!(store.roll_count().await.unwrap(), 0);
        assert_eq!(store.increment_rolls().await.unwrap(), 1);
        assert_eq!(store.increment_rolls().await.unwrap(), 2);
        assert_eq!(store.roll_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_last_selection_max_timestamp() {
        let store = MemoryStore::with_records([
            SelectionRecord::new("https://x/100", 100),
            SelectionRecord::new("https://x/200", 200),
            SelectionRecord::new("https://x/50", 50),
        ]);
        let last = store.last_selection().await.unwrap().unwrap();
        assert_eq!(last.timestamp, 200);
    }

    #[tokio::test]
    async fn test_last_selection_empty() {
        let store = MemoryStore::new();
        assert!(store.last_selection().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_push_selection_appends() {
        let store = MemoryStore::new();
        let id1 = store.push_selection(&SelectionRecord::new("https://x/1", 1)).await.unwrap();
        let id2 = store.push_selection(&SelectionRecord::new("https://x/2", 2)).await.unwrap();
        assert_ne!(id1, id2);
        assert_eq!(store.records().await.len(), 2);
        assert_eq!(store.last_selection().await.unwrap().unwrap().url, "https://x/2");
    }
}
