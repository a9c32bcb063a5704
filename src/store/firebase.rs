//! Firebase Realtime Database (REST) ストア
//!
//! ロール回数の加算はETagを使った楽観的トランザクション:
//! 1. `X-Firebase-ETag: true` 付きでGETし、値とETagを得る
//! 2. `if-match: <ETag>` 付きでPUT
//! 3. 412（他クライアントが先に書いた）なら1からやり直す

use super::{SelectionStore, ROLLS_KEY, ROOT_NODE};
use crate::config::Config;
use crate::error::{PhotoRollError, Result};
use async_trait::async_trait;
use photo_roll_common::{latest_record, parse_selection_tree, SelectionRecord};
use reqwest::header::{ETAG, IF_MATCH};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

const ETAG_REQUEST_HEADER: &str = "X-Firebase-ETag";
/// Firebase SDKのトランザクション再試行回数に合わせる
const MAX_TRANSACTION_ATTEMPTS: usize = 25;

/// POSTのレスポンス（`{"name": "<生成ID>"}`）
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

#[derive(Debug, Clone)]
pub struct FirebaseStore {
    client: reqwest::Client,
    base_url: String,
    auth: Option<String>,
}

impl FirebaseStore {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = crate::api::http_client(config)?;
        let mut store = Self::new(client, config.get_firebase_url()?);
        store.auth = config.get_firebase_auth();
        Ok(store)
    }

    /// `auth` クエリに渡すトークン
    pub fn with_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(token.into());
        self
    }

    fn node_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path)
    }

    fn rolls_url(&self) -> String {
        self.node_url(&format!("{}/{}", ROOT_NODE, ROLLS_KEY))
    }

    fn auth_query(&self) -> Vec<(&'static str, String)> {
        self.auth
            .iter()
            .map(|token| ("auth", token.clone()))
            .collect()
    }

    /// 現在の値とETagを読む
    async fn read_rolls_with_etag(&self) -> Result<(u64, String)> {
        let response = self
            .client
            .get(self.rolls_url())
            .query(&self.auth_query())
            .header(ETAG_REQUEST_HEADER, "true")
            .send()
            .await
            .map_err(PhotoRollError::store_http)?
            .error_for_status()
            .map_err(PhotoRollError::store_http)?;

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| PhotoRollError::Store("ETagが返されませんでした".into()))?;

        let current: Option<u64> = response.json().await.map_err(PhotoRollError::store_http)?;
        Ok((current.unwrap_or(0), etag))
    }
}

#[async_trait]
impl SelectionStore for FirebaseStore {
    async fn increment_rolls(&self) -> Result<u64> {
        for attempt in 1..=MAX_TRANSACTION_ATTEMPTS {
            let (current, etag) = self.read_rolls_with_etag().await?;
            let next = current + 1;

            let response = self
                .client
                .put(self.rolls_url())
                .query(&self.auth_query())
                .header(IF_MATCH, etag)
                .json(&next)
                .send()
                .await
                .map_err(PhotoRollError::store_http)?;

            if response.status() == StatusCode::PRECONDITION_FAILED {
                debug!(attempt, "roll counter changed concurrently; retrying transaction");
                continue;
            }

            response.error_for_status().map_err(PhotoRollError::store_http)?;
            return Ok(next);
        }

        Err(PhotoRollError::Store(format!(
            "ロール回数の更新が{}回競合したため中止しました",
            MAX_TRANSACTION_ATTEMPTS
        )))
    }

    async fn roll_count(&self) -> Result<u64> {
        let current: Option<u64> = self
            .client
            .get(self.rolls_url())
            .query(&self.auth_query())
            .send()
            .await
            .map_err(PhotoRollError::store_http)?
            .error_for_status()
            .map_err(PhotoRollError::store_http)?
            .json()
            .await
            .map_err(PhotoRollError::store_http)?;
        Ok(current.unwrap_or(0))
    }

    async fn push_selection(&self, record: &SelectionRecord) -> Result<String> {
        let pushed: PushResponse = self
            .client
            .post(self.node_url(ROOT_NODE))
            .query(&self.auth_query())
            .json(record)
            .send()
            .await
            .map_err(PhotoRollError::store_http)?
            .error_for_status()
            .map_err(PhotoRollError::store_http)?
            .json()
            .await
            .map_err(PhotoRollError::store_http)?;
        Ok(pushed.name)
    }

    async fn last_selection(&self) -> Result<Option<SelectionRecord>> {
        let mut query = self.auth_query();
        query.push(("orderBy", "\"timestamp\"".to_string()));
        query.push(("limitToLast", "1".to_string()));

        let tree: serde_json::Value = self
            .client
            .get(self.node_url(ROOT_NODE))
            .query(&query)
            .send()
            .await
            .map_err(PhotoRollError::store_http)?
            .error_for_status()
            .map_err(PhotoRollError::store_http)?
            .json()
            .await
            .map_err(PhotoRollError::store_http)?;

        // IDをキーにしたオブジェクトで返る
        let records = parse_selection_tree(tree)?;
        Ok(latest_record(records.iter().map(|(_, record)| record)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let store = FirebaseStore::new(reqwest::Client::new(), "https://demo.firebaseio.com/");
        assert_eq!(store.rolls_url(), "https://demo.firebaseio.com/photos/rolls.json");
        assert_eq!(store.node_url(ROOT_NODE), "https://demo.firebaseio.com/photos.json");
    }

    #[test]
    fn test_auth_query() {
        let store = FirebaseStore::new(reqwest::Client::new(), "https://demo.firebaseio.com");
        assert!(store.auth_query().is_empty());

        let store = store.with_auth("secret");
        assert_eq!(store.auth_query(), vec![("auth", "secret".to_string())]);
    }
}
