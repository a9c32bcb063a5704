//! 写真フィードAPIクライアント

mod mars;
mod picsum;

pub use mars::MarsClient;
pub use picsum::PicsumClient;

use crate::config::Config;
use crate::error::{PhotoRollError, Result};
use async_trait::async_trait;
use photo_roll_common::Photo;
use std::time::Duration;

/// 写真一覧の取得元
///
/// リトライはしない。失敗の扱いは呼び出し側が決める。
#[async_trait]
pub trait PhotoApi: Send + Sync {
    async fn fetch_photos(&self) -> Result<Vec<Photo>>;
}

/// タイムアウト付きのHTTPクライアントを作る
pub fn http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(concat!("photo-roll/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| PhotoRollError::Config(format!("HTTPクライアントの初期化に失敗: {}", e)))
}

/// GETして本文を返す（非2xxはNetwork）
pub(crate) async fn get_text(client: &reqwest::Client, url: &str, query: &[(&str, String)]) -> Result<String> {
    client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(PhotoRollError::from_http)?
        .error_for_status()
        .map_err(PhotoRollError::from_http)?
        .text()
        .await
        .map_err(PhotoRollError::from_http)
}
