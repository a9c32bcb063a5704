use super::get_text;
use crate::config::Config;
use crate::error::{PhotoRollError, Result};
use photo_roll_common::{parse_mars_list, MarsPhoto};
use rand::seq::SliceRandom;
use tracing::debug;

const PHOTOS_PATH: &str = "photos";

/// Mars探査車写真APIクライアント
#[derive(Debug, Clone)]
pub struct MarsClient {
    client: reqwest::Client,
    base_url: String,
}

impl MarsClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = super::http_client(config)?;
        Ok(Self::new(client, config.mars_base_url.clone()))
    }

    pub async fn fetch_photos(&self) -> Result<Vec<MarsPhoto>> {
        let url = format!("{}/{}", self.base_url, PHOTOS_PATH);
        debug!(%url, "fetching mars photo list");

        let body = get_text(&self.client, &url, &[]).await?;
        parse_mars_list(&body).map_err(|e| PhotoRollError::Decode(e.to_string()))
    }

    /// 一覧を取得してランダムに1枚選ぶ（空ならNone）
    pub async fn random_photo(&self) -> Result<Option<MarsPhoto>> {
        let photos = self.fetch_photos().await?;
        Ok(photos.choose(&mut rand::thread_rng()).cloned())
    }
}
