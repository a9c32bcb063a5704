use super::{get_text, PhotoApi};
use crate::config::{Config, MAX_PAGE_LIMIT};
use crate::error::{PhotoRollError, Result};
use async_trait::async_trait;
use photo_roll_common::{parse_photo_list, Photo};
use tracing::debug;

const LIST_PATH: &str = "v2/list";

/// Picsum一覧APIクライアント
#[derive(Debug, Clone)]
pub struct PicsumClient {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
}

impl PicsumClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limit: MAX_PAGE_LIMIT,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = super::http_client(config)?;
        Ok(Self::new(client, config.picsum_base_url.clone()).with_limit(config.effective_page_limit()))
    }

    /// 取得件数（1..=100に丸める）
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_PAGE_LIMIT);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn list_url(&self) -> String {
        format!("{}/{}", self.base_url, LIST_PATH)
    }
}

#[async_trait]
impl PhotoApi for PicsumClient {
    async fn fetch_photos(&self) -> Result<Vec<Photo>> {
        let url = self.list_url();
        debug!(%url, limit = self.limit, "fetching picsum photo list");

        let body = get_text(&self.client, &url, &[("limit", self.limit.to_string())]).await?;
        let photos = parse_photo_list(&body, self.limit)
            .map_err(|e| PhotoRollError::Decode(e.to_string()))?;

        debug!(count = photos.len(), "picsum photo list decoded");
        Ok(photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_url_trims_trailing_slash() {
        let client = PicsumClient::new(reqwest::Client::new(), "https://picsum.photos/");
        assert_eq!(client.list_url(), "https://picsum.photos/v2/list");
    }

    #[test]
    fn test_with_limit_clamped() {
        let client = PicsumClient::new(reqwest::Client::new(), "https://picsum.photos");
        assert_eq!(client.limit(), 100);
        assert_eq!(client.clone().with_limit(250).limit(), 100);
        assert_eq!(client.with_limit(0).limit(), 1);
    }
}
