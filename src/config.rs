use crate::error::{PhotoRollError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Picsum一覧APIの最大件数
pub const MAX_PAGE_LIMIT: usize = 100;

const FIREBASE_URL_ENV: &str = "PHOTO_ROLL_FIREBASE_URL";
const FIREBASE_AUTH_ENV: &str = "PHOTO_ROLL_FIREBASE_AUTH";

/// 選択ストアのバックエンド
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// プロセス内メモリ（終了すると消える）
    Memory,
    /// ローカルJSONファイル
    #[default]
    File,
    /// Firebase Realtime Database (REST)
    Firebase,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::File => write!(f, "file"),
            StoreBackend::Firebase => write!(f, "firebase"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub picsum_base_url: String,
    pub mars_base_url: String,
    pub page_limit: usize,
    pub timeout_seconds: u64,
    pub store: StoreBackend,
    pub store_file: Option<PathBuf>,
    pub firebase_url: Option<String>,
    pub firebase_auth: Option<String>,
    pub photos_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            picsum_base_url: "https://picsum.photos".into(),
            mars_base_url: "https://android-kotlin-fun-mars-server.appspot.com".into(),
            page_limit: MAX_PAGE_LIMIT,
            timeout_seconds: 30,
            store: StoreBackend::default(),
            store_file: None,
            firebase_url: None,
            firebase_auth: None,
            photos_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhotoRollError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-roll"))
    }

    /// 1..=100 に丸めた取得件数
    pub fn effective_page_limit(&self) -> usize {
        self.page_limit.clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn store_file_path(&self) -> Result<PathBuf> {
        match &self.store_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("selections.json")),
        }
    }

    /// 取り込んだ写真の保存先
    pub fn photos_dir_path(&self) -> Result<PathBuf> {
        match &self.photos_dir {
            Some(path) => Ok(path.clone()),
            None => {
                let data = dirs::data_dir()
                    .ok_or_else(|| PhotoRollError::Config("データディレクトリが見つかりません".into()))?;
                Ok(data.join("photo-roll").join("Photos"))
            }
        }
    }

    pub fn get_firebase_url(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(url) = std::env::var(FIREBASE_URL_ENV) {
            if !url.trim().is_empty() {
                return Ok(url.trim().trim_end_matches('/').to_string());
            }
        }

        self.firebase_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                PhotoRollError::Config(
                    "Firebase URLが設定されていません。`photo-roll config --set-firebase-url URL` で設定してください".into(),
                )
            })
    }

    pub fn get_firebase_auth(&self) -> Option<String> {
        std::env::var(FIREBASE_AUTH_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .or_else(|| self.firebase_auth.clone())
    }

    pub fn set_store(&mut self, store: StoreBackend) -> Result<()> {
        self.store = store;
        self.save()
    }

    pub fn set_firebase_url(&mut self, url: String) -> Result<()> {
        self.firebase_url = Some(url);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.picsum_base_url, "https://picsum.photos");
        assert_eq!(config.page_limit, 100);
        assert_eq!(config.store, StoreBackend::File);
    }

    #[test]
    fn test_effective_page_limit_clamped() {
        let mut config = Config::default();
        config.page_limit = 500;
        assert_eq!(config.effective_page_limit(), 100);
        config.page_limit = 0;
        assert_eq!(config.effective_page_limit(), 1);
        config.page_limit = 30;
        assert_eq!(config.effective_page_limit(), 30);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"store": "firebase", "firebaseUrl": "ignored"}"#).unwrap();
        assert_eq!(config.store, StoreBackend::Firebase);
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.firebase_url.is_none());
    }

    #[test]
    fn test_store_backend_display() {
        assert_eq!(StoreBackend::Memory.to_string(), "memory");
        assert_eq!(StoreBackend::Firebase.to_string(), "firebase");
    }
}
