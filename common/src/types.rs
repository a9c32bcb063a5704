//! 写真フィードの型定義
//!
//! CLIとストアで共有される型:
//! - Photo: Picsum写真一覧の1要素
//! - MarsPhoto: Mars写真一覧の1要素
//! - SelectionRecord: リモートストアに保存する「最後に表示した写真」

use serde::{Deserialize, Serialize};

/// Picsum写真
///
/// 未知のフィールドは無視する（APIの後方互換性のため）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    /// 写真ページのURL
    pub url: String,
    /// 画像本体のURL（表示変換はこのURLに付加する）
    pub download_url: String,
}

impl Photo {
    /// download_url だけを差し替えたコピーを返す
    pub fn with_download_url(&self, download_url: impl Into<String>) -> Self {
        Self {
            download_url: download_url.into(),
            ..self.clone()
        }
    }
}

/// Mars探査車の写真
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarsPhoto {
    pub id: String,
    #[serde(rename = "img_src")]
    pub img_src: String,
}

/// 保存された選択
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub url: String,
    /// 保存時刻（エポックミリ秒）
    pub timestamp: i64,
}

impl SelectionRecord {
    pub fn new(url: impl Into<String>, timestamp: i64) -> Self {
        Self {
            url: url.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_photo() -> Photo {
        Photo {
            id: "0".to_string(),
            author: "Alejandro Escamilla".to_string(),
            width: 5000,
            height: 3333,
            url: "https://unsplash.com/photos/yC-Yzbqy7PY".to_string(),
            download_url: "https://picsum.photos/id/0/5000/3333".to_string(),
        }
    }

    #[test]
    fn test_photo_deserialize_ignores_unknown_fields() {
        let json = r#"{
            "id": "0",
            "author": "Alejandro Escamilla",
            "width": 5000,
            "height": 3333,
            "url": "https://unsplash.com/photos/yC-Yzbqy7PY",
            "download_url": "https://picsum.photos/id/0/5000/3333",
            "likes": 42
        }"#;

        let photo: Photo = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(photo, sample_photo());
    }

    #[test]
    fn test_photo_deserialize_missing_field() {
        let json = r#"{"id": "0", "author": "a", "width": 1, "height": 1, "url": "u"}"#;
        let result = serde_json::from_str::<Photo>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_photo_serialize_uses_snake_case_key() {
        let json = serde_json::to_string(&sample_photo()).expect("シリアライズ失敗");
        assert!(json.contains("\"download_url\":\"https://picsum.photos/id/0/5000/3333\""));
    }

    #[test]
    fn test_with_download_url_keeps_identity() {
        let photo = sample_photo();
        let restored = photo.with_download_url("https://picsum.photos/id/0/5000/3333/?blur=10");

        assert_eq!(restored.id, photo.id);
        assert_eq!(restored.author, photo.author);
        assert_eq!(restored.download_url, "https://picsum.photos/id/0/5000/3333/?blur=10");
        // 元のレコードは変更されない
        assert_eq!(photo.download_url, "https://picsum.photos/id/0/5000/3333");
    }

    #[test]
    fn test_mars_photo_deserialize() {
        let json = r#"{"id": "424905", "img_src": "https://mars.jpl.nasa.gov/msl-raw-images/fcam/FLB_1.JPG"}"#;
        let photo: MarsPhoto = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(photo.id, "424905");
        assert!(photo.img_src.ends_with("FLB_1.JPG"));
    }
}
