//! APIレスポンスパーサー
//!
//! 写真一覧APIとリモートストアのJSONをパースする

use crate::error::{Error, Result};
use crate::types::{MarsPhoto, Photo, SelectionRecord};

/// Picsumの一覧レスポンスをパース
///
/// # Arguments
/// * `body` - レスポンス本文（JSON配列）
/// * `limit` - 最大件数（超過分は切り捨て）
///
/// # Returns
/// * `Ok(Vec<Photo>)` - レスポンス順の写真一覧（空配列もOK）
/// * `Err` - 必須フィールドの欠落・型不一致、幅/高さが0
pub fn parse_photo_list(body: &str, limit: usize) -> Result<Vec<Photo>> {
    let mut photos: Vec<Photo> = serde_json::from_str(body.trim())
        .map_err(|e| Error::Parse(format!("写真一覧のJSONパースエラー: {}", e)))?;

    if let Some(bad) = photos.iter().find(|p| p.width == 0 || p.height == 0) {
        return Err(Error::Parse(format!(
            "写真 {} のサイズが不正: {}x{}",
            bad.id, bad.width, bad.height
        )));
    }

    photos.truncate(limit);
    Ok(photos)
}

/// Marsの一覧レスポンスをパース
pub fn parse_mars_list(body: &str) -> Result<Vec<MarsPhoto>> {
    serde_json::from_str(body.trim())
        .map_err(|e| Error::Parse(format!("Mars写真一覧のJSONパースエラー: {}", e)))
}

/// ストアの `photos` ノードから選択レコードを取り出す
///
/// `{ "<id>": {"url": ..., "timestamp": ...}, "rolls": 3 }` の形。
/// レコードとして読めない子（`rolls` など）は読み飛ばす。
/// `null`（ノードなし）は空として扱う。
pub fn parse_selection_tree(value: serde_json::Value) -> Result<Vec<(String, SelectionRecord)>> {
    let map = match value {
        serde_json::Value::Null => return Ok(Vec::new()),
        serde_json::Value::Object(map) => map,
        other => {
            return Err(Error::Parse(format!(
                "選択レコードはオブジェクトである必要があります: {}",
                other
            )))
        }
    };

    let records = map
        .into_iter()
        .filter_map(|(id, child)| {
            serde_json::from_value::<SelectionRecord>(child)
                .ok()
                .map(|record| (id, record))
        })
        .collect();

    Ok(records)
}

/// タイムスタンプが最大のレコードを返す
///
/// 同じタイムスタンプなら後に現れた方を採用する。
pub fn latest_record<'a, I>(records: I) -> Option<&'a SelectionRecord>
where
    I: IntoIterator<Item = &'a SelectionRecord>,
{
    records
        .into_iter()
        .fold(None, |latest: Option<&SelectionRecord>, record| match latest {
            Some(current) if current.timestamp > record.timestamp => Some(current),
            _ => Some(record),
        })
}
