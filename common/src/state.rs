//! 画面状態（Loading / Success / Error）

use serde::Serialize;

use crate::types::Photo;

/// 写真取得の進行状態と表示中の写真
///
/// 状態遷移のたびに値ごと置き換える。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UiState {
    /// 初期状態・取得中
    #[default]
    Loading,
    /// 取得成功
    Success {
        /// APIのレスポンス順
        photos: Vec<Photo>,
        selected: Photo,
    },
    /// 取得失敗（詳細は保持しない）
    Error,
}

impl UiState {
    pub fn success(photos: Vec<Photo>, selected: Photo) -> Self {
        UiState::Success { photos, selected }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UiState::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, UiState::Error)
    }

    /// 表示中の写真（Success以外はNone）
    pub fn selected(&self) -> Option<&Photo> {
        match self {
            UiState::Success { selected, .. } => Some(selected),
            _ => None,
        }
    }

    /// 取得済みの写真一覧（Success以外は空）
    pub fn photos(&self) -> &[Photo] {
        match self {
            UiState::Success { photos, .. } => photos,
            _ => &[],
        }
    }

    /// 状態名
    pub fn label(&self) -> &'static str {
        match self {
            UiState::Loading => "loading",
            UiState::Success { .. } => "success",
            UiState::Error => "error",
        }
    }
}
