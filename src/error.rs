use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoRollError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ネットワークエラー: {0}")]
    Network(String),

    #[error("レスポンスのデコードに失敗: {0}")]
    Decode(String),

    #[error("ストアエラー: {0}")]
    Store(String),

    #[error("写真が読み込まれていないため {0} を実行できません")]
    NotReady(&'static str),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error(transparent)]
    Common(#[from] photo_roll_common::Error),
}

impl PhotoRollError {
    /// reqwestのエラーを分類
    ///
    /// ボディのデコード失敗だけがDecode、それ以外（接続・タイムアウト・非2xx）はNetwork。
    pub fn from_http(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PhotoRollError::Decode(err.to_string())
        } else {
            PhotoRollError::Network(err.to_string())
        }
    }

    /// ストア操作中のreqwestエラー
    pub fn store_http(err: reqwest::Error) -> Self {
        PhotoRollError::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PhotoRollError>;
