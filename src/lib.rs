//! Photo Roll
//!
//! Picsum / Mars の写真フィードからランダムに写真を選び、
//! 表示変換と選択の保存・復元を行うヘッドレスクライアント。

pub mod api;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod session;
pub mod store;

pub use api::{MarsClient, PhotoApi, PicsumClient};
pub use error::{PhotoRollError, Result};
pub use session::{Outcome, PhotoSession};
pub use store::SelectionStore;
