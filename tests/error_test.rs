//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use photo_roll::capture;
use photo_roll::error::PhotoRollError;
use std::path::Path;

/// 存在しない取り込みフォルダ
#[test]
fn test_list_captures_nonexistent_folder() {
    let result = capture::list_captures(Path::new("/nonexistent/path/12345"));

    // 存在しないフォルダはエラーではなく空のVecを返す
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// PhotoRollErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        PhotoRollError::Config("テスト設定エラー".to_string()),
        PhotoRollError::Network("接続失敗".to_string()),
        PhotoRollError::Decode("不正なJSON".to_string()),
        PhotoRollError::Store("ストア不可".to_string()),
        PhotoRollError::NotReady("reroll"),
        PhotoRollError::ImageLoad("test.png".to_string()),
        PhotoRollError::CliExecution("入力エラー".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// NotReadyエラーのメッセージ確認
#[test]
fn test_not_ready_message() {
    let err = PhotoRollError::NotReady("toggle_blur");
    let display = format!("{}", err);

    assert!(display.contains("toggle_blur"));
    assert!(display.contains("読み込まれていない"));
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = PhotoRollError::Store("テスト".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Store"));
    assert!(debug.contains("テスト"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: PhotoRollError = io_err.into();

    assert!(matches!(err, PhotoRollError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: PhotoRollError = json_err.into();

    assert!(matches!(err, PhotoRollError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_transparent() {
    let common_err = photo_roll_common::Error::Parse("パースエラー".to_string());
    let err: PhotoRollError = common_err.into();

    assert!(matches!(err, PhotoRollError::Common(_)));
    assert!(format!("{}", err).contains("パースエラー"));
}
