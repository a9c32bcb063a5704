//! カメラ画像の取り込み
//!
//! カメラで撮った画像を `Photos` ディレクトリに `JPEG_<ミリ秒>.jpg` として保存し、
//! `file://` URLをストアに記録する。

use crate::error::{PhotoRollError, Result};
use crate::session::Outcome;
use crate::store::SelectionStore;
use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use photo_roll_common::SelectionRecord;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const JPEG_QUALITY: u8 = 100;
const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg", "JPG", "JPEG"];

#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

/// 保存ファイル名（`JPEG_<ミリ秒>.jpg`）
pub fn capture_file_name(timestamp_millis: i64) -> String {
    format!("JPEG_{}.jpg", timestamp_millis)
}

/// ファイルパスを `file://` URLにする
pub fn file_url(path: &Path) -> String {
    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display().to_string().replace('\\', "/"))
}

/// 画像をデコードしてJPEG（品質100）で `photos_dir` に保存
pub fn save_image_as_jpg(source: &Path, photos_dir: &Path, timestamp_millis: i64) -> Result<PathBuf> {
    if !source.exists() {
        return Err(PhotoRollError::ImageLoad(format!(
            "ファイルが見つかりません: {}",
            source.display()
        )));
    }

    std::fs::create_dir_all(photos_dir)?;

    let image = image::open(source)
        .map_err(|e| PhotoRollError::ImageLoad(format!("{}: {}", source.display(), e)))?;
    // JPEGはアルファを持てない
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());

    // 同じミリ秒の取り込みで既存ファイルを上書きしない
    let output = photos_dir.join(capture_file_name(timestamp_millis));
    let file = OpenOptions::new().write(true).create_new(true).open(&output)?;
    let writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| PhotoRollError::ImageLoad(format!("JPEG保存に失敗: {}", e)))?;

    debug!(source = %source.display(), output = %output.display(), "image saved as jpeg");
    Ok(output)
}

/// 取り込んでストアに記録
///
/// 保存に失敗したらエラー。記録はベストエフォート。
pub async fn capture_photo(
    source: &Path,
    photos_dir: &Path,
    store: &dyn SelectionStore,
) -> Result<(PathBuf, Outcome<String>)> {
    let timestamp = Utc::now().timestamp_millis();

    let source_owned = source.to_path_buf();
    let dir_owned = photos_dir.to_path_buf();
    let saved = tokio::task::spawn_blocking(move || save_image_as_jpg(&source_owned, &dir_owned, timestamp))
        .await
        .map_err(|e| PhotoRollError::ImageLoad(format!("画像保存タスクが異常終了: {}", e)))??;

    let record = SelectionRecord::new(file_url(&saved), timestamp);
    info!(url = %record.url, "captured photo");
    let recorded = Outcome::from_store("push_selection", store.push_selection(&record).await);

    Ok((saved, recorded))
}

/// 取り込み済みのJPEG一覧（ファイル名順）
pub fn list_captures(photos_dir: &Path) -> Result<Vec<CapturedPhoto>> {
    if !photos_dir.exists() {
        return Ok(Vec::new());
    }

    let mut captures = Vec::new();

    for entry in WalkDir::new(photos_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let is_jpeg = path
            .extension()
            .map(|ext| JPEG_EXTENSIONS.iter().any(|&e| e == ext.to_string_lossy()))
            .unwrap_or(false);
        if !is_jpeg {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        captures.push(CapturedPhoto {
            path: path.to_path_buf(),
            file_name,
            size,
        });
    }

    captures.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(captures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_capture_file_name() {
        assert_eq!(capture_file_name(1_700_000_000_123), "JPEG_1700000000123.jpg");
    }

    #[test]
    fn test_list_captures_missing_dir() {
        let result = list_captures(Path::new("/nonexistent/photos/12345")).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_list_captures_filters_and_sorts() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("JPEG_2.jpg"), b"b").unwrap();
        fs::write(dir.path().join("JPEG_1.jpg"), b"a").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();

        let captures = list_captures(dir.path()).unwrap();
        assert_eq!(captures.len(), 2);
        assert_eq!(captures[0].file_name, "JPEG_1.jpg");
        assert_eq!(captures[1].file_name, "JPEG_2.jpg");
        assert_eq!(captures[0].size, 1);
    }

    #[test]
    fn test_save_image_missing_source() {
        let dir = tempdir().expect("Failed to create temp dir");
        let result = save_image_as_jpg(&dir.path().join("missing.png"), dir.path(), 1);
        assert!(matches!(result, Err(PhotoRollError::ImageLoad(_))));
    }

    #[test]
    fn test_save_image_same_millisecond_keeps_first() {
        let dir = tempdir().expect("Failed to create temp dir");
        let source = dir.path().join("camera.png");
        image::RgbImage::new(2, 2).save(&source).unwrap();

        let first = save_image_as_jpg(&source, dir.path(), 42).unwrap();
        let saved = fs::read(&first).unwrap();

        let result = save_image_as_jpg(&source, dir.path(), 42);
        match result {
            Err(PhotoRollError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::AlreadyExists),
            other => panic!("Expected Io(AlreadyExists), got {:?}", other),
        }
        assert_eq!(fs::read(&first).unwrap(), saved);
    }

    #[test]
    fn test_file_url_prefix() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("JPEG_1.jpg");
        fs::write(&path, b"x").unwrap();
        let url = file_url(&path);
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("/JPEG_1.jpg"));
    }
}
