//! 表示変換（ぼかし・グレースケール）
//!
//! 画素処理はせず、Picsumの画像URLにクエリを付加するだけ。

use serde::{Deserialize, Serialize};

/// ぼかし半径（Picsumの `blur` パラメータ）
pub const BLUR_RADIUS: u8 = 10;

/// 表示変換フラグ
///
/// セッション内だけの状態で、保存はしない。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTransform {
    pub blur: bool,
    pub grayscale: bool,
}

impl DisplayTransform {
    pub fn toggle_blur(&mut self) {
        self.blur = !self.blur;
    }

    pub fn toggle_grayscale(&mut self) {
        self.grayscale = !self.grayscale;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// このフラグで `base_url` を変換
    pub fn apply(&self, base_url: &str) -> String {
        resolve(base_url, self.blur, self.grayscale)
    }
}

/// 表示用URLを解決
///
/// 優先順位:
/// 1. 両方 → `/?blur=10&grayscale`
/// 2. ぼかしのみ → `/?blur=10`
/// 3. グレースケールのみ → `/?grayscale`
/// 4. なし → `base_url` そのまま
///
/// # Examples
/// ```
/// use photo_roll_common::resolve;
///
/// let url = resolve("https://picsum.photos/id/1/200/300", true, false);
/// assert_eq!(url, "https://picsum.photos/id/1/200/300/?blur=10");
/// ```
pub fn resolve(base_url: &str, blur: bool, grayscale: bool) -> String {
    match (blur, grayscale) {
        (true, true) => format!("{}/?blur={}&grayscale", base_url, BLUR_RADIUS),
        (true, false) => format!("{}/?blur={}", base_url, BLUR_RADIUS),
        (false, true) => format!("{}/?grayscale", base_url),
        (false, false) => base_url.to_string(),
    }
}
