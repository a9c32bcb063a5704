use std::fmt;
use tracing::warn;

use crate::error::Result;

/// ベストエフォートな副作用の結果
///
/// 失敗しても画面状態には影響しない。呼び出し側は無視してよい。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// 反映された
    Applied(T),
    /// 何もしなかった（対象なし・状態が変わっていた）
    Skipped,
    /// 失敗した（理由のみ保持）
    Failed(String),
}

impl<T> Outcome<T> {
    /// ストア操作の結果を変換（失敗はwarnログ）
    pub(crate) fn from_store(operation: &'static str, result: Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Applied(value),
            Err(e) => {
                warn!(operation, error = %e, "selection store operation failed");
                Outcome::Failed(e.to_string())
            }
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied(value) => write!(f, "{}", value),
            Outcome::Skipped => write!(f, "skipped"),
            Outcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhotoRollError;

    #[test]
    fn test_from_store_ok() {
        let outcome = Outcome::from_store("test", Ok(3u64));
        assert_eq!(outcome, Outcome::Applied(3));
        assert_eq!(outcome.to_string(), "3");
    }

    #[test]
    fn test_from_store_err() {
        let outcome: Outcome<u64> =
            Outcome::from_store("test", Err(PhotoRollError::Store("offline".into())));
        assert!(outcome.is_failed());
        assert!(outcome.to_string().contains("offline"));
        assert_eq!(outcome.applied(), None);
    }
}
