//! 写真セッション
//!
//! 画面状態（UiState）の唯一の所有者。状態の変更はこのモジュールのメソッド経由だけで行い、
//! 読み手には `current_state` のスナップショットか `subscribe` の受信側を渡す。
//!
//! - refresh: Loading → 取得 → Success / Error
//! - reroll / toggle_* / persist_selection / restore_last_selection: Successのときだけ有効
//! - ストアへの副作用はベストエフォートで、結果は [`Outcome`] で返す
//!
//! refreshは呼ぶたびにリクエストエポックを進め、完了時に最新エポックでなければ結果を捨てる。

mod outcome;

pub use outcome::Outcome;

use crate::api::PhotoApi;
use crate::error::{PhotoRollError, Result};
use crate::store::SelectionStore;
use photo_roll_common::{DisplayTransform, Photo, SelectionRecord, UiState};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct PhotoSession {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn PhotoApi>,
    store: Arc<dyn SelectionStore>,
    state: watch::Sender<UiState>,
    transform: Mutex<DisplayTransform>,
    /// 最後に発行したrefreshのエポック（状態のロック内でだけ進める）
    epoch: AtomicU64,
    rng: Mutex<StdRng>,
}

impl PhotoSession {
    /// Loading状態のセッションを作る（取得は `refresh` を呼ぶまで行わない）
    pub fn new(api: Arc<dyn PhotoApi>, store: Arc<dyn SelectionStore>) -> Self {
        Self::with_rng(api, store, StdRng::from_entropy())
    }

    /// 乱数生成器を指定して作る
    pub fn with_rng(api: Arc<dyn PhotoApi>, store: Arc<dyn SelectionStore>, rng: StdRng) -> Self {
        let (state, _) = watch::channel(UiState::Loading);
        Self {
            inner: Arc::new(Inner {
                api,
                store,
                state,
                transform: Mutex::new(DisplayTransform::default()),
                epoch: AtomicU64::new(0),
                rng: Mutex::new(rng),
            }),
        }
    }

    /// セッションを作り、初回取得をバックグラウンドで始める
    ///
    /// tokioランタイム内で呼ぶこと。戻った直後の状態はLoading。
    pub fn start(api: Arc<dyn PhotoApi>, store: Arc<dyn SelectionStore>) -> Self {
        let session = Self::new(api, store);
        let background = session.clone();
        tokio::spawn(async move {
            background.refresh().await;
        });
        session
    }

    /// 写真一覧を取得し直す
    ///
    /// 戻り値はこの取得結果が状態に反映されたかどうか。
    /// 後から別のrefreshが発行されていた場合は反映せず `false`。
    pub async fn refresh(&self) -> bool {
        let mut epoch = 0;
        self.inner.state.send_modify(|state| {
            epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            *state = UiState::Loading;
        });
        debug!(epoch, "photo fetch started");

        let next = match self.inner.api.fetch_photos().await {
            Ok(photos) => match self.pick(&photos) {
                Some(selected) => UiState::success(photos, selected),
                None => {
                    warn!(epoch, "photo list is empty");
                    UiState::Error
                }
            },
            Err(e) => {
                warn!(epoch, error = %e, "photo fetch failed");
                UiState::Error
            }
        };

        let label = next.label();
        let roll_new_photo = next.is_success();
        let applied = self.inner.state.send_if_modified(|state| {
            if self.inner.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            if roll_new_photo {
                self.lock_transform().reset();
            }
            *state = next;
            true
        });

        if applied {
            info!(epoch, state = label, "photo fetch finished");
        } else {
            debug!(epoch, "discarding stale photo fetch result");
        }
        applied
    }

    /// 取得済み一覧から写真を選び直す
    ///
    /// 同じ写真が続けて選ばれることもある。表示変換はリセットされる。
    /// ロール回数の加算はベストエフォート（失敗しても選び直した写真はそのまま）。
    pub async fn reroll(&self) -> Result<Outcome<u64>> {
        let mut rolled: Option<Photo> = None;
        self.inner.state.send_if_modified(|state| {
            let Some(selected) = self.pick(state.photos()) else {
                return false;
            };
            if let UiState::Success { photos, .. } = std::mem::take(state) {
                *state = UiState::success(photos, selected.clone());
            }
            self.lock_transform().reset();
            rolled = Some(selected);
            true
        });

        let selected = rolled.ok_or(PhotoRollError::NotReady("reroll"))?;
        info!(id = %selected.id, author = %selected.author, "rolled new photo");

        let result = self.inner.store.increment_rolls().await;
        Ok(Outcome::from_store("increment_rolls", result))
    }

    pub fn toggle_blur(&self) -> Result<DisplayTransform> {
        self.update_transform("toggle_blur", DisplayTransform::toggle_blur)
    }

    pub fn toggle_grayscale(&self) -> Result<DisplayTransform> {
        self.update_transform("toggle_grayscale", DisplayTransform::toggle_grayscale)
    }

    fn update_transform(
        &self,
        operation: &'static str,
        update: impl FnOnce(&mut DisplayTransform),
    ) -> Result<DisplayTransform> {
        let state = self.inner.state.borrow();
        if !state.is_success() {
            return Err(PhotoRollError::NotReady(operation));
        }
        let mut transform = self.lock_transform();
        update(&mut transform);
        debug!(operation, blur = transform.blur, grayscale = transform.grayscale, "display transform changed");
        Ok(*transform)
    }

    /// 表示中のURL（変換込み）を現在時刻付きでストアに追記
    pub async fn persist_selection(&self) -> Result<Outcome<String>> {
        let url = self
            .resolved_url()
            .ok_or(PhotoRollError::NotReady("persist_selection"))?;
        let record = SelectionRecord::new(url, chrono::Utc::now().timestamp_millis());
        info!(url = %record.url, timestamp = record.timestamp, "persisting selection");

        let result = self.inner.store.push_selection(&record).await;
        Ok(Outcome::from_store("push_selection", result))
    }

    /// 最後に保存したURLを表示中の写真に適用
    ///
    /// 写真のIDなどはそのままで、download_urlだけ差し替えたレコードに置き換える。
    /// 保存がない・待っている間にrefreshされた場合は `Skipped`。
    pub async fn restore_last_selection(&self) -> Result<Outcome<String>> {
        let epoch = {
            let state = self.inner.state.borrow();
            if !state.is_success() {
                return Err(PhotoRollError::NotReady("restore_last_selection"));
            }
            self.inner.epoch.load(Ordering::SeqCst)
        };

        let record = match self.inner.store.last_selection().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("no saved selection to restore");
                return Ok(Outcome::Skipped);
            }
            Err(e) => return Ok(Outcome::from_store("last_selection", Err(e))),
        };

        let applied = self.inner.state.send_if_modified(|state| {
            if self.inner.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            let Some(restored) = state.selected().map(|p| p.with_download_url(record.url.clone())) else {
                return false;
            };
            if let UiState::Success { photos, .. } = std::mem::take(state) {
                *state = UiState::success(photos, restored);
            }
            true
        });

        if applied {
            info!(url = %record.url, timestamp = record.timestamp, "restored last selection");
            Ok(Outcome::Applied(record.url))
        } else {
            debug!("photo list changed while restoring; restore skipped");
            Ok(Outcome::Skipped)
        }
    }

    /// ロール回数（取得できなければ0）
    pub async fn roll_count(&self) -> u64 {
        match self.inner.store.roll_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "failed to read roll count");
                0
            }
        }
    }

    /// 現在の状態のスナップショット
    pub fn current_state(&self) -> UiState {
        self.inner.state.borrow().clone()
    }

    /// 状態の変更を購読
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.inner.state.subscribe()
    }

    pub fn transform(&self) -> DisplayTransform {
        *self.lock_transform()
    }

    /// 表示中の写真の変換後URL（Success以外はNone）
    pub fn resolved_url(&self) -> Option<String> {
        let state = self.inner.state.borrow();
        let selected = state.selected()?;
        Some(self.lock_transform().apply(&selected.download_url))
    }

    fn pick(&self, photos: &[Photo]) -> Option<Photo> {
        let mut rng = self.inner.rng.lock().unwrap_or_else(PoisonError::into_inner);
        photos.choose(&mut *rng).cloned()
    }

    fn lock_transform(&self) -> MutexGuard<'_, DisplayTransform> {
        self.inner.transform.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for PhotoSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoSession")
            .field("state", &self.inner.state.borrow().label())
            .field("transform", &self.transform())
            .field("epoch", &self.inner.epoch.load(Ordering::SeqCst))
            .finish()
    }
}
