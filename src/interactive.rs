//! 対話モード
//!
//! 元アプリのボタン列（Photo / Roll / Blur / Gray / Save / Load）と
//! ロール回数の表示をターミナルで再現する。

use crate::capture;
use crate::error::{PhotoRollError, Result};
use crate::session::{Outcome, PhotoSession};
use crate::store::SelectionStore;
use dialoguer::Input;
use indicatif::ProgressBar;
use photo_roll_common::UiState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// 写真を選び直す
    Roll,
    /// ぼかし切り替え
    Blur,
    /// グレースケール切り替え
    Gray,
    /// 表示中のURLを保存
    Save,
    /// 最後に保存したURLを読み込み
    Load,
    /// 一覧を取得し直す
    Refresh,
    /// カメラ画像を取り込む
    Photo(PathBuf),
    /// 終了
    Quit,
    /// 不明な入力
    Unknown(String),
}

/// 入力をアクションに変換
pub fn parse_action(input: &str) -> SessionAction {
    let trimmed = input.trim();
    let (command, argument) = match trimmed.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (trimmed, ""),
    };

    match command.to_lowercase().as_str() {
        "" | "r" | "roll" => SessionAction::Roll,
        "b" | "blur" => SessionAction::Blur,
        "g" | "gray" | "grey" | "grayscale" => SessionAction::Gray,
        "s" | "save" => SessionAction::Save,
        "l" | "load" => SessionAction::Load,
        "f" | "refresh" => SessionAction::Refresh,
        "p" | "photo" if !argument.is_empty() => SessionAction::Photo(PathBuf::from(argument)),
        "q" | "quit" | "exit" => SessionAction::Quit,
        _ => SessionAction::Unknown(trimmed.to_string()),
    }
}

/// 対話モードを実行
pub async fn run_interactive_session(
    session: &PhotoSession,
    store: Arc<dyn SelectionStore>,
    photos_dir: &Path,
) -> Result<()> {
    fetch_with_spinner(session).await;

    println!("---");
    println!("操作: [Enter/r]Roll [b]Blur [g]Gray [s]Save [l]Load [f]再取得 [p <画像>]Photo [q]終了");
    println!("---\n");

    loop {
        print_status(session).await;

        let input: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| PhotoRollError::CliExecution(e.to_string()))?;

        match parse_action(&input) {
            SessionAction::Roll => match session.reroll().await {
                Ok(outcome) => report("ロール回数", &outcome),
                Err(e) => println!("  → {}", e),
            },
            SessionAction::Blur => match session.toggle_blur() {
                Ok(t) => println!("  → ぼかし: {}", on_off(t.blur)),
                Err(e) => println!("  → {}", e),
            },
            SessionAction::Gray => match session.toggle_grayscale() {
                Ok(t) => println!("  → グレースケール: {}", on_off(t.grayscale)),
                Err(e) => println!("  → {}", e),
            },
            SessionAction::Save => match session.persist_selection().await {
                Ok(outcome) => report("保存", &outcome),
                Err(e) => println!("  → {}", e),
            },
            SessionAction::Load => match session.restore_last_selection().await {
                Ok(outcome) => report("読み込み", &outcome),
                Err(e) => println!("  → {}", e),
            },
            SessionAction::Refresh => fetch_with_spinner(session).await,
            SessionAction::Photo(path) => {
                match capture::capture_photo(&path, photos_dir, store.as_ref()).await {
                    Ok((saved, outcome)) => {
                        println!("  → 保存: {}", saved.display());
                        report("記録", &outcome);
                    }
                    Err(e) => println!("  → {}", e),
                }
            }
            SessionAction::Quit => {
                println!("終了します");
                break;
            }
            SessionAction::Unknown(input) => {
                println!("  → 不明な操作: {}", input);
            }
        }
        println!();
    }

    Ok(())
}

/// スピナーを出しながら取得
pub async fn fetch_with_spinner(session: &PhotoSession) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("写真一覧を取得中...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    session.refresh().await;

    let state = session.current_state();
    let message = match &state {
        UiState::Success { photos, .. } => format!("✔ {}枚の写真を取得", photos.len()),
        UiState::Error => "✗ 写真一覧の取得に失敗しました（[f]で再取得）".to_string(),
        UiState::Loading => "取得中...".to_string(),
    };
    spinner.finish_with_message(message);
}

async fn print_status(session: &PhotoSession) {
    let rolls = session.roll_count().await;
    match session.current_state() {
        UiState::Success { selected, .. } => {
            let url = session.resolved_url().unwrap_or_default();
            println!("📷 #{} {} ({}x{})", selected.id, selected.author, selected.width, selected.height);
            println!("   {}", url);
        }
        UiState::Loading => println!("⏳ 取得中..."),
        UiState::Error => println!("✗ 写真なし"),
    }
    println!("   Rolls: {}", rolls);
}

fn report<T: std::fmt::Display>(label: &str, outcome: &Outcome<T>) {
    match outcome {
        Outcome::Applied(value) => println!("  → {}: {}", label, value),
        Outcome::Skipped => println!("  → {}: 対象なし", label),
        Outcome::Failed(reason) => println!("  → {}に失敗（表示はそのまま）: {}", label, reason),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}
