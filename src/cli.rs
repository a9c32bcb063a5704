use clap::{Args, Parser, Subcommand};
use crate::config::StoreBackend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-roll")]
#[command(about = "ランダム写真ビューア（Picsum / Mars）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 選択ストア（省略時は設定ファイルの値）
    #[arg(long, global = true)]
    pub store: Option<StoreBackend>,
}

/// 表示変換の指定
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct TransformArgs {
    /// ぼかしを適用
    #[arg(long)]
    pub blur: bool,

    /// グレースケールを適用
    #[arg(long)]
    pub grayscale: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真一覧を取得してランダムに1枚表示
    Show {
        #[command(flatten)]
        transform: TransformArgs,

        /// 画面状態をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 写真を選び直す（ロール回数を加算）
    Roll {
        /// 選び直す回数
        #[arg(short = 'n', long, default_value = "1")]
        times: u32,
    },

    /// 表示中の写真URLをストアに保存
    Save {
        #[command(flatten)]
        transform: TransformArgs,
    },

    /// 最後に保存したURLを読み込んで表示
    Load,

    /// ロール回数を表示
    Rolls,

    /// Mars探査車の写真をランダムに1枚表示
    Mars,

    /// カメラ画像を取り込んでストアに記録
    Capture {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 保存先ディレクトリ（省略時は設定値）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 取り込み済みの写真を一覧表示
    Gallery {
        /// 対象ディレクトリ（省略時は設定値）
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// 対話モード（Roll / Blur / Gray / Save / Load）
    Session,

    /// 設定を表示/編集
    Config {
        /// ストアを設定
        #[arg(long)]
        set_store: Option<StoreBackend>,

        /// Firebase Realtime DatabaseのURLを設定
        #[arg(long)]
        set_firebase_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
