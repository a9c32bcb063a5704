use clap::Parser;
use photo_roll::{api, capture, cli, config, error, interactive, session, store};
use cli::{Cli, Commands, TransformArgs};
use config::Config;
use error::Result;
use photo_roll_common::UiState;
use session::{Outcome, PhotoSession};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if let Some(backend) = cli.store {
        config.store = backend;
    }

    match cli.command {
        Commands::Show { transform, json } => {
            let session = open_session(&config)?;
            interactive::fetch_with_spinner(&session).await;
            apply_transform(&session, transform)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&session.current_state())?);
            } else {
                print_selected(&session);
            }
        }

        Commands::Roll { times } => {
            let session = open_session(&config)?;
            interactive::fetch_with_spinner(&session).await;
            ensure_loaded(&session)?;

            for i in 1..=times {
                let outcome = session.reroll().await?;
                if let Some(photo) = session.current_state().selected() {
                    println!("[{}/{}] #{} {} → {}", i, times, photo.id, photo.author, photo.download_url);
                }
                if let Outcome::Failed(reason) = outcome {
                    println!("  ロール回数の更新に失敗: {}", reason);
                }
            }

            println!("\nRolls: {}", session.roll_count().await);
        }

        Commands::Save { transform } => {
            let session = open_session(&config)?;
            interactive::fetch_with_spinner(&session).await;
            apply_transform(&session, transform)?;

            match session.persist_selection().await? {
                Outcome::Applied(id) => {
                    println!("✔ 保存しました ({})", id);
                    print_selected(&session);
                }
                Outcome::Skipped => println!("保存対象がありません"),
                Outcome::Failed(reason) => println!("保存に失敗しました: {}", reason),
            }
        }

        Commands::Load => {
            let session = open_session(&config)?;
            interactive::fetch_with_spinner(&session).await;

            match session.restore_last_selection().await? {
                Outcome::Applied(url) => println!("✔ 読み込みました: {}", url),
                Outcome::Skipped => println!("保存された写真がありません"),
                Outcome::Failed(reason) => println!("読み込みに失敗しました: {}", reason),
            }
            print_selected(&session);
        }

        Commands::Rolls => {
            let store = store::open_store(&config)?;
            let count = store.roll_count().await?;
            println!("Rolls: {}", count);
        }

        Commands::Mars => {
            let client = api::MarsClient::from_config(&config)?;
            match client.random_photo().await? {
                Some(photo) => {
                    println!("🚀 Mars photo #{}", photo.id);
                    println!("   {}", photo.img_src);
                }
                None => println!("Mars写真がありません"),
            }
        }

        Commands::Capture { image, output } => {
            let store = store::open_store(&config)?;
            let photos_dir = match output {
                Some(dir) => dir,
                None => config.photos_dir_path()?,
            };

            let (saved, recorded) = capture::capture_photo(&image, &photos_dir, store.as_ref()).await?;
            println!("✔ 保存: {}", saved.display());
            match recorded {
                Outcome::Applied(id) => println!("✔ 記録: {}", id),
                Outcome::Skipped => {}
                Outcome::Failed(reason) => println!("記録に失敗しました: {}", reason),
            }
        }

        Commands::Gallery { dir } => {
            let photos_dir = match dir {
                Some(dir) => dir,
                None => config.photos_dir_path()?,
            };

            let captures = capture::list_captures(&photos_dir)?;
            if captures.is_empty() {
                println!("取り込み済みの写真がありません: {}", photos_dir.display());
            }
            for photo in &captures {
                println!("{}  {} bytes", photo.file_name, photo.size);
            }
        }

        Commands::Session => {
            let store = store::open_store(&config)?;
            let picsum = api::PicsumClient::from_config(&config)?;
            let session = PhotoSession::new(Arc::new(picsum), store.clone());
            let photos_dir = config.photos_dir_path()?;
            interactive::run_interactive_session(&session, store, &photos_dir).await?;
        }

        Commands::Config { set_store, set_firebase_url, show } => {
            // --store の一時指定は保存しない
            let mut config = Config::load()?;

            if let Some(backend) = set_store {
                config.set_store(backend)?;
                println!("✔ ストアを設定しました: {}", backend);
            }

            if let Some(url) = set_firebase_url {
                config.set_firebase_url(url)?;
                println!("✔ Firebase URLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  Picsum: {}", config.picsum_base_url);
                println!("  Mars: {}", config.mars_base_url);
                println!("  取得件数: {}", config.effective_page_limit());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  ストア: {}", config.store);
                println!(
                    "  Firebase URL: {}",
                    config.get_firebase_url().unwrap_or_else(|_| "未設定".into())
                );
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_session(config: &Config) -> Result<PhotoSession> {
    let picsum = api::PicsumClient::from_config(config)?;
    let store = store::open_store(config)?;
    Ok(PhotoSession::new(Arc::new(picsum), store))
}

fn ensure_loaded(session: &PhotoSession) -> Result<()> {
    if session.current_state().is_success() {
        Ok(())
    } else {
        Err(error::PhotoRollError::Network("写真一覧を取得できませんでした".into()))
    }
}

fn apply_transform(session: &PhotoSession, transform: TransformArgs) -> Result<()> {
    if !transform.blur && !transform.grayscale {
        return Ok(());
    }
    ensure_loaded(session)?;
    if transform.blur {
        session.toggle_blur()?;
    }
    if transform.grayscale {
        session.toggle_grayscale()?;
    }
    Ok(())
}

fn print_selected(session: &PhotoSession) {
    match session.current_state() {
        UiState::Success { photos, selected } => {
            println!("📷 #{} {} ({}x{}) / {}枚中", selected.id, selected.author, selected.width, selected.height, photos.len());
            println!("   {}", selected.url);
            if let Some(url) = session.resolved_url() {
                println!("   {}", url);
            }
        }
        UiState::Loading => println!("取得中..."),
        UiState::Error => println!("写真一覧の取得に失敗しました"),
    }
}
