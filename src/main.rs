use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use manga_reader::remote::rest::RestSource;
use manga_reader::remote::RemoteSource;
use manga_reader::route::ReadRoute;
use manga_reader::session::ReadingMode;
use manga_reader::settings::Settings;
use manga_reader::state::ReaderContext;
use manga_reader::store::preferences::{get_preference_string, set_preference};
use manga_reader::store::{PositionStore, SqlitePositionStore};
use manga_reader::{library, tui};

#[derive(Parser)]
#[command(author, version, about = "Terminal reading client for a hosted manga platform")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a reading session for a `/read/...` route or a (slug, chapter) pair
    Read {
        /// A `/read/{slug}/{chapter}` route, or a manga slug
        target: String,
        /// Chapter number, when `target` is a slug
        chapter: Option<String>,
        /// 1-based page to deep-link into
        #[arg(long)]
        page: Option<u32>,
    },
    /// Resume a manga from the remote bookmark
    Continue { slug: String },
    /// List approved manga
    Library,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    let store = SqlitePositionStore::open(&settings.db_url()).await?;
    let pool = store.pool().clone();

    let mut remote = RestSource::new(&settings.backend_url, &settings.backend_api_key);
    let mut viewer = None;
    if let (Some(email), Some(password)) = (&settings.email, &settings.password) {
        let auth = remote.sign_in(email, password).await?;
        remote = remote.with_token(&auth.access_token);
        tracing::info!("Signed in as {}", email);
        viewer = Some(auth);
    }

    let remote: Arc<dyn RemoteSource> = Arc::new(remote);
    let positions: Arc<dyn PositionStore> = Arc::new(store);

    let mut ctx = ReaderContext::new(remote, positions);
    ctx.viewer = viewer;
    ctx.allow_anonymous = settings.allow_anonymous;
    ctx.sync_quiet = Duration::from_millis(settings.sync_quiet_ms);
    ctx.controls_hide_after = Duration::from_millis(settings.controls_hide_ms);

    match cli.command {
        Command::Library => {
            let manga = ctx.remote.list_manga().await?;
            for entry in manga {
                println!(
                    "{:<40} {:<28} {:>4} chapter(s)  {}",
                    entry.title, entry.slug, entry.chapter_count, entry.status
                );
            }
        }
        Command::Read {
            target,
            chapter,
            page,
        } => {
            let route = match ReadRoute::parse(&target) {
                Some(mut route) => {
                    if page.is_some() {
                        route.page = page;
                    }
                    route
                }
                None => {
                    let chapter = chapter.ok_or_else(|| {
                        anyhow::anyhow!("Chapter number required when not passing a /read route")
                    })?;
                    ReadRoute::new(&target, &chapter, page)
                }
            };
            run_reader(&ctx, &pool, route).await?;
        }
        Command::Continue { slug } => {
            let route = library::continue_route(&ctx, &slug).await?;
            tracing::info!("Resuming at {}", route);
            run_reader(&ctx, &pool, route).await?;
        }
    }

    Ok(())
}

async fn run_reader(ctx: &ReaderContext, pool: &SqlitePool, route: ReadRoute) -> Result<()> {
    let stored = get_preference_string(pool, "reading_mode", "webtoon")
        .await
        .unwrap_or_else(|_| "webtoon".to_string());
    let mode = ReadingMode::from_name(&stored).unwrap_or(ReadingMode::Webtoon);

    let final_mode = tui::run(ctx, route, mode).await?;

    if let Err(e) = set_preference(pool, "reading_mode", final_mode.as_name()).await {
        tracing::warn!("Failed to persist reading mode: {}", e);
    }

    Ok(())
}
