use arabic_news_snapshots::cli::{Cli, Command};
use arabic_news_snapshots::config::Settings;
use arabic_news_snapshots::db::UserStore;
use arabic_news_snapshots::export::{export_combined, resolve_date};
use arabic_news_snapshots::fetch::HttpFetcher;
use arabic_news_snapshots::snapshot::SnapshotStore;
use arabic_news_snapshots::utils::ensure_writable_dir;
use arabic_news_snapshots::web::{self, AppState, auth::SessionStore};
use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    let mut settings = Settings::load(args.config.as_deref())?;
    settings.apply_cli(&args);
    debug!(?settings, "Resolved settings");

    if let Err(e) = ensure_writable_dir(&settings.data_dir).await {
        error!(
            path = %settings.data_dir.display(),
            error = %e,
            "Data directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let fetcher = HttpFetcher::new(&settings.user_agent, settings.timeout())?;
    let snapshots = SnapshotStore::new(&settings.data_dir);

    match args.command {
        Command::Serve { .. } => {
            let users = UserStore::connect(&settings.database_url).await?;
            let state = Arc::new(AppState {
                snapshots,
                fetcher: Arc::new(fetcher),
                users,
                sessions: SessionStore::default(),
                require_auth: settings.require_auth,
                password_cost: settings.password_cost,
            });
            info!(require_auth = settings.require_auth, "Starting web server");
            web::serve(&settings.bind, web::router(state, &settings.static_dir)).await?;
        }
        Command::Scrape { date } => {
            let path = export_combined(&snapshots, &fetcher, date.as_deref()).await?;
            println!("{}", path.display());
        }
        Command::Snapshot { source, date } => {
            let date = resolve_date(date.as_deref())?;
            let path = snapshots
                .ensure_snapshot(source.source(), &fetcher, date)
                .await?;
            println!("{}", path.display());
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
