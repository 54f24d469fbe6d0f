//! Timeclock Engine server.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::response::Redirect;
use axum::routing::get;
use clap::Parser;
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use timeclock_engine::api::{AppState, create_router};
use timeclock_engine::config::{ConfigLoader, RosterBackend};
use timeclock_engine::error::{EngineError, EngineResult};
use timeclock_engine::service::{ServiceSources, TimeclockService};
use timeclock_engine::sources::{
    PostgresStore, RosterCache, RosterSource, WorkdayClient, spawn_refresh_loop,
};
use timeclock_engine::telemetry;

const SITE_PATH: &str = "/analog";

#[derive(Debug, Parser)]
#[command(name = "timeclock-engine", version, about = "Workday time clock kiosk backend")]
struct Args {
    /// Configuration file.
    #[arg(short, long, default_value = "./config/timeclock.yaml")]
    config: PathBuf,

    /// Port to listen on, overriding the configuration.
    #[arg(short, long)]
    port: Option<u16>,

    /// Initial log level (debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(err) = run(args).await {
        error!(error = %err, "timeclock engine stopped");
        eprintln!("timeclock-engine: {err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> EngineResult<()> {
    let loader = ConfigLoader::load(&args.config)?;
    let log_level = telemetry::init(&loader.config().logging, args.log_level.as_deref())?;
    let calculator = loader.pay_period_calculator();
    let config = loader.into_config();

    let store = Arc::new(PostgresStore::connect_lazy(&config.database, config.station.hostname.clone()));
    let workday = Arc::new(WorkdayClient::new(config.workday.clone(), config.roster.export.clone())?);

    let mut roster_cache = None;
    let roster: Arc<dyn RosterSource> = match config.roster.backend {
        RosterBackend::Database => store.clone(),
        RosterBackend::Cache => {
            let cache = Arc::new(RosterCache::new(config.roster.snapshot_path.clone()));
            match cache.load_snapshot().await {
                Ok(count) => info!(records = count, "roster cache primed from snapshot"),
                Err(err) => warn!(error = %err, "ignoring unreadable roster snapshot"),
            }
            let trigger = Arc::new(Notify::new());
            spawn_refresh_loop(
                cache.clone(),
                workday.clone(),
                config.roster.refresh_interval(),
                config.roster.retry_interval(),
                trigger.clone(),
            );
            roster_cache = Some((cache.clone(), trigger));
            cache
        }
    };

    let service = TimeclockService::new(
        ServiceSources {
            roster,
            time_codes: store.clone(),
            punches: store,
            time_tracking: workday,
        },
        calculator,
        config.fetch_window,
        config.timeouts,
    );

    let mut state = AppState::new(service, log_level);
    if let Some((cache, trigger)) = roster_cache {
        state = state.with_roster_refresh(cache, trigger);
    }

    let static_dir = &config.server.static_dir;
    let site = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
    let app = Router::new()
        .route("/", get(|| async { Redirect::temporary(SITE_PATH) }))
        .nest_service(SITE_PATH, site)
        .merge(create_router(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let port = args.port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|err| EngineError::ServerFailure {
            addr: addr.clone(),
            message: format!("cannot listen: {err}"),
        })?;

    info!(
        %addr,
        roster_backend = ?config.roster.backend,
        station = %config.station.hostname,
        "timeclock engine listening"
    );
    axum::serve(listener, app)
        .await
        .map_err(|err| EngineError::ServerFailure {
            addr,
            message: err.to_string(),
        })
}
