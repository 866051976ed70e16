use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    http::{HeaderName, Request},
    routing::get,
    Router,
};
use clap::{Parser, Subcommand};
use daily_outfit::config::DailyOutfitConfig;
use daily_outfit::module::MODULE_NAME;
use daily_outfit::DailyOutfitModule;
use runtime::{AppConfig, CliArgs, DatabaseConfig, ServerConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

const IN_MEMORY_DSN: &str = "sqlite::memory:";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` when no query is given so the file is created on first start.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case(IN_MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(IN_MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}

/// Outfit Server - weather-aware daily outfit recommendations
#[derive(Parser)]
#[command(name = "outfit-server")]
#[command(about = "Outfit Server - weather-aware daily outfit recommendations")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        port: cli.port,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Outfit Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args).await,
    }
}

/// Only SQLite is compiled in.
fn ensure_sqlite(cfg: &DatabaseConfig) -> Result<()> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" | "sqlite3" => Ok(()),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

const DEFAULT_POOL_SIZE: u32 = 10;

/// Every in-memory connection is a separate database, so those pools hold one.
fn pool_size(db: Option<&DatabaseConfig>, in_memory: bool) -> u32 {
    match db.and_then(|d| d.max_conns) {
        _ if in_memory => 1,
        Some(n) => n.max(1),
        None => DEFAULT_POOL_SIZE,
    }
}

async fn connect_db(config: &AppConfig, args: &CliArgs) -> Result<DatabaseConnection> {
    let base_dir = PathBuf::from(&config.server.home_dir);

    let (dsn, db_config) = match (&config.database, args.mock) {
        (_, true) => (IN_MEMORY_DSN.to_string(), None),
        (Some(db), false) => {
            ensure_sqlite(db)?;
            let dsn = db.url.trim().replacen("sqlite3://", "sqlite://", 1);
            (absolutize_sqlite_dsn(&dsn, &base_dir, true)?, Some(db))
        }
        (None, false) => {
            tracing::warn!("No database configuration found, using in-memory SQLite");
            (IN_MEMORY_DSN.to_string(), None)
        }
    };

    let in_memory = dsn == IN_MEMORY_DSN;
    let max_conns = pool_size(db_config, in_memory);

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.max_connections(max_conns)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if in_memory {
        opts.min_connections(1);
    }
    if let Some(ms) = db_config.and_then(|d| d.busy_timeout_ms) {
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(Duration::from_millis(u64::from(ms))));
    }

    tracing::info!("Connecting to database: {}", dsn);
    Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database '{dsn}'"))
}

fn build_router(module: &DailyOutfitModule, server: &ServerConfig) -> Router {
    let mut router = module.register_rest(Router::new().route("/health", get(health_check)));

    // Outermost last: SetRequestId -> PropagateRequestId -> Trace -> Timeout -> CORS -> BodyLimit
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    router = router.layer(RequestBodyLimitLayer::new(1024 * 1024));
    router = router.layer(CorsLayer::permissive());
    if server.timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(server.timeout_sec)));
    }
    router = router.layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let rid = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("n/a");
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri().path(),
            version = ?req.version(),
            request_id = %rid,
        )
    }));
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router.layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
}

async fn health_check() -> &'static str {
    "ok"
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let module_cfg: DailyOutfitConfig = config.module_config(MODULE_NAME)?;
    let db = connect_db(&config, &args).await?;
    DailyOutfitModule::migrate(&db).await?;
    let module = DailyOutfitModule::init(&module_cfg, db)?;

    let router = build_router(&module, &config.server);
    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Invalid bind address '{}:{}'",
                config.server.host, config.server.port
            )
        })?;
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .map_err(|e| anyhow!(e))
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = tokio::signal::ctrl_c() => {},
                }
            }
            Err(e) => {
                tracing::warn!("shutdown: SIGTERM handler unavailable ({}); waiting for ctrl_c()", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("HTTP server shutting down gracefully");
}

async fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let module_cfg: DailyOutfitConfig = config.module_config(MODULE_NAME)?;
    for (name, raw) in [
        ("weather.base_url", Some(&module_cfg.weather.base_url)),
        ("generator.base_url", Some(&module_cfg.generator.base_url)),
        ("images.base_url", module_cfg.images.base_url.as_ref()),
    ] {
        if let Some(raw) = raw {
            Url::parse(raw).with_context(|| format!("Invalid {MODULE_NAME}.{name}: '{raw}'"))?;
        }
    }

    if !args.mock {
        if let Some(db) = &config.database {
            ensure_sqlite(db)?;
        }
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
