//! Agora - paginated forum thread API.
//!
//! # Usage
//!
//! ```bash
//! # Start against PostgreSQL
//! DATABASE_URL=postgres://localhost/agora agora
//!
//! # Start with generated demo data, no database needed
//! agora --in-memory
//!
//! # Serve threads from a JSON file, without GraphiQL
//! agora --in-memory --seed-file threads.json --disable-playground
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use agora_core::metrics::init_metrics;
use agora_core::models::{CategoryId, Thread, ThreadId, UserId};
use agora_core::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PaginationConfig};
use agora_core::ports::ThreadSource;
use agora_core::services::Paginator;
use agora_graphql::{ServerConfig, serve_with_shutdown};
use agora_storage::{Database, DatabaseConfig, MemoryThreadSource, PgThreadSource};

/// Agora CLI - forum thread API server.
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(about = "Agora - keyset-paginated forum thread API")]
#[command(version)]
struct Cli {
    /// PostgreSQL database URL.
    #[arg(long, env = "DATABASE_URL", default_value = "postgres://localhost/agora")]
    database_url: String,

    /// GraphQL server port.
    #[arg(long, env = "GRAPHQL_PORT", default_value = "4000")]
    graphql_port: u16,

    /// Prometheus metrics port.
    #[arg(long, env = "METRICS_PORT", default_value = "9090")]
    metrics_port: u16,

    /// Page size used when a request gives neither `first` nor `last`.
    #[arg(long, env = "DEFAULT_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    default_page_size: u32,

    /// Largest page a request may ask for; bigger requests are clamped.
    #[arg(long, env = "MAX_PAGE_SIZE", default_value_t = MAX_PAGE_SIZE)]
    max_page_size: u32,

    /// Enable JSON log output.
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,

    /// Run database migrations and exit.
    #[arg(long)]
    migrate_only: bool,

    /// Serve threads from memory instead of PostgreSQL.
    #[arg(long, conflicts_with = "migrate_only")]
    in_memory: bool,

    /// JSON array of threads to load in memory mode (generated demo data otherwise).
    #[arg(long, env = "SEED_FILE", requires = "in_memory")]
    seed_file: Option<PathBuf>,

    /// Do not serve the GraphiQL playground.
    #[arg(long, env = "DISABLE_PLAYGROUND")]
    disable_playground: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let pagination_config = PaginationConfig {
        default_limit: cli.default_page_size,
        max_limit: cli.max_page_size,
    };
    pagination_config
        .validate()
        .context("Invalid pagination settings")?;

    // Prometheus metrics exporter (optional - failures don't crash the app)
    let metrics_addr = format!("0.0.0.0:{}", cli.metrics_port);
    let metrics_enabled = match metrics_addr.parse::<std::net::SocketAddr>() {
        Ok(metrics_addr) => {
            match PrometheusBuilder::new()
                .with_http_listener(metrics_addr)
                .install()
            {
                Ok(()) => {
                    init_metrics();
                    true
                }
                Err(e) => {
                    warn!(
                        "⚠️  Failed to start metrics exporter: {}. Continuing without metrics.",
                        e
                    );
                    false
                }
            }
        }
        Err(e) => {
            warn!("⚠️  Invalid metrics address: {}. Continuing without metrics.", e);
            false
        }
    };

    // ─────────────────────────────────────────────────────────────────────────
    // 🚀 STARTUP
    // ─────────────────────────────────────────────────────────────────────────
    info!("🚀 Starting Agora");
    debug!(
        default_limit = pagination_config.default_limit,
        max_limit = pagination_config.max_limit,
        "Pagination settings"
    );

    // ─────────────────────────────────────────────────────────────────────────
    // 🗄️ THREAD SOURCE
    // ─────────────────────────────────────────────────────────────────────────
    let (source, db): (Arc<dyn ThreadSource>, Option<Database>) = if cli.in_memory {
        let threads = match &cli.seed_file {
            Some(path) => read_seed_file(path)?,
            None => demo_threads(Utc::now()),
        };
        info!(threads = threads.len(), "🧪 Serving threads from memory");
        (Arc::new(MemoryThreadSource::from_threads(threads)), None)
    } else {
        debug!(database_url = %mask_password(&cli.database_url), "Database endpoint");

        info!("🗄️  Connecting to database...");
        let db = Database::connect(&DatabaseConfig::new(&cli.database_url))
            .await
            .context("Failed to connect to database")?;

        db.migrate().await.context("Failed to run migrations")?;
        db.ping().await.context("Database health check failed")?;
        info!("🗄️  Database ready (migrations applied)");

        if cli.migrate_only {
            info!("🛑 --migrate-only flag set, exiting");
            db.close().await;
            return Ok(());
        }

        (Arc::new(PgThreadSource::new(&db)), Some(db))
    };

    let paginator = Arc::new(Paginator::new(source, pagination_config));

    let graphql_config = ServerConfig {
        host: "0.0.0.0".to_string(),
        port: cli.graphql_port,
        enable_playground: !cli.disable_playground,
    };

    // ─────────────────────────────────────────────────────────────────────────
    // ✅ READY
    // ─────────────────────────────────────────────────────────────────────────
    info!("✅ Agora ready");
    info!("   ⚡ GraphQL:  http://localhost:{}/graphql", cli.graphql_port);
    if metrics_enabled {
        info!(
            "   📊 Metrics:  http://localhost:{}/metrics",
            cli.metrics_port
        );
    } else {
        info!("   📊 Metrics:  disabled");
    }
    info!("   Press Ctrl+C to stop");

    serve_with_shutdown(paginator, graphql_config, shutdown_signal())
        .await
        .context("GraphQL server failed")?;

    // ─────────────────────────────────────────────────────────────────────────
    // 🛑 SHUTDOWN
    // ─────────────────────────────────────────────────────────────────────────
    if let Some(db) = db {
        db.close().await;
    }

    info!("🛑 Shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}

/// Mask password in database URL for logging.
fn mask_password(url_str: &str) -> String {
    match url::Url::parse(url_str) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => url_str.to_string(),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutting down...");
}

/// Load threads for memory mode from a JSON array.
fn read_seed_file(path: &Path) -> Result<Vec<Thread>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    parse_seed(&json).with_context(|| format!("Invalid seed file {}", path.display()))
}

fn parse_seed(json: &str) -> Result<Vec<Thread>> {
    let threads: Vec<Thread> = serde_json::from_str(json)?;
    if let Some(bad) = threads.iter().find(|t| t.view_count < 0 || t.reply_count < 0) {
        anyhow::bail!("thread {} has a negative counter", bad.id);
    }
    Ok(threads)
}

const DEMO_TOPICS: [&str; 6] = [
    "Borrow checker puzzles",
    "Async runtimes compared",
    "Show your side project",
    "Error handling patterns",
    "Embedded Rust on a budget",
    "Macro hygiene questions",
];

/// Deterministic demo threads spread over the last few days.
///
/// Some threads share a creation time or view count so that tie-breaking
/// on id is visible when paging.
fn demo_threads(now: DateTime<Utc>) -> Vec<Thread> {
    (1..=60)
        .map(|i: i64| {
            let created_at = now - Duration::hours(60 - i / 2);
            Thread {
                id: ThreadId(i),
                title: format!("{} ({})", DEMO_TOPICS[(i % 6) as usize], i),
                category_id: CategoryId(1 + i % 4),
                author_id: UserId(100 + i % 7),
                is_pinned: i % 15 == 0,
                view_count: (i * 37) % 500,
                reply_count: i % 11,
                created_at,
                last_activity_at: created_at + Duration::minutes((i * 53) % 900),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_password_hides_credentials() {
        let masked = mask_password("postgres://agora:s3cret@db:5432/agora");
        assert!(!masked.contains("s3cret"));
        assert!(masked.contains("****"));
        assert_eq!(mask_password("not a url"), "not a url");
    }

    #[test]
    fn test_demo_threads_are_consistent() {
        let now = Utc::now();
        let threads = demo_threads(now);
        assert_eq!(threads.len(), 60);
        assert!(threads.iter().all(|t| t.created_at <= t.last_activity_at));
        assert!(threads.iter().all(|t| t.created_at <= now));
        // Pairs of threads share a creation time.
        assert_eq!(threads[1].created_at, threads[2].created_at);
    }

    #[test]
    fn test_cli_rejects_migrate_only_with_in_memory() {
        let result = Cli::try_parse_from(["agora", "--in-memory", "--migrate-only"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_seed_file_requires_in_memory() {
        assert!(Cli::try_parse_from(["agora", "--seed-file", "threads.json"]).is_err());

        let cli =
            Cli::try_parse_from(["agora", "--in-memory", "--seed-file", "threads.json"]).unwrap();
        assert_eq!(cli.seed_file, Some(PathBuf::from("threads.json")));
        assert!(!cli.disable_playground);
    }

    #[test]
    fn test_parse_seed() {
        let json = r#"[{
            "id": 7, "title": "Hello", "category_id": 1, "author_id": 42,
            "is_pinned": false, "view_count": 3, "reply_count": 0,
            "created_at": "2024-01-01T00:00:00Z",
            "last_activity_at": "2024-01-01T00:00:00Z"
        }]"#;
        let threads = parse_seed(json).unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].id, ThreadId(7));

        let negative = json.replace(r#""view_count": 3"#, r#""view_count": -3"#);
        assert!(parse_seed(&negative).is_err());
        assert!(parse_seed("{}").is_err());
    }
}
