//! Valegate server binary.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use valegate::{AppState, Config, Kv, router};

/// Order, delivery-token and license lifecycle engine.
#[derive(Parser, Debug)]
#[command(name = "valegate", version, about)]
struct Args {
    /// Bind host (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database path (overrides DATABASE_PATH)
    #[arg(long)]
    database: Option<String>,
}

/// How often expired KV entries are swept. Expiry is already enforced
/// lazily on read; the sweep only reclaims space.
const PURGE_INTERVAL_SECS: u64 = 600;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "valegate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }

    if config.admin_secret.is_none() {
        tracing::warn!("ADMIN_SECRET is not set; all admin routes will reject");
    }
    if config.webhook_secret.is_none() {
        tracing::warn!("WEBHOOK_SECRET is not set; the payment webhook will reject");
    }

    let kv = Kv::open(&config.database_path)
        .with_context(|| format!("opening key-value store at {}", config.database_path))?;

    let purge_kv = kv.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(PURGE_INTERVAL_SECS));
        loop {
            interval.tick().await;
            match purge_kv.purge_expired() {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "purged expired entries"),
                Err(error) => tracing::warn!(%error, "expired-entry purge failed"),
            }
        }
    });

    let addr = config.addr();
    let app = router(AppState::new(kv, &config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, base_url = %config.base_url, "valegate listening");

    axum::serve(listener, app).await?;
    Ok(())
}
