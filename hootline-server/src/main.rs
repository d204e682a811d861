//! hootlined: the hoots API server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hootline_core::AppConfig;
use hootline_server::auth::TokenVerifier;
use hootline_server::db::{self, PgStore};
use hootline_server::AppState;

#[derive(Parser, Debug)]
#[command(
    name = "hootlined",
    version,
    about = "Bearer-token-guarded CRUD API for hoots"
)]
struct Args {
    /// Path to a TOML config file (default: ./hootline.toml if present)
    #[arg(long, env = "HOOTLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:3000
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Postgres connection string
    #[arg(long)]
    database_url: Option<String>,

    /// Allow any CORS origin (development only)
    #[arg(long)]
    cors_permissive: bool,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!("failed to initialize tracing: {err}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.debug)?;

    let mut config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    if args.cors_permissive {
        config.server.cors_permissive = true;
    }

    let secret = config.jwt_secret().context("incomplete configuration")?;
    let verifier = TokenVerifier::new(secret);

    let pool = db::create_pool(&config.database)
        .await
        .context("connecting to Postgres")?;
    db::migrations::run(&pool).await.context("running migrations")?;

    let store = Arc::new(PgStore::new(pool));
    let state = AppState::new(store.clone(), store, verifier);

    hootline_server::serve(state, &config.server)
        .await
        .context("server error")?;
    Ok(())
}
