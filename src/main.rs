use anyhow::Result;
use clap::Parser;
use roperia::acta::FileActaRenderer;
use roperia::auth::ConfigCredentials;
use roperia::http::{router, AppState};
use roperia::{config, db};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    cfg.ensure_dirs()?;

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| format!("sqlite://{}/roperia.db", cfg.app.data_dir));

    let pool = db::init_pool(&database_url).await?;
    db::run_migrations(&pool).await?;

    let state = Arc::new(AppState {
        pool,
        acta: Arc::new(FileActaRenderer::new(cfg.acta_dir())),
        credentials: Arc::new(ConfigCredentials::new(cfg.auth.clone())),
    });

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr).await?;
    info!(addr = %cfg.server.bind_addr, "starting roperia server");
    axum::serve(listener, router(state)).await?;

    Ok(())
}
