use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use sched_web::auth::AuthGate;
use sched_web::{create_router, AppState};

#[derive(Parser)]
#[command(
    name = "sched-web-server",
    about = "HTTP server for the sched task scheduler"
)]
struct Args {
    /// Path to the SQLite database [default: ~/.sched/sched.db]
    #[arg(long, env = "SCHED_DB")]
    db: Option<String>,

    /// Port to listen on
    #[arg(long, env = "SCHED_PORT", default_value = "7540",
          value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Directory with the static frontend
    #[arg(long, env = "SCHED_WEB_DIR", default_value = "./web")]
    web_dir: String,

    /// Password protecting the task API (auth is disabled when unset)
    #[arg(long, env = "SCHED_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let db_path = args.db.unwrap_or_else(sched::paths::db_path);
    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    let conn = sched::db::open(&db_path)?;
    sched::db::init(&conn)?;

    let auth = args.password.filter(|p| !p.is_empty()).map(AuthGate::new);
    if auth.is_none() {
        log::warn!("no password configured; task API is unauthenticated");
    }

    let state = Arc::new(AppState::new(conn, auth));
    let app = create_router(state, &args.web_dir);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("listening on {addr}, database {db_path}");
    axum::serve(listener, app).await?;
    Ok(())
}
