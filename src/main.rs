mod app;
mod auth;
mod config;
mod error;
mod extract;
mod health;
mod state;
mod users;

use crate::state::AppState;
use crate::users::seed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "userdir=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;

    sqlx::migrate!("./migrations").run(&app_state.db).await?;

    if let Some(path) = app_state.config.seed_file.clone() {
        match seed::load_seed_file(&path).await {
            Ok(records) => {
                seed::seed_users(&app_state.users, records).await;
            }
            Err(e) => tracing::error!(error = %format!("{e:#}"), "failed loading seed file"),
        }
    }

    let (host, port) = (app_state.config.host.clone(), app_state.config.port);
    let router = app::build_app(app_state);
    app::serve(router, &host, port).await
}
