mod app;
mod audit;
mod auth;
mod config;
mod entries;
mod error;
mod options;
mod state;
mod validate;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "refgen=debug,axum=info,tower_http=info".to_string());
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
    options::seed::seed_defaults(&app_state.db).await?;

    // Log auth-state transitions observed on the session stream.
    let mut auth_rx = app_state.auth_events.subscribe();
    tokio::spawn(async move {
        while auth_rx.changed().await.is_ok() {
            let state = auth_rx.borrow_and_update().clone();
            tracing::info!(auth_state = ?state, "auth state changed");
        }
    });

    let app = app::build_app(app_state);
    app::serve(app).await
}
