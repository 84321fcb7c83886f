mod app;
mod auth;
mod config;
mod db;
mod error;
mod images;
mod recipes;
mod search;
mod state;
mod storage;
mod validation;

#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "recipebox=debug,axum=info,tower_http=info".to_string());
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

    let app_state = state::AppState::init().await?;
    tracing::info!(
        database_url = %app_state.config.database_url,
        upload_dir = %app_state.config.upload_dir,
        demo_sqli = app_state.config.enable_demo_sqli,
        "state ready"
    );

    let host = app_state.config.host.clone();
    let port = app_state.config.port;
    let app = app::build_app(app_state);

    app::serve(app, &host, port).await
}
