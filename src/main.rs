use clarity::analysis::GenerativeClient;
use clarity::session::Session;
use clarity::{AppState, Config, StoragePaths, load_session, router};
use chrono::Local;
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let paths = StoragePaths::new(config.data_path.clone());
    let today = Local::now().date_naive();
    let data = load_session(&paths, today).await?;
    info!(
        check_ins = data.check_ins.len(),
        habits = data.habits.len(),
        "session loaded from {}",
        paths.data.display()
    );

    let analyzer = GenerativeClient::new(
        config.analysis_url.clone(),
        config.analysis_model.clone(),
        config.analysis_api_key.clone(),
    );
    let state = AppState::new(
        paths,
        Session::new(data, today),
        Arc::new(analyzer),
        config.follow_up_delay_ms,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
    info!("shutting down");
}
