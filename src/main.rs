use lead_console::{router, AppState, ConsoleConfig};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = ConsoleConfig::from_env();
    info!(
        "upstream api at {} (window {} days, {} recent leads, timeout {:?})",
        config.upstream_url,
        config.request.window_days,
        config.request.recent_limit,
        config.request_timeout
    );

    let state = AppState::new(&config);
    let dashboard = state.dashboard.clone();
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("failed to install shutdown handler: {err}");
                std::future::pending::<()>().await;
            }
            info!("shutting down");
            dashboard.dispose().await;
        })
        .await?;

    Ok(())
}
