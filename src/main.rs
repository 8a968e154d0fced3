use std::net::SocketAddr;

use axum::middleware::from_fn_with_state;
use clap::Parser;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dudiff::cli::Cli;
use dudiff::state::AppState;
use dudiff::{config, middleware, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration (embedded defaults -> dudiff.toml -> env/.env), then CLI overrides
    let mut app_cfg = config::load()?;
    cli.apply(&mut app_cfg);
    config::validate(&app_cfg)?;

    // Logging (stdout + daily rotated file)
    std::fs::create_dir_all(&app_cfg.logging.directory).ok();
    let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let file_appender =
        tracing_appender::rolling::daily(&app_cfg.logging.directory, &app_cfg.logging.file_name);
    let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stdout_nb))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_nb))
        .init();
    // Keep the guards alive so the non-blocking writers flush on exit
    let _log_guards = (stdout_guard, file_guard);

    let state = AppState::new(app_cfg.clone());
    let cfg_arc = state.config.clone();

    let app = routes::router(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg_arc, middleware::security_headers::security_headers_middleware));

    let host = &app_cfg.server.host;
    let port = app_cfg.server.port;
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen addr {}:{} - {}", host, port, e))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        "Looking for files under subdirectories under {}",
        app_cfg.reports.directory.display()
    );
    info!("Serving http://{}/<subdir>/<date1>..<date2>[.txt]", listener.local_addr()?);
    let today = chrono::Local::now().date_naive();
    info!(
        "Try http://{}/root/{}..{}",
        listener.local_addr()?,
        today - chrono::Duration::days(1),
        today
    );
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received. Stopping server...");
}
