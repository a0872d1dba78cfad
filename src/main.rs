//! Prism HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use prism::config::Config;
use prism::embedding::{ClipEngine, ClipEngineConfig};
use prism::gateway::{HandlerState, create_router_with_state};
use prism::scoring::ConfidenceScorer;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
 ┌─┐┬─┐┬┌─┐┌┬┐
 ├─┘├┬┘│└─┐│││
 ┴  ┴└─┴└─┘┴ ┴
   SPECIFIC OR GENERAL?
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        max_payload_bytes = ?config.max_payload_bytes,
        inference_timeout_ms = ?config.inference_timeout.map(|d| d.as_millis()),
        "Prism starting"
    );

    let engine_config = if let Some(path) = &config.model_path {
        ClipEngineConfig::new(path)
    } else {
        tracing::warn!("No PRISM_MODEL_PATH configured, running CLIP engine in stub mode");
        ClipEngineConfig::stub()
    };
    let engine = ClipEngine::load(engine_config)?;

    let scorer = Arc::new(ConfidenceScorer::new(engine));
    let state = HandlerState::from_config(Arc::clone(&scorer), &config);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and its state clone) is gone once serve returns.
    match Arc::try_unwrap(scorer) {
        Ok(scorer) => {
            drop(scorer.into_engine());
            tracing::info!("CLIP engine released");
        }
        Err(_) => {
            tracing::warn!("CLIP engine still referenced by an in-flight inference at shutdown");
        }
    }

    tracing::info!("Prism shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var(Config::ENV_PORT)
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5000);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
