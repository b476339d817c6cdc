//! Biaslens HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use biaslens::classifier::BiasClassifier;
use biaslens::config::Config;
use biaslens::pipeline::Pipeline;
use biaslens::priors::SourcePriors;
use biaslens::server::{AppState, create_router};
use biaslens::summary::Summarizer;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Biaslens starting"
    );

    if config.model_dir.is_none() {
        tracing::warn!("No BIASLENS_MODEL_DIR configured, running classifier in stub mode");
    }
    let classifier = BiasClassifier::load(config.classifier_config())?;
    let model_name = config
        .model_dir
        .as_deref()
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stub".to_string());

    let priors = match SourcePriors::load(&config.priors_path) {
        Ok(priors) => priors,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load source priors, continuing without");
            SourcePriors::empty()
        }
    };

    let summarizer = Summarizer::new(config.summary_config());
    let http_client = biaslens::fetch::build_client()?;

    let state = AppState::new(
        Arc::new(Pipeline::new(Arc::new(classifier))),
        Arc::new(priors),
        Arc::new(summarizer),
        http_client,
        config.max_fetch_chars,
        model_name,
    );

    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Biaslens shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("BIASLENS_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
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
