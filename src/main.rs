mod routes;
mod logger;
mod config;
mod response;
mod error;
mod models;
mod middleware;
mod state;
mod handler;
mod service;
mod pipeline;

mod tracer;

use std::sync::Arc;
use anyhow::{Context, Error};
use log::{error, info};
use opentelemetry::global;
use opentelemetry::global::shutdown_tracer_provider;
use tokio::signal;
use crate::config::settings::Settings;
use crate::logger::logger::setup_logger;
use crate::pipeline::client::azure_face_client::AzureFaceClient;
use crate::pipeline::match_pipeline::match_pipeline::MatchPipeline;
use crate::routes::root::root_routes;
use crate::state::match_state::MatchState;


#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
use crate::tracer::tracer::init_tracer_provider;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = Settings::new().context("failed to load settings")?;

    // Setup logger
    setup_logger(&settings);
    let addr = format!("0.0.0.0:{}", settings.server.http_port);

    // Setup pipeline
    let face_client = AzureFaceClient::new(&settings.face_api).context("failed to init face api client")?;
    let match_pipeline = Arc::new(MatchPipeline::new(Arc::new(face_client)));
    info!("completed initializing pipeline against {}", settings.face_api.endpoint);

    // Setup tracing
    if let Some(tracer) = &settings.tracer {
        let tracer_provider = init_tracer_provider(tracer, &settings.app.name)
            .context("failed to initialize tracer provider")?;
        global::set_tracer_provider(tracer_provider);
        info!("exporting traces to {}", tracer.uri);
    }

    // Init server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("starting api server on {:?}", addr);
    let match_state = MatchState::new(&match_pipeline, &settings.app.name);

    let served = axum::serve(listener, root_routes(match_state, &settings.server))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    shutdown_tracer_provider();
    served.context("api server stopped with error")?;
    info!("api server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
