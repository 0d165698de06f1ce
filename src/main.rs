use anyhow::Context;
use tracing::{info, warn, Instrument};

use rentsquare::api::{self, AppState};
use rentsquare::app_system::{seed_demo_data, setup_tracing, RentalSystem};
use rentsquare::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    setup_tracing(&config);

    info!(?config, "Starting RentSquare");

    // Create the entire rental system (starts all actors)
    let system = RentalSystem::new(&config);

    if config.seed_demo_data {
        let span = tracing::info_span!("demo_seed");
        seed_demo_data(&system)
            .instrument(span)
            .await
            .context("seeding demo data")?;
    }

    let app = api::router(AppState::from_system(&system));
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {}", address))?;
    info!(%address, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    // Shutdown system gracefully
    system.shutdown().await.map_err(anyhow::Error::msg)?;

    info!("RentSquare stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
