// main.rs
use diyled_bridge::{
    config::Settings,
    devices::{Device, DiyLedLamp, poller::Poller},
    events::EventBus,
    handlers::{self, AppState},
    metrics::setup_metrics,
    models::{Channel, ChannelState},
    transport::HttpTransport,
};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    if settings.metrics.enabled {
        setup_metrics(settings.metrics.port)
            .map_err(|e| anyhow::anyhow!("Failed to setup metrics: {}", e))?;
    }

    let events = Arc::new(EventBus::new());
    for channel in [Channel::Power, Channel::Brightness] {
        events.subscribe(channel, move |state: ChannelState| {
            debug!(channel = channel.id(), ?state, "Channel state updated");
        });
    }

    let transport = HttpTransport::new(settings.http)
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
    let lamp: Arc<dyn Device> = Arc::new(
        DiyLedLamp::new(settings.device, transport, events)
            .map_err(|e| anyhow::anyhow!("Failed to initialize lamp: {}", e))?,
    );

    let poller = Poller::spawn(Arc::clone(&lamp), settings.polling);

    let app = handlers::router(AppState { lamp });

    let listener = tokio::net::TcpListener::bind(&settings.server.address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind address: {}", e))?;

    info!("Server started on {}", settings.server.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    poller.shutdown().await;
    info!("Shut down");

    Ok(())
}
