// metrics/mod.rs
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Serves Prometheus metrics on `0.0.0.0:{port}`. Must run inside a tokio runtime.
pub fn setup_metrics(port: u16) -> Result<(), BuildError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    metrics::describe_counter!("diyled_polls_total", "Device polls by outcome");
    metrics::describe_counter!("diyled_commands_total", "Commands sent by channel and outcome");
    Ok(())
}
