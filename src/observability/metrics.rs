//! Metrics collection and exposition.
//!
//! # Metrics
//! - `emporium_requests_total` (counter): requests by method, route, status
//! - `emporium_request_duration_seconds` (histogram): latency by method, route
//! - `emporium_catalog_items` (gauge): number of stored items
//!
//! # Design Decisions
//! - Labels use the matched route template, never the raw path, to keep
//!   cardinality bounded
//! - Recording without an installed exporter is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "emporium_requests_total",
        "method" => method.to_string(),
        "path" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "emporium_request_duration_seconds",
        "method" => method.to_string(),
        "path" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the current catalog size.
pub fn record_catalog_size(items: usize) {
    metrics::gauge!("emporium_catalog_items").set(items as f64);
}

/// Middleware recording count and latency of every request.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = request.method().to_string();

    let response = next.run(request).await;

    record_request(&method, &route, response.status().as_u16(), start);
    response
}
