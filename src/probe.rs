use std::time::{Duration, Instant};

use tokio::net::TcpStream;

/// Measure TCP connect latency to a node address (host:port). Seeds do not
/// report latency themselves, so callers can use this to fill
/// `metrics.latency_ms` before scoring. Returns `None` when the node is
/// unreachable within `timeout`.
pub async fn measure_latency(addr: &str, timeout: Duration) -> Option<u64> {
    let start = Instant::now();
    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_)) => Some(start.elapsed().as_millis() as u64),
        _ => None,
    }
}
