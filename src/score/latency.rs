/// Score latency performance on a piecewise curve: full marks up to 50ms,
/// then 100→90 to 100ms, 90→70 to 200ms, then one point lost per 10ms
/// until the floor at 0. An unmeasured latency (0) scores full.
pub fn compute(latency_ms: f64) -> f64 {
    if latency_ms <= 50.0 {
        100.0
    } else if latency_ms <= 100.0 {
        90.0 + ((100.0 - latency_ms) / 50.0) * 10.0
    } else if latency_ms <= 200.0 {
        70.0 + ((200.0 - latency_ms) / 100.0) * 20.0
    } else {
        (70.0 - ((latency_ms - 200.0) / 100.0) * 10.0).max(0.0)
    }
}
