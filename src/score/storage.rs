/// Utilization percentage of committed capacity. Zero committed is treated
/// as one byte so the division never blows up; used above committed is a
/// transient state the math must tolerate.
pub fn utilization(used_bytes: u64, committed_bytes: u64) -> f64 {
    let committed = committed_bytes.max(1) as f64;
    used_bytes as f64 / committed * 100.0
}

/// Score storage reliability from utilization. The optimal band is
/// (40, 90]; an underfilled node ramps 50..100 as utilization reaches 40,
/// an overfilled one ramps down from 100 past 90.
pub fn compute(utilization_pct: f64) -> f64 {
    let score = if utilization_pct < 40.0 {
        50.0 + (utilization_pct / 40.0) * 50.0
    } else if utilization_pct > 90.0 {
        100.0 - ((utilization_pct - 90.0) / 10.0) * 50.0
    } else {
        100.0
    };
    score.clamp(0.0, 100.0)
}
