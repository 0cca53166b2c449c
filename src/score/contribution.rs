/// Score network contribution from credits earned and capacity committed.
/// Each term caps at 50 points (100 credits or 100 GB saturates it), so
/// the sum never exceeds 100.
pub fn compute(credits: u64, committed_gb: f64) -> f64 {
    let credit_term = (credits as f64 / 100.0 * 50.0).min(50.0);
    let storage_term = (committed_gb / 100.0 * 50.0).min(50.0);
    credit_term + storage_term
}
