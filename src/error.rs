use thiserror::Error;

/// Failure taxonomy for the aggregation engine.
///
/// Per-source failures (`SourceUnavailable`, `MalformedSourceResponse`) are
/// absorbed at the aggregator boundary and never reach the caller; only
/// `AllSourcesUnavailable` and `NodeNotFound` propagate.
#[derive(Debug, Error)]
pub enum FleetError {
    /// One seed timed out or errored at the network level.
    #[error("source {endpoint} unavailable: {reason}")]
    SourceUnavailable { endpoint: String, reason: String },

    /// One seed answered with data the wire contract cannot parse.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedSourceResponse { endpoint: String, reason: String },

    /// Every configured seed failed in the same poll cycle.
    #[error("all {attempted} sources unavailable")]
    AllSourcesUnavailable { attempted: usize },

    /// Lookup miss across the snapshot and all sources.
    #[error("node {identity} not found")]
    NodeNotFound { identity: String },
}

impl FleetError {
    /// True for the per-source variants the aggregator recovers from.
    pub fn is_source_local(&self) -> bool {
        matches!(
            self,
            FleetError::SourceUnavailable { .. } | FleetError::MalformedSourceResponse { .. }
        )
    }
}
