pub mod aggregator;
pub mod config;
pub mod error;
pub mod filters;
pub mod lookup;
pub mod probe;
pub mod rpc;
pub mod score;
pub mod service;
pub mod source;
pub mod types;

pub use aggregator::Aggregator;
pub use config::FleetConfig;
pub use error::FleetError;
pub use filters::{FilterSpec, SortKey, SortOrder};
pub use score::{HealthScoreBreakdown, HealthScoreWeights};
pub use service::FleetService;
pub use types::{FleetSnapshot, NodeRecord, NodeStatus};

use tracing_subscriber::EnvFilter;

/// Initialize structured logging with tracing.
/// Respects RUST_LOG env var; defaults to `info` level for the fleetwatch crate.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fleetwatch=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
