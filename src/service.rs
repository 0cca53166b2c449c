use crate::aggregator::Aggregator;
use crate::config::FleetConfig;
use crate::error::FleetError;
use crate::filters::{apply_filters, FilterSpec};
use crate::lookup;
use crate::score::{calculate_health_score, HealthScoreBreakdown, HealthScoreWeights};
use crate::types::{FleetSnapshot, NodeRecord};

/// Entry points for the presentation layer. Holds configuration and the
/// shared HTTP client; no fleet state survives between calls, so polling
/// cadence is the caller's concern.
pub struct FleetService {
    aggregator: Aggregator,
    weights: HealthScoreWeights,
}

impl FleetService {
    pub fn new(config: FleetConfig) -> Self {
        Self {
            aggregator: Aggregator::new(config),
            weights: HealthScoreWeights::default(),
        }
    }

    pub fn with_weights(config: FleetConfig, weights: HealthScoreWeights) -> Self {
        Self {
            aggregator: Aggregator::new(config),
            weights,
        }
    }

    /// Poll every seed and return the merged, deduplicated fleet view.
    pub async fn get_all_nodes(&self) -> Result<FleetSnapshot, FleetError> {
        self.aggregator.fetch_fleet().await
    }

    /// Resolve one node by identity, scanning `snapshot` first when given
    /// and re-polling the sources on a miss.
    pub async fn find_node(
        &self,
        snapshot: Option<&FleetSnapshot>,
        identity: &str,
    ) -> Result<NodeRecord, FleetError> {
        lookup::find_node(&self.aggregator, snapshot, identity).await
    }

    /// Composite score breakdown for one node, under this service's weights.
    pub fn score_of(&self, node: &NodeRecord) -> HealthScoreBreakdown {
        calculate_health_score(node, &self.weights)
    }

    /// Filtered and ordered view of a snapshot for display.
    pub fn filter_and_sort(&self, snapshot: &FleetSnapshot, spec: &FilterSpec) -> Vec<NodeRecord> {
        apply_filters(snapshot, spec)
    }

    pub fn config(&self) -> &FleetConfig {
        self.aggregator.config()
    }
}
