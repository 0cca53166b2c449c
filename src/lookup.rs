use tracing::debug;

use crate::aggregator::Aggregator;
use crate::error::FleetError;
use crate::types::{FleetSnapshot, NodeRecord};

/// Scan a snapshot for one node. A record matches when its identity equals
/// the query or its address contains it, so a bare IP finds the node even
/// when the record is keyed by pubkey.
pub fn find_in_snapshot<'a>(snapshot: &'a FleetSnapshot, identity: &str) -> Option<&'a NodeRecord> {
    snapshot
        .nodes
        .iter()
        .find(|n| n.identity == identity || n.address.contains(identity))
}

/// Resolve one node, preferring the caller's snapshot and falling back to
/// a fresh aggregation on a miss. The wire protocol has no targeted
/// per-node query, so the fallback re-polls the whole fleet.
pub async fn find_node(
    aggregator: &Aggregator,
    snapshot: Option<&FleetSnapshot>,
    identity: &str,
) -> Result<NodeRecord, FleetError> {
    if let Some(snapshot) = snapshot {
        if let Some(node) = find_in_snapshot(snapshot, identity) {
            return Ok(node.clone());
        }
        debug!(identity, "lookup missed snapshot, falling back to sources");
    }

    let fresh = aggregator.fetch_fleet().await?;
    find_in_snapshot(&fresh, identity)
        .cloned()
        .ok_or_else(|| FleetError::NodeNotFound {
            identity: identity.to_string(),
        })
}
