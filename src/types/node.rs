use serde::{Deserialize, Serialize};

pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Online,
    Unstable,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    /// Round-trip latency in milliseconds; 0 means not yet measured.
    pub latency_ms: f64,
    /// Uptime as a percentage of the trailing observation window, 0-100.
    pub uptime_pct: f64,
    /// Unix epoch milliseconds of the last gossip sighting.
    pub last_seen_ms: i64,
    pub gossip_participation_pct: f64,
}

/// Self-reported health sub-scores, each 0-100. Distinct from the
/// engine's computed composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub availability: f64,
    pub stability: f64,
    pub responsiveness: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub committed_bytes: u64,
    /// May transiently exceed `committed_bytes`; derived math must tolerate it.
    pub used_bytes: u64,
}

impl StorageInfo {
    pub fn committed_gb(&self) -> f64 {
        self.committed_bytes as f64 / BYTES_PER_GB
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoData {
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    pub city: String,
}

/// One canonical fleet entity, valid for the lifetime of a single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Pubkey when the node reported one, otherwise its network address.
    /// Unique within a snapshot.
    pub identity: String,
    pub address: String,
    /// Seed endpoint that contributed this record. Provenance only, never
    /// part of the dedup key.
    pub source_address: String,
    pub status: NodeStatus,
    pub version: String,
    pub is_seed: bool,
    pub metrics: NodeMetrics,
    pub health: HealthReport,
    pub storage: StorageInfo,
    pub credits: u64,
    pub geo: Option<GeoData>,
}

/// Deduplicated merge of all sources as of one poll cycle. Node order is
/// first-seen order during the merge and is never re-sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    pub nodes: Vec<NodeRecord>,
    pub total_count: usize,
    pub duplicates_dropped: usize,
    pub sources_queried: usize,
    pub source_failures: usize,
    pub fetched_at_ms: i64,
}

impl FleetSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
