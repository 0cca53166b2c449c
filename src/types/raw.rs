//! Loose wire schema for per-seed pod telemetry. Every field is optional;
//! conversion applies explicit defaulting rules instead of trusting the
//! shape a seed happens to send.

use serde::{Deserialize, Serialize};

use super::node::{GeoData, HealthReport, NodeMetrics, NodeRecord, NodeStatus, StorageInfo};

const ONLINE_WINDOW_MS: i64 = 60_000;
const UNSTABLE_WINDOW_MS: i64 = 300_000;

/// Uptime seconds are reported as continuous uptime; percentage is taken
/// against a trailing 7-day window.
const UPTIME_WINDOW_SECS: f64 = 7.0 * 24.0 * 60.0 * 60.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGeo {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub country: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHealth {
    pub availability: Option<f64>,
    pub stability: Option<f64>,
    pub responsiveness: Option<f64>,
    pub total: Option<f64>,
}

/// One pod entry as a seed reports it over JSON-RPC.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNode {
    pub pubkey: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub version: Option<String>,
    pub is_public: Option<bool>,
    pub rpc_port: Option<u16>,
    /// Unix epoch milliseconds.
    pub last_seen_timestamp: Option<i64>,
    /// Continuous uptime in seconds.
    pub uptime: Option<i64>,
    pub latency_ms: Option<f64>,
    pub gossip_participation: Option<f64>,
    pub health: Option<RawHealth>,
    pub storage_committed: Option<i64>,
    pub storage_used: Option<i64>,
    pub storage_usage_percent: Option<f64>,
    pub credits: Option<i64>,
    pub geo: Option<RawGeo>,
}

impl RawNode {
    /// Validate and default this record into a canonical [`NodeRecord`].
    /// Returns `None` when the record carries neither a pubkey nor an
    /// address, since it then has no usable identity.
    pub fn into_record(self, source_address: &str, seeds: &[String], now_ms: i64) -> Option<NodeRecord> {
        let pubkey = self.pubkey.filter(|p| !p.is_empty());
        let address = self.address.filter(|a| !a.is_empty());
        let identity = pubkey.clone().or_else(|| address.clone())?;
        let address = address.unwrap_or_else(|| source_address.to_string());

        let last_seen_ms = self.last_seen_timestamp.unwrap_or(now_ms);
        let status = self
            .status
            .as_deref()
            .and_then(parse_status)
            .unwrap_or_else(|| derive_status(last_seen_ms, now_ms));

        let uptime_pct = match self.uptime {
            Some(secs) => (secs.max(0) as f64 / UPTIME_WINDOW_SECS * 100.0).min(100.0),
            None => 0.0,
        };
        let gossip = self.gossip_participation.unwrap_or(0.0).clamp(0.0, 100.0);

        let health = resolve_health(self.health, uptime_pct, gossip, status);

        let host = address.split(':').next().unwrap_or(&address);
        let is_seed = seeds.iter().any(|s| s == host || s == &address);

        let geo = self.geo.and_then(|g| match (g.lat, g.lon) {
            (Some(lat), Some(lon)) => Some(GeoData {
                lat,
                lon,
                country: g.country.unwrap_or_default(),
                city: g.city.unwrap_or_default(),
            }),
            _ => None,
        });

        Some(NodeRecord {
            identity,
            address,
            source_address: source_address.to_string(),
            status,
            version: self.version.unwrap_or_else(|| "unknown".to_string()),
            is_seed,
            metrics: NodeMetrics {
                latency_ms: self.latency_ms.unwrap_or(0.0).max(0.0),
                uptime_pct,
                last_seen_ms,
                gossip_participation_pct: gossip,
            },
            health,
            storage: StorageInfo {
                committed_bytes: self.storage_committed.unwrap_or(0).max(0) as u64,
                used_bytes: self.storage_used.unwrap_or(0).max(0) as u64,
            },
            credits: self.credits.unwrap_or(0).max(0) as u64,
            geo,
        })
    }
}

fn parse_status(s: &str) -> Option<NodeStatus> {
    match s {
        "online" => Some(NodeStatus::Online),
        "unstable" => Some(NodeStatus::Unstable),
        "offline" => Some(NodeStatus::Offline),
        _ => None,
    }
}

/// Seeds that omit status get one derived from last-seen age.
fn derive_status(last_seen_ms: i64, now_ms: i64) -> NodeStatus {
    let age = now_ms.saturating_sub(last_seen_ms);
    if age < ONLINE_WINDOW_MS {
        NodeStatus::Online
    } else if age < UNSTABLE_WINDOW_MS {
        NodeStatus::Unstable
    } else {
        NodeStatus::Offline
    }
}

/// A missing health block is derived from what the seed did report. The
/// derivation is deterministic: stability and responsiveness fall back to
/// fixed per-status values.
fn resolve_health(
    raw: Option<RawHealth>,
    uptime_pct: f64,
    gossip_pct: f64,
    status: NodeStatus,
) -> HealthReport {
    let raw = raw.unwrap_or_default();
    let availability = raw.availability.unwrap_or(uptime_pct).clamp(0.0, 100.0);
    let stability = raw
        .stability
        .unwrap_or(match status {
            NodeStatus::Online => 95.0,
            NodeStatus::Unstable => 65.0,
            NodeStatus::Offline => 15.0,
        })
        .clamp(0.0, 100.0);
    let responsiveness = raw
        .responsiveness
        .unwrap_or(if gossip_pct > 0.0 {
            gossip_pct
        } else {
            match status {
                NodeStatus::Online => 90.0,
                NodeStatus::Unstable => 60.0,
                NodeStatus::Offline => 0.0,
            }
        })
        .clamp(0.0, 100.0);
    let total = raw
        .total
        .unwrap_or_else(|| {
            (availability * 0.40 + stability * 0.35 + responsiveness * 0.25).round()
        })
        .clamp(0.0, 100.0);
    HealthReport {
        availability,
        stability,
        responsiveness,
        total,
    }
}
