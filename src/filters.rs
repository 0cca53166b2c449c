use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::score::{calculate_health_score, HealthScoreWeights};
use crate::types::{FleetSnapshot, NodeRecord, NodeStatus, node::BYTES_PER_GB};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    HealthScore,
    Uptime,
    Latency,
    Storage,
    Credits,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Declarative filter and sort criteria over one snapshot. Every field
/// defaults to permissive, so `FilterSpec::default()` passes everything
/// through in snapshot order aside from the default sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    /// Case-insensitive substring over identity, address and geo
    /// country/city; any match keeps the node.
    pub search: String,
    /// Allow-list; empty means no restriction.
    pub status: Vec<NodeStatus>,
    /// Allow-list over geo country; empty means no restriction.
    pub regions: Vec<String>,
    pub health_score_min: u32,
    pub health_score_max: u32,
    pub uptime_min: f64,
    /// 1000 and above disables the latency cut.
    pub latency_max: f64,
    /// Minimum committed capacity in GB.
    pub storage_min_gb: f64,
    /// Exact-match allow-list; empty means no restriction.
    pub versions: Vec<String>,
    pub sort_by: Option<SortKey>,
    pub sort_order: SortOrder,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: Vec::new(),
            regions: Vec::new(),
            health_score_min: 0,
            health_score_max: 100,
            uptime_min: 0.0,
            latency_max: 1000.0,
            storage_min_gb: 0.0,
            versions: Vec::new(),
            sort_by: None,
            sort_order: SortOrder::Desc,
        }
    }
}

/// A named, fixed FilterSpec fragment. Pure data: applying one just swaps
/// in its spec, which the caller may then edit field by field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub spec: FilterSpec,
}

pub fn filter_presets() -> Vec<FilterPreset> {
    vec![
        FilterPreset {
            id: "top-performers",
            name: "Top Performers",
            description: "Nodes with excellent health scores and uptime",
            spec: FilterSpec {
                health_score_min: 90,
                uptime_min: 99.0,
                status: vec![NodeStatus::Online],
                sort_by: Some(SortKey::HealthScore),
                sort_order: SortOrder::Desc,
                ..Default::default()
            },
        },
        FilterPreset {
            id: "reliable",
            name: "Reliable Nodes",
            description: "High uptime and low latency",
            spec: FilterSpec {
                uptime_min: 95.0,
                latency_max: 100.0,
                status: vec![NodeStatus::Online],
                sort_by: Some(SortKey::Uptime),
                sort_order: SortOrder::Desc,
                ..Default::default()
            },
        },
        FilterPreset {
            id: "high-capacity",
            name: "High Capacity",
            description: "Nodes with significant storage",
            spec: FilterSpec {
                storage_min_gb: 500.0,
                status: vec![NodeStatus::Online],
                sort_by: Some(SortKey::Storage),
                sort_order: SortOrder::Desc,
                ..Default::default()
            },
        },
        FilterPreset {
            id: "needs-attention",
            name: "Needs Attention",
            description: "Nodes with issues requiring review",
            spec: FilterSpec {
                health_score_max: 70,
                sort_by: Some(SortKey::HealthScore),
                sort_order: SortOrder::Asc,
                ..Default::default()
            },
        },
        FilterPreset {
            id: "unstable",
            name: "Unstable Nodes",
            description: "Nodes with connectivity issues",
            spec: FilterSpec {
                status: vec![NodeStatus::Unstable],
                sort_by: Some(SortKey::HealthScore),
                sort_order: SortOrder::Asc,
                ..Default::default()
            },
        },
    ]
}

/// Distinct values present in a snapshot, for populating filter choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub versions: Vec<String>,
    pub statuses: Vec<NodeStatus>,
}

pub fn filter_options(nodes: &[NodeRecord]) -> FilterOptions {
    let mut regions: Vec<String> = nodes
        .iter()
        .filter_map(|n| n.geo.as_ref())
        .filter(|g| !g.country.is_empty())
        .map(|g| g.country.clone())
        .collect();
    regions.sort();
    regions.dedup();

    let mut versions: Vec<String> = nodes.iter().map(|n| n.version.clone()).collect();
    versions.sort();
    versions.dedup();

    let mut statuses = Vec::new();
    for status in [NodeStatus::Online, NodeStatus::Unstable, NodeStatus::Offline] {
        if nodes.iter().any(|n| n.status == status) {
            statuses.push(status);
        }
    }

    FilterOptions {
        regions,
        versions,
        statuses,
    }
}

/// Apply a FilterSpec to a snapshot. The health-score criterion is the
/// dominant cost, so the composite score is computed exactly once per node
/// and reused for both the range filter and score-keyed sorting. The sort
/// is stable: ties keep snapshot order.
pub fn apply_filters(snapshot: &FleetSnapshot, spec: &FilterSpec) -> Vec<NodeRecord> {
    let weights = HealthScoreWeights::default();
    let search = spec.search.to_lowercase();

    let mut scored: Vec<(NodeRecord, u32)> = snapshot
        .nodes
        .iter()
        .map(|n| (n.clone(), calculate_health_score(n, &weights).overall))
        .filter(|(node, overall)| {
            if !search.is_empty() && !matches_search(node, &search) {
                return false;
            }
            if !spec.status.is_empty() && !spec.status.contains(&node.status) {
                return false;
            }
            if !spec.regions.is_empty() {
                let in_region = node
                    .geo
                    .as_ref()
                    .is_some_and(|g| spec.regions.contains(&g.country));
                if !in_region {
                    return false;
                }
            }
            if *overall < spec.health_score_min || *overall > spec.health_score_max {
                return false;
            }
            if spec.uptime_min > 0.0 && node.metrics.uptime_pct < spec.uptime_min {
                return false;
            }
            if spec.latency_max < 1000.0 && node.metrics.latency_ms > spec.latency_max {
                return false;
            }
            if spec.storage_min_gb > 0.0
                && (node.storage.committed_bytes as f64 / BYTES_PER_GB) < spec.storage_min_gb
            {
                return false;
            }
            if !spec.versions.is_empty() && !spec.versions.contains(&node.version) {
                return false;
            }
            true
        })
        .collect();

    if let Some(key) = spec.sort_by {
        scored.sort_by(|(a, a_score), (b, b_score)| {
            let ordering = match key {
                SortKey::HealthScore => a_score.cmp(b_score),
                SortKey::Uptime => cmp_f64(a.metrics.uptime_pct, b.metrics.uptime_pct),
                SortKey::Latency => cmp_f64(a.metrics.latency_ms, b.metrics.latency_ms),
                SortKey::Storage => a.storage.committed_bytes.cmp(&b.storage.committed_bytes),
                SortKey::Credits => a.credits.cmp(&b.credits),
                SortKey::Name => a.address.cmp(&b.address),
            };
            match spec.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    scored.into_iter().map(|(node, _)| node).collect()
}

fn matches_search(node: &NodeRecord, query_lower: &str) -> bool {
    if node.identity.to_lowercase().contains(query_lower)
        || node.address.to_lowercase().contains(query_lower)
    {
        return true;
    }
    node.geo.as_ref().is_some_and(|g| {
        g.country.to_lowercase().contains(query_lower)
            || g.city.to_lowercase().contains(query_lower)
    })
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeoData, HealthReport, NodeMetrics, StorageInfo};

    fn node(identity: &str, status: NodeStatus, uptime: f64, latency: f64) -> NodeRecord {
        NodeRecord {
            identity: identity.to_string(),
            address: format!("{}.example:9001", identity),
            source_address: "10.0.0.1".to_string(),
            status,
            version: "0.9.2".to_string(),
            is_seed: false,
            metrics: NodeMetrics {
                latency_ms: latency,
                uptime_pct: uptime,
                last_seen_ms: 1_706_800_000_000,
                gossip_participation_pct: 90.0,
            },
            health: HealthReport {
                availability: uptime,
                stability: 90.0,
                responsiveness: 90.0,
                total: 90.0,
            },
            storage: StorageInfo {
                committed_bytes: 100 * 1024 * 1024 * 1024,
                used_bytes: 70 * 1024 * 1024 * 1024,
            },
            credits: 50,
            geo: None,
        }
    }

    fn snapshot(nodes: Vec<NodeRecord>) -> FleetSnapshot {
        FleetSnapshot {
            total_count: nodes.len(),
            nodes,
            duplicates_dropped: 0,
            sources_queried: 1,
            source_failures: 0,
            fetched_at_ms: 0,
        }
    }

    #[test]
    fn empty_spec_returns_all_in_snapshot_order() {
        let snap = snapshot(vec![
            node("c", NodeStatus::Online, 99.0, 40.0),
            node("a", NodeStatus::Offline, 10.0, 0.0),
            node("b", NodeStatus::Unstable, 50.0, 300.0),
        ]);
        let out = apply_filters(&snap, &FilterSpec::default());
        let ids: Vec<&str> = out.iter().map(|n| n.identity.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn search_matches_any_field_case_insensitive() {
        let mut with_geo = node("pk1", NodeStatus::Online, 99.0, 40.0);
        with_geo.geo = Some(GeoData {
            lat: 48.1,
            lon: 11.5,
            country: "Germany".to_string(),
            city: "Munich".to_string(),
        });
        let snap = snapshot(vec![with_geo, node("pk2", NodeStatus::Online, 99.0, 40.0)]);

        let spec = FilterSpec {
            search: "germ".to_string(),
            ..Default::default()
        };
        let out = apply_filters(&snap, &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].identity, "pk1");

        let spec = FilterSpec {
            search: "PK2.EXAMPLE".to_string(),
            ..Default::default()
        };
        let out = apply_filters(&snap, &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].identity, "pk2");
    }

    #[test]
    fn status_allow_list_restricts() {
        let snap = snapshot(vec![
            node("a", NodeStatus::Online, 99.0, 40.0),
            node("b", NodeStatus::Offline, 10.0, 0.0),
        ]);
        let spec = FilterSpec {
            status: vec![NodeStatus::Online],
            ..Default::default()
        };
        let out = apply_filters(&snap, &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].identity, "a");
    }

    #[test]
    fn numeric_thresholds_cut() {
        let snap = snapshot(vec![
            node("fast", NodeStatus::Online, 99.5, 30.0),
            node("slow", NodeStatus::Online, 80.0, 400.0),
        ]);
        let spec = FilterSpec {
            uptime_min: 95.0,
            latency_max: 100.0,
            ..Default::default()
        };
        let out = apply_filters(&snap, &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].identity, "fast");
    }

    #[test]
    fn default_latency_max_is_a_noop() {
        let snap = snapshot(vec![node("laggy", NodeStatus::Online, 99.0, 5_000.0)]);
        let out = apply_filters(&snap, &FilterSpec::default());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn health_score_range_excludes() {
        let snap = snapshot(vec![
            node("good", NodeStatus::Online, 99.95, 40.0),
            node("bad", NodeStatus::Offline, 5.0, 900.0),
        ]);
        let spec = FilterSpec {
            health_score_min: 80,
            ..Default::default()
        };
        let out = apply_filters(&snap, &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].identity, "good");
    }

    #[test]
    fn version_allow_list_is_exact() {
        let mut old = node("old", NodeStatus::Online, 99.0, 40.0);
        old.version = "0.8.0".to_string();
        let snap = snapshot(vec![old, node("new", NodeStatus::Online, 99.0, 40.0)]);
        let spec = FilterSpec {
            versions: vec!["0.9.2".to_string()],
            ..Default::default()
        };
        let out = apply_filters(&snap, &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].identity, "new");
    }

    #[test]
    fn sort_by_uptime_descending() {
        let snap = snapshot(vec![
            node("mid", NodeStatus::Online, 80.0, 40.0),
            node("top", NodeStatus::Online, 99.0, 40.0),
            node("low", NodeStatus::Online, 20.0, 40.0),
        ]);
        let spec = FilterSpec {
            sort_by: Some(SortKey::Uptime),
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let ids: Vec<String> = apply_filters(&snap, &spec)
            .into_iter()
            .map(|n| n.identity)
            .collect();
        assert_eq!(ids, vec!["top", "mid", "low"]);
    }

    #[test]
    fn sort_ties_keep_snapshot_order() {
        let snap = snapshot(vec![
            node("first", NodeStatus::Online, 99.0, 40.0),
            node("second", NodeStatus::Online, 99.0, 40.0),
            node("third", NodeStatus::Online, 99.0, 40.0),
        ]);
        let spec = FilterSpec {
            sort_by: Some(SortKey::Uptime),
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let ids: Vec<String> = apply_filters(&snap, &spec)
            .into_iter()
            .map(|n| n.identity)
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn sort_by_name_uses_address() {
        let snap = snapshot(vec![
            node("b", NodeStatus::Online, 99.0, 40.0),
            node("a", NodeStatus::Online, 99.0, 40.0),
        ]);
        let spec = FilterSpec {
            sort_by: Some(SortKey::Name),
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let out = apply_filters(&snap, &spec);
        assert_eq!(out[0].identity, "a");
    }

    #[test]
    fn presets_are_overridable_data() {
        let presets = filter_presets();
        let top = presets.iter().find(|p| p.id == "top-performers").unwrap();
        assert_eq!(top.spec.health_score_min, 90);

        // Manual change after applying a preset wins.
        let mut spec = top.spec.clone();
        spec.health_score_min = 50;
        assert_eq!(spec.health_score_min, 50);
        assert_eq!(spec.status, vec![NodeStatus::Online]);
    }

    #[test]
    fn filter_options_lists_distinct_values() {
        let mut a = node("a", NodeStatus::Online, 99.0, 40.0);
        a.geo = Some(GeoData {
            lat: 0.0,
            lon: 0.0,
            country: "Germany".to_string(),
            city: "Munich".to_string(),
        });
        let mut b = node("b", NodeStatus::Offline, 10.0, 0.0);
        b.version = "0.8.0".to_string();
        let options = filter_options(&[a, b.clone(), b]);
        assert_eq!(options.regions, vec!["Germany"]);
        assert_eq!(options.versions, vec!["0.8.0", "0.9.2"]);
        assert_eq!(options.statuses, vec![NodeStatus::Online, NodeStatus::Offline]);
    }
}
