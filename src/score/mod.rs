pub mod contribution;
pub mod latency;
pub mod storage;

use serde::{Deserialize, Serialize};

use crate::types::{NodeRecord, NodeStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreWeights {
    pub uptime: f64,
    pub health: f64,
    pub storage: f64,
    pub latency: f64,
    pub contribution: f64,
}

/// Default weighting. Callers supplying their own weights are responsible
/// for keeping the sum at 1.0; the engine does not enforce it.
impl Default for HealthScoreWeights {
    fn default() -> Self {
        Self {
            uptime: 0.30,
            health: 0.25,
            storage: 0.20,
            latency: 0.15,
            contribution: 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// One scored dimension: the rounded 0-100 score, the weight it carried,
/// and the raw input it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScore {
    pub score: u32,
    pub weight: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    pub uptime: ComponentScore,
    pub health: ComponentScore,
    pub storage: ComponentScore,
    pub latency: ComponentScore,
    pub contribution: ComponentScore,
}

/// The engine's composite rating for one node. Derived on demand from the
/// current record, never cached across snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreBreakdown {
    pub overall: u32,
    pub grade: String,
    pub trend: Trend,
    pub components: ScoreComponents,
}

/// Composite health score for one node. Pure and deterministic: no I/O,
/// no shared state, same record always yields the same breakdown.
pub fn calculate_health_score(
    node: &NodeRecord,
    weights: &HealthScoreWeights,
) -> HealthScoreBreakdown {
    let uptime_value = node.metrics.uptime_pct;
    let uptime_score = uptime_value.clamp(0.0, 100.0);

    let health_value = node.health.total;
    let health_score = health_value.clamp(0.0, 100.0);

    let utilization = storage::utilization(node.storage.used_bytes, node.storage.committed_bytes);
    let storage_score = storage::compute(utilization);

    let latency_value = node.metrics.latency_ms;
    let latency_score = latency::compute(latency_value);

    let contribution_score = contribution::compute(node.credits, node.storage.committed_gb());

    let overall = (uptime_score * weights.uptime
        + health_score * weights.health
        + storage_score * weights.storage
        + latency_score * weights.latency
        + contribution_score * weights.contribution)
        .round()
        .clamp(0.0, 100.0) as u32;

    HealthScoreBreakdown {
        overall,
        grade: grade(overall).to_string(),
        trend: trend(node),
        components: ScoreComponents {
            uptime: ComponentScore {
                score: uptime_score.round() as u32,
                weight: weights.uptime,
                value: uptime_value,
            },
            health: ComponentScore {
                score: health_score.round() as u32,
                weight: weights.health,
                value: health_value,
            },
            storage: ComponentScore {
                score: storage_score.round() as u32,
                weight: weights.storage,
                value: utilization,
            },
            latency: ComponentScore {
                score: latency_score.round() as u32,
                weight: weights.latency,
                value: latency_value,
            },
            contribution: ComponentScore {
                score: contribution_score.round() as u32,
                weight: weights.contribution,
                value: node.credits as f64,
            },
        },
    }
}

/// Letter grade with inclusive lower bounds.
pub fn grade(overall: u32) -> &'static str {
    match overall {
        95.. => "A+",
        90..=94 => "A",
        85..=89 => "A-",
        80..=84 => "B+",
        75..=79 => "B",
        70..=74 => "B-",
        65..=69 => "C+",
        60..=64 => "C",
        55..=59 => "C-",
        50..=54 => "D",
        _ => "F",
    }
}

/// Simplified trend from current state only; no historical series is
/// consulted.
fn trend(node: &NodeRecord) -> Trend {
    if node.status == NodeStatus::Online && node.health.total > 80.0 {
        return Trend::Up;
    }
    if node.status == NodeStatus::Offline || node.health.total < 50.0 {
        return Trend::Down;
    }
    Trend::Stable
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDistribution {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkHealthStats {
    pub average: u32,
    pub median: u32,
    pub p95: u32,
    pub distribution: ScoreDistribution,
}

/// Network-wide aggregate over all nodes' overall scores. Median and p95
/// use the sorted-index method; an empty fleet yields all zeros.
pub fn network_health_stats(nodes: &[NodeRecord]) -> NetworkHealthStats {
    if nodes.is_empty() {
        return NetworkHealthStats {
            average: 0,
            median: 0,
            p95: 0,
            distribution: ScoreDistribution {
                excellent: 0,
                good: 0,
                fair: 0,
                poor: 0,
            },
        };
    }

    let weights = HealthScoreWeights::default();
    let mut scores: Vec<u32> = nodes
        .iter()
        .map(|n| calculate_health_score(n, &weights).overall)
        .collect();
    scores.sort_unstable();

    let n = scores.len();
    let sum: u64 = scores.iter().map(|&s| s as u64).sum();
    let average = ((sum as f64) / (n as f64)).round() as u32;
    let median = scores[n / 2];
    let p95 = scores[((n as f64 * 0.95).floor() as usize).min(n - 1)];

    let distribution = ScoreDistribution {
        excellent: scores.iter().filter(|&&s| s >= 90).count(),
        good: scores.iter().filter(|&&s| (70..90).contains(&s)).count(),
        fair: scores.iter().filter(|&&s| (50..70).contains(&s)).count(),
        poor: scores.iter().filter(|&&s| s < 50).count(),
    };

    NetworkHealthStats {
        average,
        median,
        p95,
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HealthReport, NodeMetrics, StorageInfo};

    fn node(uptime: f64, health_total: f64, latency: f64, credits: u64) -> NodeRecord {
        NodeRecord {
            identity: "pk1".to_string(),
            address: "10.0.0.9:9001".to_string(),
            source_address: "10.0.0.1".to_string(),
            status: NodeStatus::Online,
            version: "0.9.2".to_string(),
            is_seed: false,
            metrics: NodeMetrics {
                latency_ms: latency,
                uptime_pct: uptime,
                last_seen_ms: 1_706_800_000_000,
                gossip_participation_pct: 95.0,
            },
            health: HealthReport {
                availability: health_total,
                stability: health_total,
                responsiveness: health_total,
                total: health_total,
            },
            storage: StorageInfo {
                committed_bytes: 100 * 1024 * 1024 * 1024,
                used_bytes: 70 * 1024 * 1024 * 1024,
            },
            credits,
            geo: None,
        }
    }

    #[test]
    fn worked_example_scores_a_plus() {
        // uptime 99.95, health 100, 70/100 GB, 40ms, 50 credits:
        // contribution = 25 credits + 50 storage = 75, so
        // 29.985 + 25 + 20 + 15 + 7.5 = 97.485 -> 97
        let n = node(99.95, 100.0, 40.0, 50);
        let breakdown = calculate_health_score(&n, &HealthScoreWeights::default());
        assert_eq!(breakdown.overall, 97);
        assert_eq!(breakdown.grade, "A+");
        assert_eq!(breakdown.trend, Trend::Up);
        assert_eq!(breakdown.components.contribution.score, 75);
        assert_eq!(breakdown.components.storage.value, 70.0);
        assert_eq!(breakdown.components.storage.score, 100);
        assert_eq!(breakdown.components.latency.score, 100);
    }

    #[test]
    fn score_is_deterministic() {
        let n = node(87.3, 74.0, 123.0, 12);
        let w = HealthScoreWeights::default();
        let a = calculate_health_score(&n, &w);
        let b = calculate_health_score(&n, &w);
        assert_eq!(a, b);
        assert!(a.overall <= 100);
    }

    #[test]
    fn overall_stays_in_range_at_extremes() {
        let zero = node(0.0, 0.0, 10_000.0, 0);
        let max = node(100.0, 100.0, 0.0, 1_000_000);
        let w = HealthScoreWeights::default();
        let lo = calculate_health_score(&zero, &w).overall;
        let hi = calculate_health_score(&max, &w).overall;
        assert!(lo <= 100);
        assert_eq!(hi, 100);
    }

    #[test]
    fn grade_boundaries_are_exact() {
        assert_eq!(grade(95), "A+");
        assert_eq!(grade(90), "A");
        assert_eq!(grade(89), "A-");
        assert_eq!(grade(85), "A-");
        assert_eq!(grade(84), "B+");
        assert_eq!(grade(50), "D");
        assert_eq!(grade(49), "F");
        assert_eq!(grade(0), "F");
    }

    #[test]
    fn trend_follows_status_and_health() {
        let mut up = node(99.0, 95.0, 20.0, 10);
        assert_eq!(calculate_health_score(&up, &HealthScoreWeights::default()).trend, Trend::Up);

        up.status = NodeStatus::Offline;
        assert_eq!(
            calculate_health_score(&up, &HealthScoreWeights::default()).trend,
            Trend::Down
        );

        let sick = node(99.0, 40.0, 20.0, 10);
        assert_eq!(
            calculate_health_score(&sick, &HealthScoreWeights::default()).trend,
            Trend::Down
        );

        let mid = node(99.0, 65.0, 20.0, 10);
        assert_eq!(
            calculate_health_score(&mid, &HealthScoreWeights::default()).trend,
            Trend::Stable
        );
    }

    #[test]
    fn custom_weights_shift_the_composite() {
        let n = node(100.0, 0.0, 0.0, 0);
        let uptime_only = HealthScoreWeights {
            uptime: 1.0,
            health: 0.0,
            storage: 0.0,
            latency: 0.0,
            contribution: 0.0,
        };
        assert_eq!(calculate_health_score(&n, &uptime_only).overall, 100);
    }

    #[test]
    fn network_stats_empty_is_all_zero() {
        let stats = network_health_stats(&[]);
        assert_eq!(stats.average, 0);
        assert_eq!(stats.median, 0);
        assert_eq!(stats.p95, 0);
        assert_eq!(stats.distribution.poor, 0);
    }

    #[test]
    fn network_stats_buckets_scores() {
        let nodes = vec![
            node(99.95, 100.0, 40.0, 50), // 97, excellent
            node(99.95, 100.0, 40.0, 50), // 97, excellent
            node(0.0, 0.0, 10_000.0, 0),  // low
        ];
        let stats = network_health_stats(&nodes);
        assert_eq!(stats.distribution.excellent, 2);
        assert_eq!(
            stats.distribution.excellent
                + stats.distribution.good
                + stats.distribution.fair
                + stats.distribution.poor,
            3
        );
        assert_eq!(stats.median, 97);
        assert_eq!(stats.p95, 97);
    }
}
