use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::config::FleetConfig;
use crate::error::FleetError;
use crate::source::SourceClient;
use crate::types::{FleetSnapshot, RawNode};

pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Fans out to every configured seed concurrently and merges the partial
/// views into one snapshot. Stateless between invocations: polling cadence
/// and overlapping-poll avoidance belong to the caller.
pub struct Aggregator {
    client: SourceClient,
    config: FleetConfig,
}

impl Aggregator {
    pub fn new(config: FleetConfig) -> Self {
        Self {
            client: SourceClient::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Best effort, all responses: one task per seed, each bounded by the
    /// per-source timeout, and the merge waits for every task to settle.
    /// A failing seed contributes nothing; the call errors only when every
    /// seed failed.
    pub async fn fetch_fleet(&self) -> Result<FleetSnapshot, FleetError> {
        let mut handles = Vec::with_capacity(self.config.seeds.len());
        for seed in &self.config.seeds {
            let client = self.client.clone();
            let seed = seed.clone();
            handles.push((
                seed.clone(),
                tokio::spawn(async move { client.fetch_nodes(&seed).await }),
            ));
        }

        // Joining in seed order keeps source-list order in the merge while
        // the spawned tasks still run concurrently.
        let mut results = Vec::with_capacity(handles.len());
        for (seed, handle) in handles {
            let result = match handle.await {
                Ok(r) => r,
                Err(e) => Err(FleetError::SourceUnavailable {
                    endpoint: seed.clone(),
                    reason: format!("task failed: {}", e),
                }),
            };
            results.push((seed, result));
        }

        let snapshot = merge_sources(results, &self.config.seeds, now_ms())?;
        info!(
            nodes = snapshot.total_count,
            duplicates = snapshot.duplicates_dropped,
            failures = snapshot.source_failures,
            "fleet snapshot merged"
        );
        Ok(snapshot)
    }
}

/// Single-threaded merge over the collected per-seed results. Successful
/// sources are concatenated in source-list order, each source's internal
/// order preserved, then deduplicated in one pass keyed by identity:
/// the first occurrence wins and later duplicates are dropped whole,
/// never field-merged.
pub(crate) fn merge_sources(
    results: Vec<(String, Result<Vec<RawNode>, FleetError>)>,
    seeds: &[String],
    now_ms: i64,
) -> Result<FleetSnapshot, FleetError> {
    let sources_queried = results.len();
    let mut source_failures = 0;
    let mut seen: HashSet<String> = HashSet::new();
    let mut nodes = Vec::new();
    let mut duplicates_dropped = 0;

    for (seed, result) in results {
        match result {
            Ok(raw_nodes) => {
                for raw in raw_nodes {
                    let Some(record) = raw.into_record(&seed, seeds, now_ms) else {
                        continue;
                    };
                    if seen.insert(record.identity.clone()) {
                        nodes.push(record);
                    } else {
                        duplicates_dropped += 1;
                    }
                }
            }
            Err(e) => {
                warn!(seed = seed.as_str(), error = %e, "seed failed, contributing nothing");
                source_failures += 1;
            }
        }
    }

    if sources_queried > 0 && source_failures == sources_queried {
        return Err(FleetError::AllSourcesUnavailable {
            attempted: sources_queried,
        });
    }

    Ok(FleetSnapshot {
        total_count: nodes.len(),
        nodes,
        duplicates_dropped,
        sources_queried,
        source_failures,
        fetched_at_ms: now_ms,
    })
}
