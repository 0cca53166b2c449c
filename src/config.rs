use serde::{Deserialize, Serialize};

/// Seed IPs of the pRPC network, used when FLEETWATCH_SEEDS is not set.
const DEFAULT_SEEDS: &[&str] = &[
    "173.212.203.145",
    "173.212.220.65",
    "161.97.97.41",
    "192.190.136.36",
    "192.190.136.37",
    "192.190.136.38",
    "192.190.136.28",
    "192.190.136.29",
    "207.244.255.1",
];

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_RPC_PORT: u16 = 6000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetConfig {
    /// Seed endpoints, host or host:port. Queried in this order.
    pub seeds: Vec<String>,
    /// Per-source bound; a seed exceeding it counts as failed, not fatal.
    pub timeout_per_source_ms: u64,
    /// RPC port appended to seeds given without one.
    pub rpc_port: u16,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            seeds: DEFAULT_SEEDS.iter().map(|s| s.to_string()).collect(),
            timeout_per_source_ms: DEFAULT_TIMEOUT_MS,
            rpc_port: DEFAULT_RPC_PORT,
        }
    }
}

impl FleetConfig {
    /// Build from the environment, falling back to defaults per field.
    /// Reads FLEETWATCH_SEEDS (comma-separated), FLEETWATCH_TIMEOUT_MS and
    /// FLEETWATCH_RPC_PORT. A `.env` in the working directory is honored.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        if let Ok(seeds) = std::env::var("FLEETWATCH_SEEDS") {
            let parsed: Vec<String> = seeds
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                config.seeds = parsed;
            }
        }
        if let Ok(ms) = std::env::var("FLEETWATCH_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                config.timeout_per_source_ms = ms;
            }
        }
        if let Ok(port) = std::env::var("FLEETWATCH_RPC_PORT") {
            if let Ok(port) = port.parse() {
                config.rpc_port = port;
            }
        }
        config
    }

    /// Full RPC URL for one seed endpoint.
    pub fn rpc_url(&self, seed: &str) -> String {
        if seed.contains(':') {
            format!("http://{}/rpc", seed)
        } else {
            format!("http://{}:{}/rpc", seed, self.rpc_port)
        }
    }
}
