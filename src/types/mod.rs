pub mod node;
pub mod raw;

pub use node::{
    FleetSnapshot, GeoData, HealthReport, NodeMetrics, NodeRecord, NodeStatus, StorageInfo,
};
pub use raw::RawNode;
