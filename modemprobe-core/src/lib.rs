pub mod bridge;
pub mod commands;
pub mod filter;
pub mod probe;
pub mod trace;

// Re-export the main types so users can just use `modemprobe_core::ProbeSession`
pub use bridge::{BridgeError, ModemBridge};
pub use probe::{ProbeConfig, ProbeSession};

use serde::{Deserialize, Serialize};

/// One command/response pair from a probe run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeRecord {
    pub index: usize,
    pub command: String,
    /// Raw response bytes, decoded lossily. The trace log holds the exact bytes.
    pub response: String,
    /// True if the bridge stream closed while this response was being read.
    pub closed: bool,
    pub timestamp: i64,
}
