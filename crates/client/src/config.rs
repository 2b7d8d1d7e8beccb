//! Configuration for the DA storage server client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings of the [DaClient][crate::DaClient]. Deserializable from the node
/// configuration file; unset fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaClientConfig {
    /// Whether alt-da storage is in use. A disabled client answers every
    /// request with [DaStorageError::NotEnabled][altda_lifecycle::DaStorageError::NotEnabled]
    /// without touching the network.
    pub enabled: bool,
    /// Base URL of the DA storage server, without a trailing slash.
    pub url: String,
    /// Re-verify fetched pre-images against the commitment. Only meaningful
    /// for keccak256 commitments; generic ones are validated by the server.
    pub verify_on_read: bool,
    /// Compute keccak256 commitments locally instead of asking the server to
    /// assign one.
    pub precompute: bool,
    /// Expect server-assigned generic commitments on the put path.
    pub generic_da: bool,
    /// Per-request timeout for reads. Zero disables the timeout.
    pub get_timeout: Duration,
    /// Per-request timeout for writes. Zero disables the timeout.
    pub put_timeout: Duration,
}

impl Default for DaClientConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            verify_on_read: true,
            precompute: true,
            generic_da: false,
            get_timeout: Duration::ZERO,
            put_timeout: Duration::ZERO,
        }
    }
}
