#![no_std]
extern crate alloc;

pub mod config;
pub use config::AltDaConfig;

pub mod contract;

pub mod errors;
pub use errors::{AltDaError, DaStorageError, EventDecodeError};

pub mod manager;
pub use manager::AltDaManager;

pub mod metrics;
pub use metrics::{Metricer, NoopMetrics};

pub mod state;
pub use state::{Challenge, ChallengeStatus, State, TrackedCommitment};

pub mod traits;
pub use traits::{ChainFetcher, DaStorage, HeadSignalFn};

#[cfg(test)]
mod test_utils;
