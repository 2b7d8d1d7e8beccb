//! Metrics sink for the alt-da manager.

/// Observations emitted by the manager and state store. Registration and
/// export are the owner's concern; the manager only reports.
pub trait Metricer {
    /// A new active challenge was recorded for the commitment included at
    /// `comm_block`, challenged at `start_block`.
    fn record_active_challenge(&self, comm_block: u64, start_block: u64, hash: &[u8]);
    /// A challenge was resolved with its pre-image.
    fn record_resolved_challenge(&self, hash: &[u8]);
    /// Challenges expired unresolved during an origin advancement.
    fn record_expired_challenges(&self, count: usize);
    /// A named head cursor moved.
    fn record_challenges_head(&self, name: &'static str, number: u64);
    /// The DA storage server failed a request.
    fn record_storage_error(&self);
}

/// A [Metricer] that discards all observations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl Metricer for NoopMetrics {
    fn record_active_challenge(&self, _comm_block: u64, _start_block: u64, _hash: &[u8]) {}
    fn record_resolved_challenge(&self, _hash: &[u8]) {}
    fn record_expired_challenges(&self, _count: usize) {}
    fn record_challenges_head(&self, _name: &'static str, _number: u64) {}
    fn record_storage_error(&self) {}
}
