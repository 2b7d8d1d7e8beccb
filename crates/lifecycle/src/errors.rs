//! Error and outcome types for the alt-da lifecycle crate.

use alloc::string::String;
use altda_commitment::CommitmentError;

/// Outcomes surfaced by the alt-da manager to the derivation pipeline.
///
/// [AltDaError::PendingChallenge], [AltDaError::ExpiredChallenge],
/// [AltDaError::MissingPastWindow] and [AltDaError::ReorgRequired] are
/// pipeline signals rather than transport failures; they are modelled as
/// distinct variants so callers are forced to handle each one.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AltDaError {
    /// Data is not available but can still be challenged or resolved, so
    /// derivation should pause on this block and retry next tick.
    #[error("not found, pending challenge")]
    PendingChallenge,
    /// A challenge was not resolved in time; derivation should skip this
    /// input.
    #[error("challenge expired")]
    ExpiredChallenge,
    /// The input data is missing and can no longer be challenged. This is a
    /// protocol fatal error.
    #[error("data missing past window")]
    MissingPastWindow,
    /// A commitment expired with an unresolved challenge; the pipeline must
    /// reorganize.
    #[error("reorg required")]
    ReorgRequired,
    /// A resolve was applied to a challenge the store never saw.
    #[error("untracked challenge")]
    UntrackedChallenge,
    /// Terminal sentinel returned by reset once the manager has re-based,
    /// so the pipeline can sequence subsequent steps.
    #[error("reset complete")]
    ResetComplete,
    /// The DA storage server failed.
    #[error(transparent)]
    Storage(#[from] DaStorageError),
    /// The L1 fetcher failed; retriable.
    #[error("l1 fetcher: {0}")]
    Fetcher(String),
}

/// Failures of the DA storage server contract.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DaStorageError {
    /// The server has no entry for the commitment.
    #[error("not found")]
    NotFound,
    /// The pre-image is empty on a put path.
    #[error("invalid input")]
    InvalidInput,
    /// The storage client is disabled by configuration.
    #[error("alt-da storage is not enabled")]
    NotEnabled,
    /// The returned pre-image or commitment failed validation.
    #[error(transparent)]
    Commitment(#[from] CommitmentError),
    /// The HTTP request could not be completed.
    #[error("network: {0}")]
    Network(String),
    /// The server answered with an unexpected status code.
    #[error("server responded with status {0}")]
    Server(u16),
}

/// Failures when decoding a challenge event or resolve calldata. These are
/// recoverable: the offending log is logged and skipped without aborting the
/// block.
#[derive(Debug, thiserror::Error)]
pub enum EventDecodeError {
    /// ABI decoding of the log data or calldata failed.
    #[error("abi decoding failed: {0}")]
    Abi(#[from] alloy_sol_types::Error),
    /// The challenged block number does not fit in a u64.
    #[error("challenged block number does not fit in u64")]
    BlockNumberOverflow,
    /// The challenged commitment bytes are not a valid commitment.
    #[error("challenged commitment: {0}")]
    Commitment(#[from] CommitmentError),
    /// The resolve calldata carried no pre-image.
    #[error("empty resolve data")]
    EmptyResolveData,
}
