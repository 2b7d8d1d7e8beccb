//! The [Commitment] type and its wire codec.
//!
//! A commitment is an opaque reference to a blob of data held off-chain by a
//! DA server. On the wire it is a one byte type tag followed by the variant
//! body; inside batcher calldata the encoded form is additionally prefixed
//! with [TX_DATA_VERSION_1].

use alloc::vec::Vec;
use alloy_primitives::{hex, keccak256, Bytes, B256};
use core::fmt;
use core::str::FromStr;

use crate::{CommitmentError, TX_DATA_VERSION_1};

/// The commitment variants understood by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommitmentType {
    /// A keccak256 digest of the pre-image. The DA server is untrusted; reads
    /// are verifiable against the digest.
    Keccak256 = 0,
    /// An arbitrary bytestring assigned by the DA server, which is trusted to
    /// have validated the pre-image.
    Generic = 1,
}

impl CommitmentType {
    /// The one byte type tag that prefixes the encoded form.
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CommitmentType {
    type Error = CommitmentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Keccak256),
            1 => Ok(Self::Generic),
            t => Err(CommitmentError::UnknownType(t)),
        }
    }
}

impl FromStr for CommitmentType {
    type Err = CommitmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "KeccakCommitment" => Ok(Self::Keccak256),
            "GenericCommitment" => Ok(Self::Generic),
            _ => Err(CommitmentError::Invalid),
        }
    }
}

/// An alt-da commitment. Closed sum over the supported variants; all protocol
/// logic dispatches on the type tag rather than the body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Commitment {
    /// Keccak256 digest of the pre-image.
    Keccak256(B256),
    /// Server-assigned opaque commitment, non-empty.
    Generic(Bytes),
}

impl Commitment {
    /// Commits to the given pre-image with its keccak256 digest.
    pub fn keccak256(input: &[u8]) -> Self {
        Self::Keccak256(keccak256(input))
    }

    /// Wraps server-assigned commitment bytes.
    pub fn generic(data: impl Into<Bytes>) -> Self {
        Self::Generic(data.into())
    }

    /// The variant of this commitment.
    pub const fn commitment_type(&self) -> CommitmentType {
        match self {
            Self::Keccak256(_) => CommitmentType::Keccak256,
            Self::Generic(_) => CommitmentType::Generic,
        }
    }

    /// Encodes the commitment as type tag followed by body.
    pub fn encode(&self) -> Bytes {
        let body: &[u8] = match self {
            Self::Keccak256(digest) => digest.as_slice(),
            Self::Generic(data) => data,
        };
        let mut encoded = Vec::with_capacity(1 + body.len());
        encoded.push(self.commitment_type().tag());
        encoded.extend_from_slice(body);
        Bytes::from(encoded)
    }

    /// Decodes an encoded commitment, enforcing the variant length rules: a
    /// keccak256 body is exactly 32 bytes and a generic body is non-empty.
    pub fn decode(input: &[u8]) -> Result<Self, CommitmentError> {
        let (tag, body) = input.split_first().ok_or(CommitmentError::Invalid)?;
        match CommitmentType::try_from(*tag)? {
            CommitmentType::Keccak256 => {
                let digest =
                    B256::try_from(body).map_err(|_| CommitmentError::Invalid)?;
                Ok(Self::Keccak256(digest))
            }
            CommitmentType::Generic => {
                if body.is_empty() {
                    return Err(CommitmentError::Invalid);
                }
                Ok(Self::Generic(Bytes::copy_from_slice(body)))
            }
        }
    }

    /// The batcher calldata form: [TX_DATA_VERSION_1] followed by the encoded
    /// commitment.
    pub fn tx_data(&self) -> Bytes {
        let encoded = self.encode();
        let mut data = Vec::with_capacity(1 + encoded.len());
        data.push(TX_DATA_VERSION_1);
        data.extend_from_slice(&encoded);
        Bytes::from(data)
    }

    /// Decodes a commitment out of batcher calldata, checking the version
    /// prefix.
    pub fn from_tx_data(data: &[u8]) -> Result<Self, CommitmentError> {
        let (version, encoded) = data.split_first().ok_or(CommitmentError::Invalid)?;
        if *version != TX_DATA_VERSION_1 {
            return Err(CommitmentError::Invalid);
        }
        Self::decode(encoded)
    }

    /// Checks the pre-image against the commitment. Generic commitments are
    /// validated by the DA server, so any pre-image passes.
    pub fn verify(&self, input: &[u8]) -> Result<(), CommitmentError> {
        match self {
            Self::Keccak256(digest) => {
                if keccak256(input) == *digest {
                    Ok(())
                } else {
                    Err(CommitmentError::Mismatch)
                }
            }
            Self::Generic(_) => Ok(()),
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.encode()))
    }
}
