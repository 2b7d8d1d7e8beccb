//! The DA storage server client.

use alloy_primitives::Bytes;
use altda_commitment::Commitment;
use altda_lifecycle::{DaStorage, DaStorageError};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::config::DaClientConfig;

/// HTTP client implementing [DaStorage] against a DA storage server.
#[derive(Debug, Clone)]
pub struct DaClient {
    cfg: DaClientConfig,
    client: reqwest::Client,
}

impl DaClient {
    /// Creates a client for the given configuration.
    pub fn new(cfg: DaClientConfig) -> Self {
        Self { cfg, client: reqwest::Client::new() }
    }

    /// The configuration this client was built with.
    pub const fn config(&self) -> &DaClientConfig {
        &self.cfg
    }

    /// Fetches the pre-image for the commitment, optionally re-verifying it.
    pub async fn get_input(&self, commitment: &Commitment) -> Result<Bytes, DaStorageError> {
        if !self.cfg.enabled {
            return Err(DaStorageError::NotEnabled);
        }
        let url = format!("{}/get/0x{commitment}", self.cfg.url);
        debug!(target: "altda-client", %url, "fetching input");
        let response = with_timeout(self.client.get(&url), self.cfg.get_timeout)
            .send()
            .await
            .map_err(network)?;
        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(DaStorageError::NotFound),
            status => return Err(DaStorageError::Server(status.as_u16())),
        }
        let body = response.bytes().await.map_err(network)?;
        let input = Bytes::from(body.to_vec());
        if self.cfg.verify_on_read {
            commitment.verify(&input)?;
        }
        Ok(input)
    }

    /// Stores the pre-image and returns the commitment under which the
    /// server serves it back.
    pub async fn set_input(&self, input: &[u8]) -> Result<Commitment, DaStorageError> {
        if input.is_empty() {
            return Err(DaStorageError::InvalidInput);
        }
        if !self.cfg.enabled {
            return Err(DaStorageError::NotEnabled);
        }
        if self.cfg.precompute {
            let commitment = Commitment::keccak256(input);
            self.put_with_commitment(&commitment, input).await?;
            Ok(commitment)
        } else {
            self.put_for_commitment(input).await
        }
    }

    /// Stores the pre-image under a locally computed commitment.
    async fn put_with_commitment(
        &self,
        commitment: &Commitment,
        input: &[u8],
    ) -> Result<(), DaStorageError> {
        let url = format!("{}/put/0x{commitment}", self.cfg.url);
        debug!(target: "altda-client", %url, len = input.len(), "storing input");
        let response = with_timeout(self.client.post(&url), self.cfg.put_timeout)
            .body(input.to_vec())
            .send()
            .await
            .map_err(network)?;
        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(DaStorageError::Server(status.as_u16())),
        }
    }

    /// Stores the pre-image and decodes the commitment the server assigned.
    async fn put_for_commitment(&self, input: &[u8]) -> Result<Commitment, DaStorageError> {
        let url = format!("{}/put", self.cfg.url);
        debug!(target: "altda-client", %url, len = input.len(), "storing input");
        let response = with_timeout(self.client.post(&url), self.cfg.put_timeout)
            .body(input.to_vec())
            .send()
            .await
            .map_err(network)?;
        if response.status() != StatusCode::OK {
            return Err(DaStorageError::Server(response.status().as_u16()));
        }
        let body = response.bytes().await.map_err(network)?;
        let commitment = Commitment::decode(&body)?;
        // a keccak commitment the server assigned must still match what we
        // uploaded; generic commitments pass unconditionally
        commitment.verify(input)?;
        if self.cfg.generic_da
            && commitment.commitment_type() != altda_commitment::CommitmentType::Generic
        {
            return Err(DaStorageError::Commitment(
                altda_commitment::CommitmentError::Invalid,
            ));
        }
        Ok(commitment)
    }
}

#[async_trait]
impl DaStorage for DaClient {
    async fn get_input(&self, commitment: &Commitment) -> Result<Bytes, DaStorageError> {
        Self::get_input(self, commitment).await
    }

    async fn set_input(&self, input: &[u8]) -> Result<Commitment, DaStorageError> {
        Self::set_input(self, input).await
    }
}

fn with_timeout(request: RequestBuilder, timeout: Duration) -> RequestBuilder {
    if timeout.is_zero() {
        request
    } else {
        request.timeout(timeout)
    }
}

fn network(err: reqwest::Error) -> DaStorageError {
    DaStorageError::Network(err.to_string())
}
