//! HTTP client for the alt-da storage server.
//!
//! The server speaks a two-route protocol: `GET /get/0x<hex commitment>`
//! returns the pre-image and `POST /put` (or `/put/0x<hex commitment>` when
//! the commitment is computed locally) stores one.

pub mod config;
pub use config::DaClientConfig;

pub mod client;
pub use client::DaClient;
