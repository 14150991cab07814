//! Remote source of cartoon payloads.
//!
//! # Responsibility
//! - Perform one GET against a fixed endpoint and hand back raw bytes.
//!
//! # Invariants
//! - Single attempt: no retry, no streaming, platform-default timeouts.
//! - Payload bytes are never interpreted here.

mod http;

pub use http::HttpRemoteSource;

use std::future::Future;
use thiserror::Error;

/// Character endpoint queried by the one-time load.
pub const DEFAULT_API_URL: &str = "https://rickandmortyapi.com/api/character/1,2";

pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection, DNS, TLS or body read failure.
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected http status {0}")]
    HttpStatus(u16),
    #[error("response body is empty")]
    EmptyBody,
}

/// Fetches raw payload bytes from a URL.
pub trait RemoteSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = RemoteResult<Vec<u8>>> + Send;
}
