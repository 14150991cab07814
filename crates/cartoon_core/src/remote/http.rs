//! `reqwest`-backed remote source.

use super::{RemoteError, RemoteResult, RemoteSource};
use log::{error, info};
use std::time::Instant;

/// HTTP remote source sharing one connection pool.
#[derive(Debug, Clone, Default)]
pub struct HttpRemoteSource {
    client: reqwest::Client,
}

impl HttpRemoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl RemoteSource for HttpRemoteSource {
    async fn fetch(&self, url: &str) -> RemoteResult<Vec<u8>> {
        let started_at = Instant::now();
        info!("event=remote_fetch module=remote status=start");

        let result = fetch_once(&self.client, url).await;
        match &result {
            Ok(body) => info!(
                "event=remote_fetch module=remote status=ok duration_ms={} bytes={}",
                started_at.elapsed().as_millis(),
                body.len()
            ),
            Err(err) => error!(
                "event=remote_fetch module=remote status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

async fn fetch_once(client: &reqwest::Client, url: &str) -> RemoteResult<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| RemoteError::Transport(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::HttpStatus(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| RemoteError::Transport(err.to_string()))?;
    if body.is_empty() {
        return Err(RemoteError::EmptyBody);
    }

    Ok(body.to_vec())
}
