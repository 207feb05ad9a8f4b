//! Probe call implementation
//!
//! A probe is a single GET against the configured endpoint carrying the
//! current credential in a header. The [`Probe`] trait is the seam the
//! executor depends on; [`HttpProbe`] is the reqwest-backed implementation.

use crate::config::Config;
use crate::TransportError;
use async_trait::async_trait;
use reqwest::header::HeaderName;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Issues one probe call
///
/// `Ok` carries the server-reported status exactly as received, `Err` means
/// no status was obtained.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn send(&self, credential: &str) -> Result<u16, TransportError>;
}

#[async_trait]
impl<T: Probe + ?Sized> Probe for Arc<T> {
    async fn send(&self, credential: &str) -> Result<u16, TransportError> {
        (**self).send(credential).await
    }
}

/// Probe that sends real HTTP requests
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    endpoint: String,
    credential_header: HeaderName,
}

impl HttpProbe {
    /// Creates a probe from an already built client
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        credential_header: HeaderName,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            credential_header,
        }
    }

    /// Builds the HTTP client and probe described by `config`
    pub fn from_config(config: &Config) -> Result<Self, crate::ProbeError> {
        let client = build_http_client(config)?;
        let header = HeaderName::from_bytes(config.probe.credential_header.as_bytes())
            .map_err(|e| {
                crate::ProbeError::InvalidArgument(format!(
                    "invalid credential header '{}': {}",
                    config.probe.credential_header, e
                ))
            })?;

        Ok(Self::new(client, config.probe.endpoint.clone(), header))
    }

    /// The URL this probe targets
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn send(&self, credential: &str) -> Result<u16, TransportError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(self.credential_header.clone(), credential)
            .send()
            .await?;

        Ok(response.status().as_u16())
    }
}

/// Builds an HTTP client for probe calls
///
/// The user agent is formatted as `name/version`. A `request-timeout-ms` of 0
/// leaves the client without a per-request timeout.
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", config.user_agent.name, config.user_agent.version);

    let mut builder = Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if config.probe.request_timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.probe.request_timeout_ms));
    }

    builder.build()
}
