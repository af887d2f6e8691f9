//! Reference HTTP transport
//!
//! Posts one encoded message per request and maps the outcome onto the
//! error taxonomy. This transport never retries; server rejections pass
//! through verbatim as API errors.

use super::{RequestDescriptor, TokenProvider, Transport};
use crate::config::ClientConfig;
use crate::error::{ApiError, QueryError, Result, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::token::StaticToken;

const WIRE_CONTENT_TYPE: &str = "application/x-msgpack";

/// HTTP binding of the transport seam
pub struct HttpTransport {
    endpoint: String,
    http_client: Client,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl HttpTransport {
    /// Create a transport for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(TransportError::Network)?;

        Ok(Self {
            endpoint: normalize_endpoint(endpoint.into()),
            http_client,
            token_provider: None,
        })
    }

    /// Create a transport from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10);
        if !config.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http_client = builder.build().map_err(TransportError::Network)?;

        let token_provider: Option<Arc<dyn TokenProvider>> = config
            .api_token
            .as_ref()
            .map(|token| {
                Arc::new(StaticToken::new(token.expose_secret().clone())) as Arc<dyn TokenProvider>
            });

        Ok(Self {
            endpoint: normalize_endpoint(config.endpoint.clone()),
            http_client,
            token_provider,
        })
    }

    /// Create a transport with a custom HTTP client
    pub fn with_http_client(endpoint: impl Into<String>, http_client: Client) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint.into()),
            http_client,
            token_provider: None,
        }
    }

    /// Attach a token provider; its token is sent as a bearer header on
    /// every request
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    fn url(&self, descriptor: &RequestDescriptor) -> String {
        format!(
            "{}/v1/{}/{}",
            self.endpoint,
            descriptor.procedure.as_str(),
            descriptor.collection
        )
    }
}

fn normalize_endpoint(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_owned()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform_request(
        &self,
        message: Bytes,
        descriptor: &RequestDescriptor,
    ) -> Result<Bytes> {
        let url = self.url(descriptor);
        debug!(%url, bytes = message.len(), "performing request");

        let mut request = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, WIRE_CONTENT_TYPE)
            .body(message);

        if let Some(provider) = &self.token_provider {
            let token = provider.token().await?;
            request = request.bearer_auth(token.access_token.expose_secret());
        }

        let response = request.send().await.map_err(TransportError::Network)?;
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                warn!(%url, %status, "request rejected by authentication");
                Err(TransportError::AuthenticationFailed(body).into())
            }
            status if status.is_success() => {
                let body = response.bytes().await.map_err(TransportError::Network)?;
                debug!(bytes = body.len(), "received response");
                Ok(body)
            }
            status => {
                // the server's error payload is surfaced verbatim
                let body = response.text().await.unwrap_or_default();
                Err(QueryError::Api(ApiError {
                    status: status.as_u16(),
                    message: body,
                }))
            }
        }
    }
}
