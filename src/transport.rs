use crate::errors::{ConfigError, TransportError};
use crate::response::RawResponse;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use std::sync::Arc;
use url::Url;

/// A request ready for the wire. Query parameters are already encoded into `url`.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Performs the actual network exchange.
///
/// Timeouts, cancellation, pooling and redirects are all up to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        (**self).request(request).await
    }
}

/// `Transport` backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ConfigError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(ConfigError::HttpClientBuildFailed)?;

        Ok(Self::from_client(http_client))
    }

    /// Use a preconfigured client, e.g. one with timeouts or a proxy set.
    pub fn from_client(http_client: reqwest::Client) -> Self {
        ReqwestTransport { http_client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .http_client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(TransportError::BodyReadFailed)?;

        Ok(RawResponse::new(status, headers, url, body))
    }
}
