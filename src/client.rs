use crate::config::{extend_headers, to_header_map, ClientConfig, RequestOptions};
use crate::errors::{ApiClientError, ConfigError};
use crate::response::{classify, RawResponse};
use crate::transport::{ReqwestTransport, Transport, TransportRequest};
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use url::Url;

/// Builds a reqwest-backed client for `api_name` rooted at `base_url`.
pub fn create_api(
    api_name: &str,
    base_url: &str,
    config: Option<ClientConfig>,
) -> Result<ApiClient, ApiClientError> {
    ApiClient::new(api_name, base_url, config)
}

/// Client for a single API. Everything it holds is fixed at construction,
/// so one instance can serve concurrent calls through `&self`.
#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    name: String,
    // scheme, host and port only; path, query and fragment are cleared
    origin: Url,
    // no leading or trailing '/'
    base_path: String,
    default_headers: HeaderMap,
    default_query_params: BTreeMap<String, String>,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    pub fn new(
        api_name: &str,
        base_url: &str,
        config: Option<ClientConfig>,
    ) -> Result<Self, ApiClientError> {
        let transport = ReqwestTransport::new()?;
        Self::with_transport(api_name, base_url, config, transport)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(
        api_name: &str,
        base_url: &str,
        config: Option<ClientConfig>,
        transport: T,
    ) -> Result<Self, ApiClientError> {
        if base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl {
                api_name: api_name.to_string(),
            }
            .into());
        }

        let mut origin = Url::parse(base_url).map_err(|source| ConfigError::BaseUrlInvalid {
            api_name: api_name.to_string(),
            source,
        })?;
        if origin.cannot_be_a_base() {
            return Err(ConfigError::BaseUrlNotHierarchical {
                api_name: api_name.to_string(),
                url: base_url.to_string(),
            }
            .into());
        }

        let base_path = origin.path().trim_matches('/').to_string();
        origin.set_path("");
        origin.set_query(None);
        origin.set_fragment(None);

        let config = config.unwrap_or_default();
        let default_headers = to_header_map(&config.headers)?;

        Ok(ApiClient {
            name: api_name.to_string(),
            origin,
            base_path,
            default_headers,
            default_query_params: config.query_params,
            transport,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Joins `endpoint` onto the base path with exactly one '/' between them
    /// and appends `query_params` (no '?' when empty).
    pub fn build_url(&self, endpoint: &str, query_params: &BTreeMap<String, String>) -> Url {
        let endpoint = endpoint.trim_start_matches('/');
        let path = if self.base_path.is_empty() {
            format!("/{endpoint}")
        } else {
            format!("/{}/{endpoint}", self.base_path)
        };

        let mut url = self.origin.clone();
        url.set_path(&path);
        if !query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(query_params);
        }
        url
    }

    /// Overlays `options` on the client defaults and produces the request
    /// handed to the transport.
    pub fn build_request(
        &self,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<TransportRequest, ApiClientError> {
        let mut query_params = self.default_query_params.clone();
        let mut headers = self.default_headers.clone();
        let mut method = Method::GET;
        let mut body = None;

        if let Some(options) = options {
            query_params.extend(
                options
                    .query_params
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone())),
            );
            extend_headers(&mut headers, &options.headers)?;
            method = options.method.clone();
            body = options.body.clone();
        }

        Ok(TransportRequest {
            method,
            url: self.build_url(endpoint, &query_params),
            headers,
            body,
        })
    }

    /// Issues the request and returns the response untouched when its status is below 400.
    pub async fn fetch(
        &self,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<RawResponse, ApiClientError> {
        let request = self.build_request(endpoint, options)?;
        tracing::debug!(
            api = %self.name,
            method = %request.method,
            url = %request.url,
            "Sending request"
        );

        let response = self.transport.request(request).await?;
        tracing::debug!(
            api = %self.name,
            status = response.status().as_u16(),
            "Received response"
        );

        Ok(classify(&self.name, response)?)
    }

    pub async fn fetch_json<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<R, ApiClientError> {
        self.fetch(endpoint, options).await?.json()
    }

    pub async fn fetch_text(
        &self,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<String, ApiClientError> {
        Ok(self.fetch(endpoint, options).await?.text())
    }
}
