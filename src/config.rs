use crate::errors::ConfigError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Defaults applied to every request issued by a client.
///
/// Both maps are optional when deserialized, so a config file only needs
/// to name what it sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub headers: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }
}

/// Per-call options. Headers and query params are overlaid on the client
/// defaults key by key; `method` and `body` are handed to the transport as-is.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Converts string pairs into a `HeaderMap`. Later pairs replace earlier ones
/// with the same (case-insensitive) name.
pub(crate) fn to_header_map<'a, I>(pairs: I) -> Result<HeaderMap, ConfigError>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut headers = HeaderMap::new();
    extend_headers(&mut headers, pairs)?;
    Ok(headers)
}

pub(crate) fn extend_headers<'a, I>(headers: &mut HeaderMap, pairs: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    for (name, value) in pairs {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(name.clone()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| ConfigError::InvalidHeaderValue(name.clone()))?;
        headers.insert(header_name, header_value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_deserializes_with_missing_fields() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "headers": { "x-custom-header": "test-header" } }"#)
                .unwrap();
        assert_eq!(config.headers["x-custom-header"], "test-header");
        assert!(config.query_params.is_empty());

        let empty: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ClientConfig::default());
    }

    #[test]
    fn request_options_default_to_get_without_body() {
        let options = RequestOptions::new();
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
        assert!(options.headers.is_empty());
    }

    #[test]
    fn header_map_overrides_case_insensitively() {
        let defaults = ClientConfig::default().with_header("x-custom-header", "test-header");
        let overrides = RequestOptions::new().header("X-Custom-Header", "test-o-header");

        let mut headers = to_header_map(&defaults.headers).unwrap();
        extend_headers(&mut headers, &overrides.headers).unwrap();

        assert_eq!(headers.len(), 1);
        assert_eq!(headers["x-custom-header"], "test-o-header");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let config = ClientConfig::default().with_header("bad header", "value");
        match to_header_map(&config.headers) {
            Err(ConfigError::InvalidHeaderName(name)) => assert_eq!(name, "bad header"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn invalid_header_value_is_rejected() {
        let config = ClientConfig::default().with_header("x-token", "line\nbreak");
        assert!(matches!(
            to_header_map(&config.headers),
            Err(ConfigError::InvalidHeaderValue(_))
        ));
    }
}
