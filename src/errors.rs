use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum ApiClientError {
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiFailure),

    #[error("Transport Error: {0}")]
    Transport(#[from] TransportError),

    // Failed to parse a 2xx response body requested through `fetch_json`
    #[error("Response Error: Failed to deserialize response body: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl ApiClientError {
    /// The HTTP failure carried by this error, if the server answered with status >= 400.
    pub fn as_api_failure(&self) -> Option<&ApiFailure> {
        match self {
            ApiClientError::Api(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Raised while building a client, before any request goes out.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No base URL provided for {api_name}")]
    MissingBaseUrl { api_name: String },

    #[error("Invalid base URL for {api_name}: {source}")]
    BaseUrlInvalid {
        api_name: String,
        source: UrlParseError,
    },

    #[error("Base URL for {api_name} has no host/path hierarchy: {url}")]
    BaseUrlNotHierarchical { api_name: String, url: String },

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("Invalid value for header {0}")]
    InvalidHeaderValue(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClientBuildFailed(reqwest::Error),
}

/// Failures coming out of the transport. These are passed through untouched.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection or timeout issue: {0}")]
    NetworkIssue(reqwest::Error),

    #[error("Failed to build or send the request: {0}")]
    RequestFailed(reqwest::Error),

    #[error("Failed to read the response body: {0}")]
    BodyReadFailed(reqwest::Error),

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            TransportError::NetworkIssue(err)
        } else if err.is_body() || err.is_decode() {
            TransportError::BodyReadFailed(err)
        } else {
            TransportError::RequestFailed(err)
        }
    }
}

/// Parsed body of a failed response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(serde_json::Value),
    Text(String),
}

impl ErrorBody {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ErrorBody::Json(value) => Some(value),
            ErrorBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ErrorBody::Text(text) => Some(text),
            ErrorBody::Json(_) => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Text(text) => f.write_str(text),
            // Value's Display is its compact JSON serialization
            ErrorBody::Json(value) => write!(f, "{value}"),
        }
    }
}

/// A single exchange that came back with status >= 400.
#[derive(Error, Debug, Clone)]
#[error("API({api_name}) HttpError({}) Details({data})", .status.as_u16())]
pub struct ApiFailure {
    pub api_name: String,
    pub status: StatusCode,
    pub data: ErrorBody,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_failure_display_with_text_body() {
        let failure = ApiFailure {
            api_name: "test".to_string(),
            status: StatusCode::UNAUTHORIZED,
            data: ErrorBody::Text("unauthorized".to_string()),
        };
        assert_eq!(
            failure.to_string(),
            "API(test) HttpError(401) Details(unauthorized)"
        );
    }

    #[test]
    fn api_failure_display_with_json_body() {
        let failure = ApiFailure {
            api_name: "billing".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            data: ErrorBody::Json(json!({ "error_details": "error" })),
        };
        assert_eq!(
            failure.to_string(),
            r#"API(billing) HttpError(500) Details({"error_details":"error"})"#
        );
    }

    #[test]
    fn api_error_is_transparent() {
        let err: ApiClientError = ApiFailure {
            api_name: "test".to_string(),
            status: StatusCode::NOT_FOUND,
            data: ErrorBody::Text("missing".to_string()),
        }
        .into();
        assert_eq!(err.to_string(), "API(test) HttpError(404) Details(missing)");
        assert_eq!(
            err.as_api_failure().map(|f| f.status),
            Some(StatusCode::NOT_FOUND)
        );
    }

    #[test]
    fn missing_base_url_display() {
        let err: ApiClientError = ConfigError::MissingBaseUrl {
            api_name: "users".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration Error: No base URL provided for users"
        );
        assert!(err.as_api_failure().is_none());
    }

    #[test]
    fn error_body_accessors() {
        let text = ErrorBody::Text("oops".to_string());
        assert_eq!(text.as_text(), Some("oops"));
        assert!(text.as_json().is_none());

        let value = ErrorBody::Json(json!([1, 2]));
        assert_eq!(value.as_json(), Some(&json!([1, 2])));
        assert!(value.as_text().is_none());
    }
}
