use crate::errors::{ApiClientError, ApiFailure, ErrorBody};
use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

const JSON_MEDIA_TYPE: &str = "application/json";

/// A fully received HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, url: Url, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            url,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// True when the `Content-Type` media type is `application/json`,
    /// ignoring case and any parameters such as `charset`.
    pub fn is_json(&self) -> bool {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(JSON_MEDIA_TYPE))
    }

    pub fn bytes(self) -> Bytes {
        self.body
    }

    /// Body decoded as UTF-8; invalid sequences are replaced.
    pub fn text(self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiClientError> {
        serde_json::from_slice(&self.body).map_err(ApiClientError::Deserialization)
    }
}

/// Passes responses below 400 through and turns everything else into an `ApiFailure`.
pub fn classify(api_name: &str, response: RawResponse) -> Result<RawResponse, ApiFailure> {
    let status = response.status();
    if status.as_u16() < 400 {
        return Ok(response);
    }

    let data = extract_error_body(api_name, response);
    tracing::warn!(api = api_name, status = status.as_u16(), "API request failed");

    Err(ApiFailure {
        api_name: api_name.to_string(),
        status,
        data,
    })
}

fn extract_error_body(api_name: &str, response: RawResponse) -> ErrorBody {
    if !response.is_json() {
        return ErrorBody::Text(response.text());
    }

    match serde_json::from_slice(&response.body) {
        Ok(value) => ErrorBody::Json(value),
        Err(err) => {
            // Keep the status visible to the caller; fall back to the raw text
            tracing::warn!(api = api_name, error = %err, "Error body is not valid JSON");
            ErrorBody::Text(response.text())
        }
    }
}
