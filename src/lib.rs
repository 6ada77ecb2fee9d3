// Declare modules within this crate
pub mod client;
pub mod config;
pub mod errors;
pub mod response;
pub mod transport;

// Re-export the main components for users of this crate
pub use client::{create_api, ApiClient};
pub use config::{ClientConfig, RequestOptions};
pub use errors::{ApiClientError, ApiFailure, ConfigError, ErrorBody, TransportError};
pub use response::RawResponse;
pub use transport::{ReqwestTransport, Transport, TransportRequest};
