//! HTTP access to the Venta Simple backend.
//!
//! Every network call goes through [`Gateway::request`], which owns URL
//! composition, body encoding and error decoding. [`ApiClient`] layers one
//! typed wrapper per backend endpoint on top of it.

mod api;
mod config;
mod error;
mod gateway;

pub use api::ApiClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult, RequestError};
pub use gateway::{Body, Gateway, Payload, RequestOptions};

/// Re-exported so callers can build [`RequestOptions`] without naming reqwest.
pub use reqwest::Method;
