//! Typed wrappers, one per backend endpoint.
//!
//! Wrappers only fix the path, method, body and auth shape of a call; all
//! transport and error handling lives in [`Gateway::request`].

mod account;
mod ai;
mod data;
mod stats;

use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::gateway::{Gateway, Payload, RequestOptions};
use serde::de::DeserializeOwned;

/// Typed client for the Venta Simple backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    gateway: Gateway,
}

impl ApiClient {
    /// Builds a client for `config`.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            gateway: Gateway::new(config)?,
        })
    }

    /// Wraps an existing gateway.
    pub fn from_gateway(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// The gateway every wrapper calls through.
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    async fn call(&self, path: &str, options: RequestOptions) -> ApiResult<Payload> {
        self.gateway.request(path, options).await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> ApiResult<T> {
        self.call(path, options).await?.decode()
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<Vec<T>> {
        Ok(self.call(path, options).await?.decode_list())
    }
}

/// Percent-encodes one path segment.
fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Appends `?k=v&...` in the given order; empty when there are no pairs.
fn with_query<K, V>(path: &str, pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}
