//! Outbound request plumbing shared by the domain clients.

use crate::{ApiError, ApiResult, UNEXPECTED_RESPONSE_MESSAGE};
use booknote_storage::LocalStore;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Endpoints under this prefix never carry a bearer token.
pub const AUTH_PREFIX: &str = "/auth/";

/// JSON-over-HTTP gateway to the BookNote API.
///
/// Every failure is normalized to [`ApiError`]; raw transport errors are
/// logged and never returned.
#[derive(Clone)]
pub struct ApiGateway {
    http_client: reqwest::Client,
    base_url: String,
    store: LocalStore,
}

impl ApiGateway {
    /// Create a gateway.
    ///
    /// # Arguments
    /// * `base_url` - Prefix every endpoint is appended to (e.g. `http://localhost:8080/api`)
    /// * `store` - Local store the access token is read from
    pub fn new(base_url: impl Into<String>, store: LocalStore) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, store)
    }

    /// Create a gateway over an existing HTTP client.
    pub fn with_client(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        store: LocalStore,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The local store this gateway reads tokens from.
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// GET `endpoint` and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        let request = self.prepare(Method::GET, endpoint);
        self.execute(endpoint, request).await
    }

    /// POST `body` as JSON to `endpoint` and decode the JSON response.
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.prepare(Method::POST, endpoint).json(body);
        self.execute(endpoint, request).await
    }

    /// Build a request with the JSON content type and, outside the auth
    /// prefix, the stored bearer token.
    fn prepare(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let mut request = self
            .http_client
            .request(method, self.url(endpoint))
            .header(CONTENT_TYPE, "application/json");

        if !endpoint.starts_with(AUTH_PREFIX) {
            match self.store.access_token() {
                Ok(Some(token)) => {
                    request = request.header(AUTHORIZATION, format!("Bearer {}", token));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(endpoint = endpoint, error = %e, "Failed to read access token");
                }
            }
        }

        request
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        debug!(endpoint = endpoint, "Sending API request");

        let response = request.send().await.map_err(|e| {
            warn!(endpoint = endpoint, error = %e, "API request failed without a response");
            ApiError::network()
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            warn!(endpoint = endpoint, status = %status, error = %e, "Failed to read API response body");
            ApiError::network()
        })?;
        let body = parse_body(&bytes);

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), body);
            warn!(
                endpoint = endpoint,
                status = %status,
                message = %err.message,
                "API request rejected"
            );
            return Err(err);
        }

        T::deserialize(&body).map_err(|e| {
            warn!(endpoint = endpoint, status = %status, error = %e, "Unexpected API response shape");
            ApiError::new(status.as_u16(), UNEXPECTED_RESPONSE_MESSAGE, Some(body.clone()))
        })
    }
}

/// Parse a response body as JSON. Empty and non-JSON bodies become `null`.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, len = bytes.len(), "Response body is not JSON");
            Value::Null
        }
    }
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
