//! HTTP gateway shared by every service call.
//!
//! One `reqwest::Client` carries the base address, the JSON content type and
//! the request timeout. Failures of any kind, rejected statuses included, go
//! through [`observe`] exactly once before reaching the caller.

use crate::config::ClientConfig;
use crate::errors::ApiError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::Request(err.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.dispatch(self.http.get(url)).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.dispatch(self.http.post(url).json(body)).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.dispatch(self.http.post(url).multipart(form)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|err| observe(err.into(), None))
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = prepare(request)
            .send()
            .await
            .map_err(|err| observe(ApiError::transport(err, self.timeout), None))?;

        let status = response.status();
        let url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| observe(ApiError::transport(err, self.timeout), None))?;

        debug!(%url, status = status.as_u16(), "API response");
        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body));
        }
        serde_json::from_slice(&body)
            .map_err(|err| observe(ApiError::Decode(err.to_string()), Some(&body[..])))
    }
}

/// Outbound hook. Requests currently pass through untouched; auth headers
/// belong here once the backend issues tokens that it checks.
fn prepare(request: RequestBuilder) -> RequestBuilder {
    request
}

/// Failure hook: every error leaves the gateway through here and is logged
/// once, with the response body when there was one.
fn observe(err: ApiError, payload: Option<&[u8]>) -> ApiError {
    match payload {
        Some(payload) => error!(payload = %String::from_utf8_lossy(payload), "API error: {err}"),
        None => error!("API error: {err}"),
    }
    err
}

fn rejection(status: u16, body: &[u8]) -> ApiError {
    let err = ApiError::Rejected {
        status,
        detail: server_detail(body),
    };
    observe(err, Some(body))
}

/// The backend reports failures as `{"detail": ...}`; some routes use
/// `{"message": ...}` instead.
fn server_detail(body: &[u8]) -> Option<String> {
    let parsed: Value = serde_json::from_slice(body).ok()?;
    let object = parsed.as_object()?;
    ["detail", "message"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(str::to_owned)
}
