use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::{
    APP_SWITCH_API_URL, APP_SWITCH_TIMEOUT, AppSwitchConfig, BackendConfig, DEFAULT_BASE_URL,
    PAYMENTS_TIMEOUT, PaymentsConfig,
};
use crate::error::{ConfigurationError, Error, Result};
use crate::response::{check_app_switch_response, check_payments_response};
use crate::signing::RequestSigner;

const MEDIA_TYPE: &str = "application/json";
const CLIENT_USER_AGENT: &str = concat!("mobilepay-rs/", env!("CARGO_PKG_VERSION"));

static AUTHENTICATION_SIGNATURE: HeaderName = HeaderName::from_static("authenticationsignature");
static SUBSCRIPTION_KEY: HeaderName = HeaderName::from_static("ocp-apim-subscription-key");
static TEST_MODE: HeaderName = HeaderName::from_static("test-mode");
static IBM_CLIENT_ID: HeaderName = HeaderName::from_static("x-ibm-client-id");

/// A request relative to the backend's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// URL-encodes `params` as the query string. Empty output leaves no `?`.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self> {
        let query =
            serde_urlencoded::to_string(params).map_err(|e| Error::Encode(e.to_string()))?;
        self.query = (!query.is_empty()).then_some(query);
        Ok(self)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let body = serde_json::to_vec(body).map_err(|e| Error::Encode(e.to_string()))?;
        self.body = Some(body);
        Ok(self)
    }

    pub fn path_and_query(&self) -> String {
        let path = format!("/{}", self.path.trim_start_matches('/'));
        match &self.query {
            Some(query) => format!("{path}?{query}"),
            None => path,
        }
    }
}

/// Executes API requests and returns the raw body of a successful response.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn call(&self, request: ApiRequest) -> Result<Bytes>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn call(&self, request: ApiRequest) -> Result<Bytes> {
        (**self).call(request).await
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    AppSwitch,
    Payments,
}

/// reqwest-based [`Backend`].
///
/// Headers shared by every request are computed once at construction. An
/// AppSwitch backend adds a fresh `AuthenticationSignature` per request,
/// signed over the exact URL and body that go on the wire.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    kind: BackendKind,
    base_url: String,
    headers: HeaderMap,
    signer: Option<Arc<RequestSigner>>,
    test_mode: bool,
}

impl HttpBackend {
    pub fn app_switch(config: &AppSwitchConfig, backend: BackendConfig) -> Result<Self> {
        let key_pair = config.key_pair().ok_or_else(|| {
            ConfigurationError::Invalid("AppSwitch requests need a signing key pair".into())
        })?;

        let mut headers = base_headers()?;
        headers.insert(
            SUBSCRIPTION_KEY.clone(),
            sensitive_value("subscription key", config.subscription_key())?,
        );
        if backend.test_mode {
            headers.insert(TEST_MODE.clone(), HeaderValue::from_static("true"));
        }

        Self::build(
            BackendKind::AppSwitch,
            backend.url.unwrap_or_else(|| APP_SWITCH_API_URL.to_string()),
            backend.timeout.unwrap_or(APP_SWITCH_TIMEOUT),
            headers,
            Some(Arc::new(RequestSigner::new(key_pair))),
            backend.test_mode,
        )
    }

    pub fn payments(config: &PaymentsConfig, backend: BackendConfig) -> Result<Self> {
        let mut headers = base_headers()?;
        headers.insert(
            IBM_CLIENT_ID.clone(),
            sensitive_value("client id", config.client_id())?,
        );
        headers.insert(
            AUTHORIZATION,
            sensitive_value("api key", &format!("Bearer {}", config.api_key()))?,
        );

        Self::build(
            BackendKind::Payments,
            backend.url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            backend.timeout.unwrap_or(PAYMENTS_TIMEOUT),
            headers,
            None,
            backend.test_mode,
        )
    }

    fn build(
        kind: BackendKind,
        base_url: String,
        timeout: std::time::Duration,
        headers: HeaderMap,
        signer: Option<Arc<RequestSigner>>,
        test_mode: bool,
    ) -> Result<Self> {
        Url::parse(&base_url)
            .map_err(|e| ConfigurationError::Invalid(format!("base url {base_url}: {e}")))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            kind,
            base_url,
            headers,
            signer,
            test_mode,
        })
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `request`. This is also the string that gets signed.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            request.path_and_query()
        );
        Url::parse(&url).map_err(|e| Error::invalid_argument("path", format!("{url}: {e}")))
    }

    fn headers_for(&self, url: &Url, body: &[u8]) -> Result<HeaderMap> {
        let mut headers = self.headers.clone();
        if let Some(signer) = &self.signer {
            let signature = signer.sign(url.as_str(), body)?;
            let value = HeaderValue::from_str(&signature)
                .map_err(|e| Error::Computation(format!("signature header: {e}")))?;
            headers.insert(AUTHENTICATION_SIGNATURE.clone(), value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn call(&self, request: ApiRequest) -> Result<Bytes> {
        let url = self.url_for(&request)?;
        let body = request.body.unwrap_or_default();
        let headers = self.headers_for(&url, &body)?;

        tracing::info!(
            method = %request.method,
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
            "requesting MobilePay API"
        );
        if self.test_mode {
            tracing::debug!(body = %String::from_utf8_lossy(&body), "request body");
        }

        let mut builder = self.client.request(request.method, url).headers(headers);
        if !body.is_empty() {
            builder = builder.body(body);
        }
        let response = builder.send().await?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let bytes = response.bytes().await?;

        tracing::debug!(status = status.as_u16(), "MobilePay API responded");
        if self.test_mode {
            tracing::debug!(body = %String::from_utf8_lossy(&bytes), "response body");
        }

        match self.kind {
            BackendKind::AppSwitch => check_app_switch_response(status, &response_headers, &bytes)?,
            BackendKind::Payments => check_payments_response(status, &bytes)?,
        }

        Ok(bytes)
    }
}

impl fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackend")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("test_mode", &self.test_mode)
            .finish_non_exhaustive()
    }
}

fn base_headers() -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
    headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(CLIENT_USER_AGENT)
            .map_err(|e| ConfigurationError::Invalid(format!("user agent: {e}")))?,
    );
    Ok(headers)
}

fn sensitive_value(name: &str, value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|e| ConfigurationError::Invalid(format!("{name} is not a valid header: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}
