use crate::{
    apis::{ApprovalApi, BaikeApi, BitableApi, WikiApi},
    auth::Authentication,
    error::{LarkError, LarkResult},
    models::ApiEnvelope,
    pagination::{PageIterator, PageRequest, PaginationConfig, CURSOR_PARAM},
};
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Open platform endpoint for Feishu tenants
pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn";

/// Extra per-call options applied on top of authentication
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn apply(&self, mut request: RequestBuilder) -> LarkResult<RequestBuilder> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| LarkError::invalid_param(format!("Invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| LarkError::invalid_param(format!("Invalid header value: {}", e)))?;
            headers.insert(name, value);
        }
        if !headers.is_empty() {
            request = request.headers(headers);
        }
        if !self.query.is_empty() {
            request = request.query(&self.query);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        Ok(request)
    }
}

/// Main Lark open platform client
#[derive(Clone)]
pub struct LarkClient {
    client: Client,
    base_url: Url,
    auth: Arc<dyn Authentication>,
}

impl LarkClient {
    /// Create a new client with authentication
    pub fn new(
        base_url: impl AsRef<str>,
        auth: impl Authentication + 'static,
    ) -> LarkResult<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url,
            auth: Arc::new(auth),
        })
    }

    /// Create a client against [`DEFAULT_BASE_URL`]
    pub fn with_default_domain(auth: impl Authentication + 'static) -> LarkResult<Self> {
        Self::new(DEFAULT_BASE_URL, auth)
    }

    /// Create a new client with a preconfigured reqwest client
    pub fn with_client(
        client: Client,
        base_url: impl AsRef<str>,
        auth: impl Authentication + 'static,
    ) -> LarkResult<Self> {
        let base_url = Url::parse(base_url.as_ref())?;

        Ok(Self {
            client,
            base_url,
            auth: Arc::new(auth),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get Approval API
    pub fn approval(&self) -> ApprovalApi<'_> {
        ApprovalApi::new(self)
    }

    /// Get Wiki API
    pub fn wiki(&self) -> WikiApi<'_> {
        WikiApi::new(self)
    }

    /// Get Baike (glossary) API
    pub fn baike(&self) -> BaikeApi<'_> {
        BaikeApi::new(self)
    }

    /// Get Bitable (base tables) API
    pub fn bitable(&self) -> BitableApi<'_> {
        BitableApi::new(self)
    }

    /// Build a request to the given path with authentication
    pub async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> LarkResult<RequestBuilder> {
        let url = self.base_url.join(path)?;
        let mut headers = HeaderMap::new();
        self.auth.apply_auth(&mut headers).await?;

        Ok(self.client.request(method, url).headers(headers))
    }

    /// Build an authenticated request and apply call options
    ///
    /// Failures are logged the same way [`LarkClient::execute`] logs them.
    pub async fn request_with(
        &self,
        method: reqwest::Method,
        path: &str,
        options: Option<&RequestOptions>,
    ) -> LarkResult<RequestBuilder> {
        let result = self.build_request(method, path, options).await;
        if let Err(e) = &result {
            error!("Lark API call failed: {}", e);
        }
        result
    }

    /// Execute a request and return the envelope's `data`
    ///
    /// Failures are logged here and then returned to the caller.
    pub async fn execute<T>(&self, request: RequestBuilder) -> LarkResult<T>
    where
        T: DeserializeOwned,
    {
        let result = self.send(request).await;
        if let Err(e) = &result {
            error!("Lark API call failed: {}", e);
        }
        result
    }

    /// Execute a request and return raw bytes
    pub async fn execute_bytes(&self, request: RequestBuilder) -> LarkResult<bytes::Bytes> {
        let result = self.download(request).await;
        if let Err(e) = &result {
            error!("Lark download failed: {}", e);
        }
        result
    }

    /// Fetch one page of a paginated endpoint
    ///
    /// Errors are returned but not logged; the iteration session reports them.
    pub async fn fetch_page(
        &self,
        page: &PageRequest,
        cursor: Option<String>,
    ) -> LarkResult<Value> {
        debug!(
            "HTTP {} {} with page_token={:?}",
            page.method, page.path, cursor
        );
        let mut req = self
            .build_request(page.method.clone(), &page.path, Some(&page.options))
            .await?;
        if !page.query.is_empty() {
            req = req.query(&page.query);
        }
        req = Self::with_page_token(req, cursor.as_deref());
        if let Some(body) = &page.body {
            req = req.json(body);
        }

        self.send(req).await
    }

    /// Turn a paginated endpoint into a lazy page iterator
    pub fn paginate<T>(&self, page: PageRequest, config: PaginationConfig) -> PageIterator<'_, T>
    where
        T: DeserializeOwned,
    {
        PageIterator::new(
            move |cursor| {
                let page = page.clone();
                async move { self.fetch_page(&page, cursor).await }
            },
            config,
        )
    }

    /// Add the continuation token to a request
    pub fn with_page_token(request: RequestBuilder, page_token: Option<&str>) -> RequestBuilder {
        match page_token {
            Some(token) => request.query(&[(CURSOR_PARAM, token)]),
            None => request,
        }
    }

    async fn build_request(
        &self,
        method: reqwest::Method,
        path: &str,
        options: Option<&RequestOptions>,
    ) -> LarkResult<RequestBuilder> {
        let request = self.request(method, path).await?;
        match options {
            Some(options) => options.apply(request),
            None => Ok(request),
        }
    }

    async fn send<T>(&self, request: RequestBuilder) -> LarkResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        self.handle_response(response).await
    }

    async fn download(&self, request: RequestBuilder) -> LarkResult<bytes::Bytes> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.bytes().await?)
        } else {
            Err(Self::error_from_response(status, response).await)
        }
    }

    /// Unwrap the `{code, msg, data}` envelope
    async fn handle_response<T>(&self, response: Response) -> LarkResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        if !status.is_success() {
            return Err(Self::error_from_response(status, response).await);
        }

        let body = response.bytes().await?;
        let envelope: ApiEnvelope = serde_json::from_slice(&body)?;
        if envelope.code != 0 {
            let message = envelope
                .msg
                .unwrap_or_else(|| format!("code {}", envelope.code));
            return Err(LarkError::api_error(status.as_u16(), envelope.code, message));
        }

        Ok(serde_json::from_value(envelope.data.unwrap_or(Value::Null))?)
    }

    /// Map an error status to a typed error
    async fn error_from_response(status: StatusCode, response: Response) -> LarkError {
        let (code, message) = match response.json::<ApiEnvelope>().await {
            Ok(envelope) => (
                envelope.code,
                envelope.msg.unwrap_or_else(|| format!("HTTP {}", status)),
            ),
            Err(_) => (0, format!("HTTP {}", status)),
        };

        match status {
            StatusCode::UNAUTHORIZED => LarkError::auth_error(message),
            StatusCode::FORBIDDEN => LarkError::PermissionDenied(message),
            StatusCode::NOT_FOUND => LarkError::NotFound(message),
            StatusCode::BAD_REQUEST => LarkError::invalid_param(message),
            _ => LarkError::api_error(status.as_u16(), code, message),
        }
    }
}
