//! HTTP client core shared by every endpoint module.
//!
//! Each call is one stateless request/response: no retry, no backoff.
//! A non-success status becomes [`ApiError::Status`] carrying the
//! backend's `message` (or the Korean fallback); a success whose body is
//! not JSON resolves to `None`.

use std::path::Path;
use std::time::Instant;

use metrics::{counter, histogram};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde_json::Value;
use shared::lenient::error_message;
use shared::validation::validate_path_id;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::{ApiError, FALLBACK_ERROR_MESSAGE};

/// Header carrying a per-request id for correlating client and server logs.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Multipart field name the backend reads uploads from.
pub const UPLOAD_FIELD: &str = "file";

enum Body {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// One backend call.
///
/// The route is a template such as `/api/notice/{id}`; it labels metrics
/// and logs, while [`ApiRequest::param`] fills the placeholders for the URL.
pub struct ApiRequest {
    method: Method,
    route: String,
    params: Vec<(&'static str, String)>,
    query: Vec<(&'static str, String)>,
    token: Option<String>,
    body: Body,
}

impl ApiRequest {
    pub fn new(method: Method, route: impl Into<String>) -> Self {
        Self {
            method,
            route: route.into(),
            params: Vec::new(),
            query: Vec::new(),
            token: None,
            body: Body::Empty,
        }
    }

    pub fn get(route: impl Into<String>) -> Self {
        Self::new(Method::GET, route)
    }

    pub fn post(route: impl Into<String>) -> Self {
        Self::new(Method::POST, route)
    }

    pub fn put(route: impl Into<String>) -> Self {
        Self::new(Method::PUT, route)
    }

    pub fn delete(route: impl Into<String>) -> Self {
        Self::new(Method::DELETE, route)
    }

    /// Fills the `{name}` placeholder of the route.
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    /// Adds a query pair; `None` and blank values are skipped.
    pub fn query(mut self, name: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.query.push((name, value.to_string()));
        }
        self
    }

    /// Attaches `Authorization: Bearer <token>` when a token is given.
    pub fn bearer(mut self, token: Option<&str>) -> Self {
        self.token = token.filter(|t| !t.is_empty()).map(str::to_string);
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Body::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Body::Multipart(form);
        self
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Concrete path with every placeholder filled.
    ///
    /// Ids are validated before they are spliced into the URL.
    pub fn path(&self) -> Result<String, ApiError> {
        let mut path = self.route.clone();
        for (name, value) in &self.params {
            validate_path_id(value)?;
            path = path.replace(&format!("{{{}}}", name), value);
        }

        if path.contains('{') {
            return Err(ApiError::Validation(format!(
                "missing path parameter in {}",
                self.route
            )));
        }
        Ok(path)
    }
}

/// Builds a multipart form holding one file under [`UPLOAD_FIELD`].
pub async fn file_form(path: &Path) -> Result<Form, ApiError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| UPLOAD_FIELD.to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.as_ref())?;
    Ok(Form::new().part(UPLOAD_FIELD, part))
}

/// Backend client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    cancel: Option<CancellationToken>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cancel: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A client whose requests abort with [`ApiError::Cancelled`] once
    /// `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    /// Issues the request and parses the JSON body.
    ///
    /// Returns `Ok(None)` for an empty or non-JSON success body.
    pub async fn send(&self, request: ApiRequest) -> Result<Option<Value>, ApiError> {
        let bytes = self.send_raw(request).await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!(error = %e, "Success body is not JSON; treating as empty");
                Ok(None)
            }
        }
    }

    /// Issues the request and returns the raw success body (downloads).
    pub async fn send_bytes(&self, request: ApiRequest) -> Result<Vec<u8>, ApiError> {
        self.send_raw(request).await
    }

    async fn send_raw(&self, request: ApiRequest) -> Result<Vec<u8>, ApiError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(ApiError::Cancelled),
            Some(token) => {
                let route = request.route.clone();
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!(route = %route, "Request cancelled by its view");
                        Err(ApiError::Cancelled)
                    }
                    result = self.execute(request) => result,
                }
            }
            None => self.execute(request).await,
        }
    }

    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, ApiError> {
        let path = request.path()?;
        let url = format!("{}{}", self.base_url, path);
        let method_label = request.method.as_str().to_string();
        let route = request.route.clone();
        let request_id = Uuid::new_v4().to_string();

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(REQUEST_ID_HEADER, &request_id);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(form) => builder.multipart(form),
        };

        debug!(method = %method_label, route = %route, request_id = %request_id, "Sending request");

        let start = Instant::now();
        let outcome = builder.send().await;
        let status_label = match &outcome {
            Ok(response) => response.status().as_u16().to_string(),
            Err(_) => "error".to_string(),
        };
        record_request(&method_label, &route, &status_label, start);

        let response = outcome.map_err(|e| {
            warn!(method = %method_label, route = %route, error = %e, "Request failed");
            ApiError::Transport(e)
        })?;

        read_response(response, &method_label, &route).await
    }
}

fn record_request(method: &str, route: &str, status: &str, start: Instant) {
    counter!(
        "api_requests_total",
        "method" => method.to_string(),
        "path" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "api_request_duration_seconds",
        "method" => method.to_string(),
        "path" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

async fn read_response(response: Response, method: &str, route: &str) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return Ok(bytes.to_vec());
    }

    let message = serde_json::from_slice::<Value>(&bytes)
        .ok()
        .and_then(|body| error_message(&body))
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());

    warn!(
        method = %method,
        route = %route,
        status = status.as_u16(),
        message = %message,
        "Backend returned an error status"
    );

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
