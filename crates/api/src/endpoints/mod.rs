//! One module per backend resource, one function per REST call.
//!
//! Every function takes the shared [`ApiClient`] and a [`RequestOptions`]
//! carrying the bearer token (and keyword where the endpoint searches);
//! ids are explicit arguments. Responses are normalized into domain
//! records, so a success body the client cannot read yields empty results
//! rather than an error.

pub mod comment;
pub mod community;
pub mod dashboard;
pub mod member;
pub mod notice;
pub mod operation;
pub mod scenario;
pub mod simulation;

use std::path::Path;

use domain::models::{normalize_list, normalize_record, ImportPreview, Normalize};
use shared::validation::validate_spreadsheet_path;
use tracing::info;

use crate::client::{file_form, ApiClient, ApiRequest};
use crate::error::ApiError;

/// Options shared by every endpoint call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Bearer token; unauthenticated calls leave it empty.
    pub token: Option<String>,
    /// Search keyword for list endpoints that accept one.
    pub keyword: Option<String>,
}

impl RequestOptions {
    pub fn authorized(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            keyword: None,
        }
    }

    pub fn with_keyword(mut self, keyword: Option<&str>) -> Self {
        self.keyword = keyword.map(str::to_string);
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Applies the token to `request`.
    pub(crate) fn apply(&self, request: ApiRequest) -> ApiRequest {
        request.bearer(self.token())
    }

    /// Applies the token and the `keyword` query to `request`.
    pub(crate) fn apply_search(&self, request: ApiRequest) -> ApiRequest {
        self.apply(request).query("keyword", self.keyword())
    }
}

pub(crate) async fn fetch_list<T: Normalize>(
    client: &ApiClient,
    request: ApiRequest,
) -> Result<Vec<T>, ApiError> {
    let body = client.send(request).await?;
    Ok(normalize_list(body.as_ref()))
}

pub(crate) async fn fetch_record<T: Normalize>(
    client: &ApiClient,
    request: ApiRequest,
) -> Result<Option<T>, ApiError> {
    let body = client.send(request).await?;
    Ok(normalize_record(body.as_ref()))
}

/// Issues a request whose response body is irrelevant (deletes).
pub(crate) async fn execute(client: &ApiClient, request: ApiRequest) -> Result<(), ApiError> {
    client.send(request).await.map(|_| ())
}

/// Uploads a workbook to a bulk-import endpoint and reads the preview.
pub(crate) async fn import_file(
    client: &ApiClient,
    options: &RequestOptions,
    route: &str,
    path: &Path,
) -> Result<ImportPreview, ApiError> {
    validate_spreadsheet_path(path)?;
    let form = file_form(path).await?;

    let body = client
        .send(options.apply(ApiRequest::post(route)).multipart(form))
        .await?;
    let preview: ImportPreview = body
        .as_ref()
        .and_then(ImportPreview::normalize)
        .unwrap_or_default();

    info!(
        route = %route,
        file = %path.display(),
        rows = preview.rows.len(),
        errors = preview.errors.len(),
        "Workbook parsed by backend"
    );
    Ok(preview)
}
