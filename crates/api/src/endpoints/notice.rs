//! Notice endpoints, including pinning and attachment transfer.

use std::path::Path;

use domain::models::{normalize_record, Attachment, ImportPreview, Notice, NoticePayload};
use serde_json::json;
use shared::validation::validate_attachment_size;
use tracing::info;
use validator::Validate;

use super::{execute, fetch_list, fetch_record, import_file, RequestOptions};
use crate::client::{file_form, ApiClient, ApiRequest};
use crate::error::ApiError;

const NOTICES: &str = "/api/notice";
const NOTICE: &str = "/api/notice/{id}";
const PIN: &str = "/api/notice/{id}/pin";
const PARSE_XLS: &str = "/api/notice/parse/xls";
const ATTACHMENT: &str = "/api/notice/{id}/attachment";

/// Notices in backend order; see [`Notice::sort_for_display`].
pub async fn list_notices(
    client: &ApiClient,
    options: &RequestOptions,
) -> Result<Vec<Notice>, ApiError> {
    fetch_list(client, options.apply_search(ApiRequest::get(NOTICES))).await
}

pub async fn get_notice(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<Option<Notice>, ApiError> {
    fetch_record(client, options.apply(ApiRequest::get(NOTICE).param("id", id))).await
}

pub async fn create_notice(
    client: &ApiClient,
    options: &RequestOptions,
    payload: &NoticePayload,
) -> Result<Option<Notice>, ApiError> {
    payload.validate()?;
    fetch_record(client, options.apply(ApiRequest::post(NOTICES)).json(payload)?).await
}

pub async fn update_notice(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
    payload: &NoticePayload,
) -> Result<Option<Notice>, ApiError> {
    payload.validate()?;
    let request = options
        .apply(ApiRequest::put(NOTICE).param("id", id))
        .json(payload)?;
    fetch_record(client, request).await
}

pub async fn delete_notice(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<(), ApiError> {
    execute(client, options.apply(ApiRequest::delete(NOTICE).param("id", id))).await
}

pub async fn set_pinned(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
    pinned: bool,
) -> Result<Option<Notice>, ApiError> {
    let request = options
        .apply(ApiRequest::put(PIN).param("id", id))
        .json(&json!({ "pinned": pinned }))?;
    fetch_record(client, request).await
}

pub async fn parse_notices_xls(
    client: &ApiClient,
    options: &RequestOptions,
    path: &Path,
) -> Result<ImportPreview, ApiError> {
    import_file(client, options, PARSE_XLS, path).await
}

/// Attaches a local file to a notice.
///
/// Files over the attachment limit are rejected before upload.
pub async fn upload_attachment(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
    path: &Path,
) -> Result<Option<Attachment>, ApiError> {
    let size = tokio::fs::metadata(path).await?.len();
    validate_attachment_size(size)?;

    let form = file_form(path).await?;
    let request = options
        .apply(ApiRequest::post(ATTACHMENT).param("id", id))
        .multipart(form);
    let body = client.send(request).await?;

    info!(notice = %id, file = %path.display(), bytes = size, "Attachment uploaded");
    Ok(normalize_record(body.as_ref()))
}

/// Raw bytes of a notice attachment.
pub async fn download_attachment(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<Vec<u8>, ApiError> {
    client
        .send_bytes(options.apply(ApiRequest::get(ATTACHMENT).param("id", id)))
        .await
}

/// Downloads an attachment into `dest`, returning the bytes written.
pub async fn save_attachment(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
    dest: &Path,
) -> Result<usize, ApiError> {
    let bytes = download_attachment(client, options, id).await?;
    tokio::fs::write(dest, &bytes).await?;

    info!(notice = %id, file = %dest.display(), bytes = bytes.len(), "Attachment saved");
    Ok(bytes.len())
}
