//! Member endpoints: login, member list, creation and bulk import.

use std::path::Path;

use domain::models::{ImportPreview, LoginRequest, LoginResponse, Member, MemberPayload};
use validator::Validate;

use super::{fetch_list, fetch_record, import_file, RequestOptions};
use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;

const LOGIN: &str = "/api/member/login";
const MEMBERS: &str = "/api/member";
const UPSERT: &str = "/api/member/upsert";
const PARSE_XLS: &str = "/api/member/parse/xls";

/// Exchanges credentials for a bearer token.
///
/// Resolves to `None` when the backend accepts the call but the body holds
/// no token.
pub async fn login(
    client: &ApiClient,
    credentials: &LoginRequest,
) -> Result<Option<LoginResponse>, ApiError> {
    credentials.validate()?;
    fetch_record(client, ApiRequest::post(LOGIN).json(credentials)?).await
}

pub async fn list_members(
    client: &ApiClient,
    options: &RequestOptions,
) -> Result<Vec<Member>, ApiError> {
    fetch_list(client, options.apply_search(ApiRequest::get(MEMBERS))).await
}

pub async fn create_member(
    client: &ApiClient,
    options: &RequestOptions,
    payload: &MemberPayload,
) -> Result<Option<Member>, ApiError> {
    payload.validate()?;
    fetch_record(client, options.apply(ApiRequest::post(MEMBERS)).json(payload)?).await
}

/// Creates or updates members in one batch, usually rows confirmed from
/// [`parse_members_xls`]. Every payload is validated first.
pub async fn upsert_members(
    client: &ApiClient,
    options: &RequestOptions,
    payloads: &[MemberPayload],
) -> Result<Vec<Member>, ApiError> {
    for payload in payloads {
        payload.validate()?;
    }
    fetch_list(client, options.apply(ApiRequest::post(UPSERT)).json(payloads)?).await
}

/// Uploads a member workbook for the backend to parse.
pub async fn parse_members_xls(
    client: &ApiClient,
    options: &RequestOptions,
    path: &Path,
) -> Result<ImportPreview, ApiError> {
    import_file(client, options, PARSE_XLS, path).await
}
