//! Community board posts.

use domain::models::community::comment_count_from;
use domain::models::{Post, PostPayload};
use validator::Validate;

use super::{execute, fetch_list, fetch_record, RequestOptions};
use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;

const POSTS: &str = "/api/community";
const POST: &str = "/api/community/{id}";
const COMMENT_COUNT: &str = "/api/community/{id}/comment-count";

pub async fn list_posts(client: &ApiClient, options: &RequestOptions) -> Result<Vec<Post>, ApiError> {
    fetch_list(client, options.apply_search(ApiRequest::get(POSTS))).await
}

pub async fn get_post(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<Option<Post>, ApiError> {
    fetch_record(client, options.apply(ApiRequest::get(POST).param("id", id))).await
}

pub async fn create_post(
    client: &ApiClient,
    options: &RequestOptions,
    payload: &PostPayload,
) -> Result<Option<Post>, ApiError> {
    payload.validate()?;
    fetch_record(client, options.apply(ApiRequest::post(POSTS)).json(payload)?).await
}

pub async fn update_post(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
    payload: &PostPayload,
) -> Result<Option<Post>, ApiError> {
    payload.validate()?;
    let request = options
        .apply(ApiRequest::put(POST).param("id", id))
        .json(payload)?;
    fetch_record(client, request).await
}

pub async fn delete_post(client: &ApiClient, options: &RequestOptions, id: &str) -> Result<(), ApiError> {
    execute(client, options.apply(ApiRequest::delete(POST).param("id", id))).await
}

/// Number of comments on a post; an unreadable body counts as zero.
pub async fn comment_count(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<i64, ApiError> {
    let body = client
        .send(options.apply(ApiRequest::get(COMMENT_COUNT).param("id", id)))
        .await?;
    Ok(comment_count_from(body.as_ref()))
}
