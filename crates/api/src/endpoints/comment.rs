//! Comments under a community post.

use domain::models::{Comment, CommentPayload};
use validator::Validate;

use super::{execute, fetch_list, fetch_record, RequestOptions};
use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;

const COMMENTS: &str = "/api/comment/{communityId}";
const COMMENT: &str = "/api/comment/{communityId}/{commentId}";

pub async fn list_comments(
    client: &ApiClient,
    options: &RequestOptions,
    community_id: &str,
) -> Result<Vec<Comment>, ApiError> {
    let request = ApiRequest::get(COMMENTS).param("communityId", community_id);
    fetch_list(client, options.apply(request)).await
}

pub async fn create_comment(
    client: &ApiClient,
    options: &RequestOptions,
    community_id: &str,
    payload: &CommentPayload,
) -> Result<Option<Comment>, ApiError> {
    payload.validate()?;
    let request = ApiRequest::post(COMMENTS).param("communityId", community_id);
    fetch_record(client, options.apply(request).json(payload)?).await
}

pub async fn update_comment(
    client: &ApiClient,
    options: &RequestOptions,
    community_id: &str,
    comment_id: &str,
    payload: &CommentPayload,
) -> Result<Option<Comment>, ApiError> {
    payload.validate()?;
    let request = ApiRequest::put(COMMENT)
        .param("communityId", community_id)
        .param("commentId", comment_id);
    fetch_record(client, options.apply(request).json(payload)?).await
}

pub async fn delete_comment(
    client: &ApiClient,
    options: &RequestOptions,
    community_id: &str,
    comment_id: &str,
) -> Result<(), ApiError> {
    let request = ApiRequest::delete(COMMENT)
        .param("communityId", community_id)
        .param("commentId", comment_id);
    execute(client, options.apply(request)).await
}
