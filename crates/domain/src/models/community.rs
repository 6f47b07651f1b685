//! Community board models: posts and their comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::lenient::{pick_i64, pick_string};
use validator::Validate;

use super::{pick_time, Normalize};

const AUTHOR: [&str; 5] = ["author", "writer", "memberName", "member.name", "createdBy"];
const CREATED_AT: [&str; 4] = ["createdAt", "created_at", "regDate", "createdDate"];

/// A community board post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub comment_count: i64,
}

impl Normalize for Post {
    fn normalize(value: &Value) -> Option<Self> {
        let id = pick_string(value, &["id", "communityId", "community_id", "postId"])?;

        Some(Self {
            id,
            title: pick_string(value, &["title", "subject"]).unwrap_or_default(),
            content: pick_string(value, &["content", "body", "text"]).unwrap_or_default(),
            author: pick_string(value, &AUTHOR),
            created_at: pick_time(value, &CREATED_AT),
            view_count: pick_i64(value, &["viewCount", "view_count", "views", "hits"])
                .unwrap_or(0),
            comment_count: pick_i64(value, &["commentCount", "comment_count", "comments"])
                .unwrap_or(0),
        })
    }
}

/// A comment under a community post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub community_id: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Normalize for Comment {
    fn normalize(value: &Value) -> Option<Self> {
        let id = pick_string(value, &["id", "commentId", "comment_id"])?;

        Some(Self {
            id,
            community_id: pick_string(value, &["communityId", "community_id", "community.id"]),
            content: pick_string(value, &["content", "body", "text"]).unwrap_or_default(),
            author: pick_string(value, &AUTHOR),
            created_at: pick_time(value, &CREATED_AT),
        })
    }
}

/// Number of comments under a post, as served by `.../comment-count`.
///
/// The endpoint answers with either a bare number or `{ "count": n }`.
pub fn comment_count_from(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(|n| n.trunc() as i64).unwrap_or(0),
        Some(other) => pick_i64(other, &["count", "commentCount", "data"]).unwrap_or(0),
        None => 0,
    }
}

/// Post create/update payload.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct PostPayload {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[validate(length(max = 10000, message = "Content must be at most 10000 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub content: String,
}

/// Comment create/update payload.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CommentPayload {
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub content: String,
}
