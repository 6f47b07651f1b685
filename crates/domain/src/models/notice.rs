//! Notice models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::lenient::{list_items, lookup, pick_bool, pick_i64, pick_string};
use validator::Validate;

use super::{pick_time, Normalize};

/// File attached to a notice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: Option<String>,
    pub file_name: String,
    pub size_bytes: Option<i64>,
}

impl Normalize for Attachment {
    fn normalize(value: &Value) -> Option<Self> {
        if let Value::String(name) = value {
            return Some(Self {
                file_name: name.clone(),
                ..Default::default()
            });
        }

        let file_name = pick_string(
            value,
            &["fileName", "file_name", "originalName", "originalFilename", "name"],
        )?;

        Some(Self {
            id: pick_string(value, &["id", "attachmentId", "fileId"]),
            file_name,
            size_bytes: pick_i64(value, &["size", "fileSize", "file_size"]),
        })
    }
}

/// A notice board entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub pinned: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub attachments: Vec<Attachment>,
}

impl Notice {
    /// Orders notices for display: pinned first, then newest first.
    /// Notices without a timestamp sink to the end of their block.
    pub fn sort_for_display(notices: &mut [Notice]) {
        notices.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.created_at.is_some().cmp(&a.created_at.is_some()))
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
    }
}

impl Normalize for Notice {
    fn normalize(value: &Value) -> Option<Self> {
        let id = pick_string(value, &["id", "noticeId", "notice_id"])?;

        let attachments: Vec<Attachment> = ["attachments", "files", "attachment"]
            .iter()
            .find_map(|key| lookup(value, key))
            .map(|found| match found {
                Value::Array(_) => list_items(found)
                    .iter()
                    .filter_map(Attachment::normalize)
                    .collect(),
                single => Attachment::normalize(single).into_iter().collect(),
            })
            .unwrap_or_default();

        Some(Self {
            id,
            title: pick_string(value, &["title", "subject"]).unwrap_or_default(),
            content: pick_string(value, &["content", "body"]).unwrap_or_default(),
            author: pick_string(value, &["author", "writer", "member.name", "createdBy"]),
            pinned: pick_bool(value, &["pinned", "isPinned", "is_pinned", "pin", "fixed"]),
            created_at: pick_time(value, &["createdAt", "created_at", "regDate"]),
            attachments,
        })
    }
}

/// Notice create/update payload.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NoticePayload {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub content: String,

    pub pinned: bool,
}
