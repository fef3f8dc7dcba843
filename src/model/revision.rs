use serde::{Deserialize, Serialize};

use crate::model::{generate_id, now_iso, FileRef, Id};

/// One uploaded source-document version in an order's file history.
/// Revisions form a parent-pointer chain; only linear chains are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: Id,
    #[serde(default)]
    pub parent_id: Option<Id>,
    pub created_at: String,
    pub created_by: String,
    pub message: String,
    pub file: FileRef,
}

impl Revision {
    pub fn new(
        parent_id: Option<Id>,
        created_by: impl Into<String>,
        message: impl Into<String>,
        file: FileRef,
    ) -> Self {
        Self {
            id: generate_id(),
            parent_id,
            created_at: now_iso(),
            created_by: created_by.into(),
            message: message.into(),
            file,
        }
    }
}
