use serde::{Deserialize, Serialize};

use crate::model::{generate_id, now_iso, ChangeSet, Id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeRequestStatus {
    /// Awaiting an admin decision.
    Open,
    /// Approved; a commit with the proposed changes landed on the target
    /// branch.
    Merged,
    /// Declined; no side effect.
    Closed,
}

/// A proposed, not-yet-applied set of changes. Stations open these; an admin
/// merges or closes them. Transitions exactly once out of `open`, then the
/// request is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub id: Id,
    pub title: String,
    pub author: String,
    pub created_at: String,
    pub status: ChangeRequestStatus,
    pub target_branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub proposed: ChangeSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_by: Option<String>,
}

impl ChangeRequest {
    /// A fresh request targeting the default branch.
    pub fn open(
        title: impl Into<String>,
        author: impl Into<String>,
        message: Option<String>,
        proposed: ChangeSet,
    ) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            author: author.into(),
            created_at: now_iso(),
            status: ChangeRequestStatus::Open,
            target_branch: "main".to_string(),
            message,
            proposed,
            merged_at: None,
            merged_by: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ChangeRequestStatus::Open
    }
}

/// Input model for opening a change request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChangeRequest {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub proposed: ChangeSet,
}
