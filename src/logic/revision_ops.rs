use anyhow::Result;

use crate::logic::error::OpError;
use crate::model::{ChangeSet, Commit, FileRef, Id, Order, Revision};
use crate::store::OrderStore;

/// The file-revision ledger. Adding or switching a revision also records a
/// commit on the default branch so that rollback can rewind which revision
/// is current.
pub struct RevisionOperations;

impl RevisionOperations {
    /// Create a new revision chained onto the current head revision and make
    /// it the default. Errors if the order does not exist — there is nothing
    /// to attach the revision to.
    pub async fn add_revision<S: OrderStore>(
        store: &S,
        order_id: &Id,
        file: FileRef,
        author: &str,
        message: Option<String>,
    ) -> Result<Id> {
        let Some(mut order) = store.get_order(order_id).await? else {
            return Err(OpError::OrderNotFound(order_id.clone()).into());
        };
        let parent_id = order.revisions.first().map(|r| r.id.clone());
        let revision = Revision::new(
            parent_id,
            author,
            message.unwrap_or_else(|| format!("Upload {}", file.name)),
            file.clone(),
        );
        let revision_id = revision.id.clone();
        order.revisions.insert(0, revision);

        Self::point_default_revision(
            &mut order,
            &revision_id,
            author,
            format!("File revision: {}", file.name),
        );
        store.upsert_order(order).await?;
        Ok(revision_id)
    }

    /// Switch the current revision to an existing one. No-op if the order or
    /// the revision is unknown.
    pub async fn set_default_revision<S: OrderStore>(
        store: &S,
        order_id: &Id,
        revision_id: &str,
        author: &str,
    ) -> Result<bool> {
        let Some(mut order) = store.get_order(order_id).await? else {
            return Ok(false);
        };
        if order.revision(revision_id).is_none() {
            return Ok(false);
        }
        Self::point_default_revision(
            &mut order,
            revision_id,
            author,
            "Switch default revision".to_string(),
        );
        store.upsert_order(order).await?;
        Ok(true)
    }

    /// Record the revision switch as a commit on the default branch, then
    /// assign the pointer.
    fn point_default_revision(order: &mut Order, revision_id: &str, author: &str, message: String) {
        let commit = Commit::new(
            author,
            None,
            message,
            ChangeSet {
                default_revision_id: Some(revision_id.to_string()),
                ..Default::default()
            },
        );
        let default_branch = order.default_branch.clone();
        if let Some(branch) = order.branch_mut(&default_branch) {
            branch.prepend(commit);
        }
        order.default_revision_id = revision_id.to_string();
    }
}
