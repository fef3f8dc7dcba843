use anyhow::Result;

use crate::model::{
    now_iso, ChangeRequest, ChangeRequestStatus, Commit, Id, NewChangeRequest,
};
use crate::store::OrderStore;

/// The change-request queue: stations propose metadata changes, an admin
/// merges or closes them. `open -> merged` and `open -> closed` are the
/// only transitions; both are terminal.
pub struct ChangeRequestOperations;

impl ChangeRequestOperations {
    /// Prepend a fresh request targeting the default branch. Returns `None`
    /// when the order does not exist.
    pub async fn open<S: OrderStore>(
        store: &S,
        order_id: &Id,
        input: NewChangeRequest,
    ) -> Result<Option<Id>> {
        let Some(mut order) = store.get_order(order_id).await? else {
            return Ok(None);
        };
        let request = ChangeRequest::open(input.title, input.author, input.message, input.proposed);
        let id = request.id.clone();
        order.prs.insert(0, request);
        store.upsert_order(order).await?;
        Ok(Some(id))
    }

    /// Approve: manufacture a commit with the proposed changes on the target
    /// branch, fold it into the working snapshot, and stamp the request.
    /// No-op unless the request exists and is open.
    pub async fn merge<S: OrderStore>(
        store: &S,
        order_id: &Id,
        request_id: &str,
        admin: &str,
    ) -> Result<bool> {
        let Some(mut order) = store.get_order(order_id).await? else {
            return Ok(false);
        };
        let Some(pos) = order
            .prs
            .iter()
            .position(|p| p.id == request_id && p.is_open())
        else {
            return Ok(false);
        };

        let title = order.prs[pos].title.clone();
        let proposed = order.prs[pos].proposed.clone();
        let target = order.prs[pos].target_branch.clone();
        let commit = Commit::new(
            admin,
            None,
            format!("Merge change request: {title}"),
            proposed.clone(),
        );
        let Some(branch) = order.branch_mut(&target) else {
            return Ok(false);
        };
        branch.prepend(commit);

        proposed.apply_to(&mut order);

        let request = &mut order.prs[pos];
        request.status = ChangeRequestStatus::Merged;
        request.merged_at = Some(now_iso());
        request.merged_by = Some(admin.to_string());

        store.upsert_order(order).await?;
        Ok(true)
    }

    /// Decline: terminal, no snapshot mutation. No-op unless open.
    pub async fn close<S: OrderStore>(store: &S, order_id: &Id, request_id: &str) -> Result<bool> {
        let Some(mut order) = store.get_order(order_id).await? else {
            return Ok(false);
        };
        let Some(request) = order
            .prs
            .iter_mut()
            .find(|p| p.id == request_id && p.is_open())
        else {
            return Ok(false);
        };
        request.status = ChangeRequestStatus::Closed;
        store.upsert_order(order).await?;
        Ok(true)
    }
}
