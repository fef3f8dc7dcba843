use anyhow::Result;

use crate::model::{Commit, Id, NewCommit};
use crate::store::OrderStore;

/// Branch-level operations: create/delete/set-default, direct commits, and
/// rollback. Lookup misses are silent no-ops (`Ok(false)` / `Ok(None)`).
pub struct BranchOperations;

impl BranchOperations {
    /// Snapshot `from`'s head and full commit list into a new branch.
    /// No-op if the name is already taken.
    pub async fn create_branch<S: OrderStore>(
        store: &S,
        order_id: &Id,
        name: &str,
        from: &str,
    ) -> Result<bool> {
        let Some(mut order) = store.get_order(order_id).await? else {
            return Ok(false);
        };
        if order.branch(name).is_some() {
            return Ok(false);
        }
        let Some(base) = order.branch(from).or_else(|| order.branches.first()) else {
            return Ok(false);
        };
        let branch = base.forked_as(name);
        order.branches.push(branch);
        store.upsert_order(order).await?;
        Ok(true)
    }

    /// Point `default_branch` at `name` and re-flag `is_default` by name
    /// match. If no branch matches, none ends up flagged; the name is still
    /// recorded as given.
    pub async fn set_default_branch<S: OrderStore>(
        store: &S,
        order_id: &Id,
        name: &str,
    ) -> Result<bool> {
        let Some(mut order) = store.get_order(order_id).await? else {
            return Ok(false);
        };
        order.default_branch = name.to_string();
        for branch in order.branches.iter_mut() {
            branch.is_default = branch.name == name;
        }
        store.upsert_order(order).await?;
        Ok(true)
    }

    /// The default branch cannot be deleted.
    pub async fn delete_branch<S: OrderStore>(
        store: &S,
        order_id: &Id,
        name: &str,
    ) -> Result<bool> {
        let Some(mut order) = store.get_order(order_id).await? else {
            return Ok(false);
        };
        if name == order.default_branch || order.branch(name).is_none() {
            return Ok(false);
        }
        order.branches.retain(|b| b.name != name);
        store.upsert_order(order).await?;
        Ok(true)
    }

    /// Append a commit to the named branch and fold its changes into the
    /// working snapshot. The snapshot is updated on every commit call
    /// regardless of which branch received it; in practice callers commit
    /// to the default branch.
    pub async fn commit<S: OrderStore>(
        store: &S,
        order_id: &Id,
        branch_name: &str,
        input: NewCommit,
    ) -> Result<Option<Commit>> {
        let Some(mut order) = store.get_order(order_id).await? else {
            return Ok(None);
        };
        let commit = Commit::new(input.author, input.station, input.message, input.changes);
        let Some(branch) = order.branch_mut(branch_name) else {
            return Ok(None);
        };
        branch.prepend(commit.clone());

        commit.changes.apply_to(&mut order);
        store.upsert_order(order).await?;
        Ok(Some(commit))
    }

    /// Discard every commit strictly newer than `commit_id` on the branch
    /// and rebuild the working snapshot by replaying the retained commits
    /// oldest to newest.
    ///
    /// The replay baseline clears badges/fields/materials and resets the
    /// default revision to the initial upload; per-station progress, stage
    /// states and cycles are retained unless a replayed commit overwrites
    /// them.
    pub async fn rollback<S: OrderStore>(
        store: &S,
        order_id: &Id,
        branch_name: &str,
        commit_id: &str,
    ) -> Result<bool> {
        let Some(mut order) = store.get_order(order_id).await? else {
            return Ok(false);
        };
        let Some(branch) = order.branch_mut(branch_name) else {
            return Ok(false);
        };
        let Some(idx) = branch.position_of(commit_id) else {
            return Ok(false);
        };
        branch.commits.drain(..idx);
        branch.head = branch.commits[0].id.clone();
        let retained = branch.commits.clone();

        let mut snapshot = order.clone();
        snapshot.badges.clear();
        snapshot.fields.clear();
        snapshot.materials.clear();
        if let Some(initial_id) = snapshot.initial_revision().map(|r| r.id.clone()) {
            snapshot.default_revision_id = initial_id;
        }
        for commit in retained.iter().rev() {
            commit.changes.apply_to(&mut snapshot);
        }

        store.upsert_order(snapshot).await?;
        Ok(true)
    }
}
