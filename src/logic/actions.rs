use anyhow::Result;

use crate::logic::change_request_ops::ChangeRequestOperations;
use crate::logic::error::OpError;
use crate::logic::order_ops::OrderOperations;
use crate::model::{
    ChangeSet, Id, NewChangeRequest, ReworkReason, StageCycle, StageState, Station,
};
use crate::notify::{Notifier, StationEvent};
use crate::store::OrderStore;

/// Admin intents. Each intent validates the requested stage transition
/// against the transition table, then goes through the change-request path
/// (open + approve) so the change lands on the commit log, and finally
/// broadcasts to the shop floor where the workflow calls for it.
pub struct AdminActions;

impl AdminActions {
    /// Send a station's output back for correction: append a cycle to the
    /// rework log and move the station to REWORK.
    pub async fn send_to_rework<S: OrderStore, N: Notifier>(
        store: &S,
        notifier: &N,
        order_id: &Id,
        station: Station,
        reason: ReworkReason,
        note: &str,
        admin: &str,
    ) -> Result<bool> {
        let Some(order) = OrderOperations::get_order(store, order_id).await? else {
            return Ok(false);
        };
        let current = *order.stages.get(&station).unwrap_or(&StageState::NotStarted);
        if !current.can_transition(StageState::Rework) {
            return Err(OpError::IllegalStageTransition {
                station,
                from: current,
                to: StageState::Rework,
            }
            .into());
        }

        let mut cycles = order.cycles.clone();
        cycles.push(StageCycle {
            idx: cycles.len() as u32 + 1,
            station,
            reason,
            note: (!note.is_empty()).then(|| note.to_string()),
            at: crate::model::now_iso(),
            by: admin.to_string(),
        });

        let request = NewChangeRequest {
            title: format!("{station}: rework ({})", reason.label()),
            author: admin.to_string(),
            message: (!note.is_empty()).then(|| note.to_string()),
            proposed: ChangeSet {
                stages: Some([(station, StageState::Rework)].into()),
                cycles: Some(cycles),
                ..Default::default()
            },
        };
        let Some(request_id) = ChangeRequestOperations::open(store, order_id, request).await?
        else {
            return Ok(false);
        };
        ChangeRequestOperations::merge(store, order_id, &request_id, admin).await?;

        notifier
            .broadcast(StationEvent::new(
                order_id.clone(),
                station,
                format!("{} ({}) — rework requested ({})", order.title, order_id, reason.label()),
            ))
            .await;
        Ok(true)
    }

    /// Move a station to `next` through the change-request path. Broadcasts
    /// when a station completes.
    pub async fn apply_stage<S: OrderStore, N: Notifier>(
        store: &S,
        notifier: &N,
        order_id: &Id,
        station: Station,
        next: StageState,
        note: &str,
        admin: &str,
    ) -> Result<bool> {
        let Some(order) = OrderOperations::get_order(store, order_id).await? else {
            return Ok(false);
        };
        let current = *order.stages.get(&station).unwrap_or(&StageState::NotStarted);
        if !current.can_transition(next) {
            return Err(OpError::IllegalStageTransition {
                station,
                from: current,
                to: next,
            }
            .into());
        }

        let request = NewChangeRequest {
            title: format!("{station} → {next}"),
            author: admin.to_string(),
            message: (!note.is_empty()).then(|| note.to_string()),
            proposed: ChangeSet {
                stages: Some([(station, next)].into()),
                ..Default::default()
            },
        };
        let Some(request_id) = ChangeRequestOperations::open(store, order_id, request).await?
        else {
            return Ok(false);
        };
        ChangeRequestOperations::merge(store, order_id, &request_id, admin).await?;

        if next == StageState::Completed {
            notifier
                .broadcast(StationEvent::new(
                    order_id.clone(),
                    station,
                    format!("{} ({}) — station completed", order.title, order_id),
                ))
                .await;
        }
        Ok(true)
    }

    /// Assign the loading day through the change-request path.
    pub async fn set_loading_date<S: OrderStore>(
        store: &S,
        order_id: &Id,
        date_iso: &str,
        admin: &str,
    ) -> Result<bool> {
        let request = NewChangeRequest {
            title: "Loading day assignment".to_string(),
            author: admin.to_string(),
            message: None,
            proposed: ChangeSet {
                loading_date: Some(date_iso.to_string()),
                ..Default::default()
            },
        };
        let Some(request_id) = ChangeRequestOperations::open(store, order_id, request).await?
        else {
            return Ok(false);
        };
        ChangeRequestOperations::merge(store, order_id, &request_id, admin).await
    }
}
