use anyhow::Result;

use crate::model::{Badge, Id, NewOrder, Order, ReworkReason, Station};
use crate::store::OrderStore;

/// Order-level operations: creation, read accessors, and the direct
/// mutations that bypass the commit log (badges, redo flags).
pub struct OrderOperations;

impl OrderOperations {
    /// Create an order from a seed. Returns the existing order untouched if
    /// the PO number is already present.
    pub async fn create_order<S: OrderStore>(
        store: &S,
        seed: NewOrder,
        author: &str,
    ) -> Result<Order> {
        if let Some(existing) = store.get_order(&seed.id).await? {
            return Ok(existing);
        }
        let order = seed.into_order(author);
        store.upsert_order(order.clone()).await?;
        log::info!("created order {}", order.id);
        Ok(order)
    }

    pub async fn get_order<S: OrderStore>(store: &S, id: &Id) -> Result<Option<Order>> {
        let mut order = store.get_order(id).await?;
        if let Some(o) = order.as_mut() {
            o.normalize();
        }
        Ok(order)
    }

    pub async fn list_orders<S: OrderStore>(store: &S) -> Result<Vec<Order>> {
        let mut orders = store.list_orders().await?;
        for order in orders.iter_mut() {
            order.normalize();
        }
        Ok(orders)
    }

    /// Full replacement of the badge sequence, bypassing the commit log.
    pub async fn set_badges<S: OrderStore>(
        store: &S,
        id: &Id,
        badges: Vec<Badge>,
    ) -> Result<bool> {
        let Some(mut order) = store.get_order(id).await? else {
            return Ok(false);
        };
        order.set_badges(badges);
        store.upsert_order(order).await?;
        Ok(true)
    }

    pub async fn add_badge<S: OrderStore>(store: &S, id: &Id, badge: Badge) -> Result<bool> {
        let Some(mut order) = store.get_order(id).await? else {
            return Ok(false);
        };
        order.add_badge(badge);
        store.upsert_order(order).await?;
        Ok(true)
    }

    pub async fn remove_badge<S: OrderStore>(store: &S, id: &Id, badge: Badge) -> Result<bool> {
        let Some(mut order) = store.get_order(id).await? else {
            return Ok(false);
        };
        order.remove_badge(badge);
        store.upsert_order(order).await?;
        Ok(true)
    }

    pub async fn add_redo_flag<S: OrderStore>(
        store: &S,
        id: &Id,
        station: Station,
        reason: ReworkReason,
    ) -> Result<bool> {
        let Some(mut order) = store.get_order(id).await? else {
            return Ok(false);
        };
        order.add_redo_flag(station, reason);
        store.upsert_order(order).await?;
        Ok(true)
    }

    pub async fn clear_redo_flag<S: OrderStore>(
        store: &S,
        id: &Id,
        station: Station,
    ) -> Result<bool> {
        let Some(mut order) = store.get_order(id).await? else {
            return Ok(false);
        };
        order.clear_redo_flag(station);
        store.upsert_order(order).await?;
        Ok(true)
    }
}
