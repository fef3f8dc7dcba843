use crate::model::{Id, Order};
use anyhow::Result;

/// Repository boundary for the order graph. Implementations persist whole
/// aggregates keyed by PO number; each call is atomic on its own, and
/// callers serialize read-modify-write sequences per order id (single
/// writer per order).
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_order(&self, id: &Id) -> Result<Option<Order>>;
    async fn list_orders(&self) -> Result<Vec<Order>>;
    async fn upsert_order(&self, order: Order) -> Result<()>;
}

pub trait Store: OrderStore + Send + Sync {}
