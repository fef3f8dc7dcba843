use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::model::{Id, Order};
use crate::store::traits::{OrderStore, Store};

/// In-memory order repository keyed by PO number.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    orders: RwLock<HashMap<Id, Order>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl OrderStore for InMemoryStore {
    async fn get_order(&self, id: &Id) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(id).cloned())
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn upsert_order(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id.clone(), order);
        Ok(())
    }
}

impl Store for InMemoryStore {}
