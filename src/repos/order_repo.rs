/*
 * Responsibility
 * - In-memory order store (demo fixture data, no persistence)
 * - Totals are kept as integer cents
 */
use std::sync::{Arc, RwLock};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub id: String,
    pub total_cents: u64,
}

#[derive(Debug, Clone, Default)]
pub struct OrderRepo {
    orders: Arc<RwLock<Vec<OrderRow>>>,
}

impl OrderRepo {
    pub fn new(orders: Vec<OrderRow>) -> Self {
        Self {
            orders: Arc::new(RwLock::new(orders)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(vec![
            OrderRow {
                id: "A100".to_string(),
                total_cents: 4250,
            },
            OrderRow {
                id: "B200".to_string(),
                total_cents: 1337,
            },
        ])
    }

    pub fn list(&self) -> Result<Vec<OrderRow>, RepoError> {
        let orders = self.orders.read().map_err(|_| RepoError::Poisoned)?;
        Ok(orders.clone())
    }

    /// Append an order. Ids continue the `X001`, `X002`, ... sequence from the current length.
    pub fn create(&self, total_cents: u64) -> Result<OrderRow, RepoError> {
        let mut orders = self.orders.write().map_err(|_| RepoError::Poisoned)?;

        let row = OrderRow {
            id: format!("X{:03}", orders.len() + 1),
            total_cents,
        };
        orders.push(row.clone());

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_lists_fixture_orders() {
        let repo = OrderRepo::seeded();
        let ids: Vec<_> = repo.list().unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, ["A100", "B200"]);
    }

    #[test]
    fn create_appends_with_sequential_id() {
        let repo = OrderRepo::seeded();

        let first = repo.create(999).unwrap();
        let second = repo.create(100).unwrap();

        assert_eq!(first.id, "X003");
        assert_eq!(second.id, "X004");
        assert_eq!(repo.list().unwrap().len(), 4);
    }

    #[test]
    fn clones_share_the_same_store() {
        let repo = OrderRepo::seeded();
        let clone = repo.clone();

        clone.create(999).unwrap();
        assert_eq!(repo.list().unwrap().len(), 3);
    }
}
