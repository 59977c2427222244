//! Order id → where the order rests.
//!
//! The index is a lookup relation, not an owner of aggregates: it records the
//! price (to find the level) and the size recorded for the order (to decide
//! whether a reduction consumes it).

use ahash::AHashMap;

use crate::types::RestingOrder;

/// Map from order id to its resting price and recorded size.
#[derive(Debug, Clone, Default)]
pub struct OrderIndex {
    orders: AHashMap<u64, RestingOrder>,
}

impl OrderIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an order, replacing any prior entry for the same id.
    #[inline]
    pub fn insert(&mut self, order_id: u64, order: RestingOrder) -> Option<RestingOrder> {
        self.orders.insert(order_id, order)
    }

    /// Look up an order.
    #[inline]
    pub fn get(&self, order_id: u64) -> Option<RestingOrder> {
        self.orders.get(&order_id).copied()
    }

    /// Overwrite the recorded size of an existing order.
    #[inline]
    pub fn set_size(&mut self, order_id: u64, size: u64) {
        if let Some(order) = self.orders.get_mut(&order_id) {
            order.size = size;
        }
    }

    /// Forget an order.
    #[inline]
    pub fn remove(&mut self, order_id: u64) -> Option<RestingOrder> {
        self.orders.remove(&order_id)
    }

    /// Whether the id is currently resting.
    #[inline]
    pub fn contains(&self, order_id: u64) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Number of resting orders.
    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// No resting orders.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Forget every order.
    pub fn clear(&mut self) {
        self.orders.clear();
    }
}
