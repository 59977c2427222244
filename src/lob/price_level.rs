//! Aggregated price level.
//!
//! A `PriceLevel` carries only the aggregate of the orders attributed to one
//! price on one side: total resting size and number of resting orders.
//! Individual order sizes live in the order index, not here.
//!
//! # Invariant
//!
//! A level held by a ladder is never depleted under the ladder's
//! [`LevelRemovalPolicy`]: the ladder drops it in the same mutation that
//! depletes it.
//!
//! # Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | `add_order` | O(1) |
//! | `reduce` | O(1) |
//! | `size` / `count` | O(1) |

use serde::{Deserialize, Serialize};

/// When a level is considered gone after a reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelRemovalPolicy {
    /// Remove as soon as size OR count reaches zero (default)
    #[default]
    EitherDepleted,

    /// Remove only once size AND count are both zero
    BothDepleted,
}

/// A price level in the book with aggregate size and order count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    size: u64,
    count: u64,
}

impl PriceLevel {
    /// Create a new empty price level.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a level from raw parts.
    #[inline]
    pub fn from_parts(size: u64, count: u64) -> Self {
        Self { size, count }
    }

    /// Attribute one more resting order of `size` to this level.
    #[inline]
    pub fn add_order(&mut self, size: u64) {
        self.size = self.size.saturating_add(size);
        self.count = self.count.saturating_add(1);
    }

    /// Remove `delta` from the aggregate size, and one order from the count
    /// when `removes_order` is set.
    ///
    /// Size saturates at zero and the count never drops below zero. An
    /// over-subtraction therefore leaves a zero-size level, which the ladder
    /// drops, rather than a wrapped size that would stay on the book.
    #[inline]
    pub fn reduce(&mut self, delta: u64, removes_order: bool) {
        self.size = self.size.saturating_sub(delta);
        if removes_order && self.count > 0 {
            self.count -= 1;
        }
    }

    /// Aggregate resting size.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of resting orders.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether the level should leave the ladder under `policy`.
    #[inline]
    pub fn is_depleted(&self, policy: LevelRemovalPolicy) -> bool {
        match policy {
            LevelRemovalPolicy::EitherDepleted => self.size == 0 || self.count == 0,
            LevelRemovalPolicy::BothDepleted => self.size == 0 && self.count == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_price_level_is_empty() {
        let level = PriceLevel::new();
        assert_eq!(level.size(), 0);
        assert_eq!(level.count(), 0);
        assert!(level.is_depleted(LevelRemovalPolicy::EitherDepleted));
        assert!(level.is_depleted(LevelRemovalPolicy::BothDepleted));
    }

    #[test]
    fn test_add_multiple_orders() {
        let mut level = PriceLevel::new();
        level.add_order(100);
        level.add_order(50);
        assert_eq!(level.size(), 150);
        assert_eq!(level.count(), 2);
    }

    #[test]
    fn test_partial_reduce_keeps_count() {
        let mut level = PriceLevel::from_parts(100, 1);
        level.reduce(30, false);
        assert_eq!(level.size(), 70);
        assert_eq!(level.count(), 1);
        assert!(!level.is_depleted(LevelRemovalPolicy::EitherDepleted));
    }

    #[test]
    fn test_full_reduce_drops_count() {
        let mut level = PriceLevel::from_parts(150, 2);
        level.reduce(100, true);
        assert_eq!(level.size(), 50);
        assert_eq!(level.count(), 1);
    }

    #[test]
    fn test_reduce_saturates() {
        let mut level = PriceLevel::from_parts(70, 0);
        level.reduce(100, true);
        assert_eq!(level.size(), 0);
        assert_eq!(level.count(), 0);
    }

    #[test]
    fn test_removal_policies_differ_on_half_depleted_level() {
        // zero size with an order still counted
        let level = PriceLevel::from_parts(0, 1);
        assert!(level.is_depleted(LevelRemovalPolicy::EitherDepleted));
        assert!(!level.is_depleted(LevelRemovalPolicy::BothDepleted));

        // residual size with no orders counted
        let level = PriceLevel::from_parts(20, 0);
        assert!(level.is_depleted(LevelRemovalPolicy::EitherDepleted));
        assert!(!level.is_depleted(LevelRemovalPolicy::BothDepleted));
    }

    #[test]
    fn test_overflow_protection() {
        let mut level = PriceLevel::from_parts(u64::MAX, 1);
        level.add_order(1);
        assert_eq!(level.size(), u64::MAX);
        assert_eq!(level.count(), 2);
    }
}
