//! Transport priority levels.

use serde::{Deserialize, Serialize};

/// Priority of a message in a channel's sending queue.
///
/// Delivery order respects `High > Medium > Low`, FIFO within a level.
/// Overflow eviction removes from the lowest non-empty level first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Levels from highest to lowest, the delivery scan order.
    pub const HIGHEST_TO_LOWEST: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Levels from lowest to highest, the eviction scan order.
    pub const LOWEST_TO_HIGHEST: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Dense index for per-level storage.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn test_scan_orders_are_inverses() {
        let mut reversed = Priority::HIGHEST_TO_LOWEST;
        reversed.reverse();
        assert_eq!(reversed, Priority::LOWEST_TO_HIGHEST);
    }
}
