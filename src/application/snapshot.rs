//! Periodic snapshot ring buffers.
//!
//! Once per period the current book extremes and last sale are pushed onto
//! the front of fixed-capacity, newest-first buffers. Calling [`SnapshotMaintainer::shift`]
//! twice in one period records the period twice; the caller owns the cadence.

use crate::domain::money::MinorUnits;
use crate::domain::CanonicalItem;

/// Default number of periods kept per buffer.
pub const DEFAULT_SNAPSHOT_CAPACITY: usize = 24;

/// Shifts the rolling snapshot buffers of canonical items.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotMaintainer {
    capacity: usize,
}

impl SnapshotMaintainer {
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepend the item's current values to each buffer, dropping the oldest
    /// entries beyond capacity.
    pub fn shift(&self, item: &mut CanonicalItem) {
        let buy_high = item.buy_order_highest_price;
        let sell_low = item.sell_order_lowest_price;
        let last_sale = item.last_sale_value();

        let snapshots = &mut item.snapshots;
        push_front(&mut snapshots.buy_order_highest, buy_high, self.capacity);
        push_front(&mut snapshots.sell_order_lowest, sell_low, self.capacity);
        push_front(&mut snapshots.last_sale_value, last_sale, self.capacity);

        item.mark_dirty();
    }
}

impl Default for SnapshotMaintainer {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_CAPACITY)
    }
}

fn push_front(buffer: &mut Vec<Option<MinorUnits>>, value: Option<MinorUnits>, capacity: usize) {
    buffer.insert(0, value);
    buffer.truncate(capacity);
}
