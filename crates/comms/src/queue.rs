//! Bounded multi-level send buffer.

use crate::{Message, MessageKind};
use packmind_types::Priority;
use std::collections::VecDeque;
use tracing::trace;

/// Priority-aware send buffer with a fixed byte capacity.
///
/// One FIFO list per priority level. Delivery pops from the highest
/// non-empty level; overflow evicts from the lowest. Capacity enforcement
/// removes exactly one message per mutating call (the most recently added
/// message in the lowest non-empty level), so a single oversized enqueue can
/// leave the queue transiently over capacity until later calls evict further.
#[derive(Debug)]
pub struct PrioritySendingQueue {
    levels: [VecDeque<Message>; 3],
    capacity: u64,
    count: u64,
    length: u64,
}

impl PrioritySendingQueue {
    pub fn new(capacity: u64) -> Self {
        PrioritySendingQueue {
            levels: [VecDeque::new(), VecDeque::new(), VecDeque::new()],
            capacity,
            count: 0,
            length: 0,
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn items_count(&self) -> u64 {
        self.count
    }

    /// Aggregate byte length of all queued messages.
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Append a message to its priority level, then enforce capacity.
    pub fn add(&mut self, priority: Priority, message: Message) {
        self.length += message.length();
        self.count += 1;
        self.levels[priority.index()].push_back(message);
        self.enforce_capacity();
    }

    /// Prepend a message to its priority level, then enforce capacity.
    pub fn add_first(&mut self, priority: Priority, message: Message) {
        self.length += message.length();
        self.count += 1;
        self.levels[priority.index()].push_front(message);
        self.enforce_capacity();
    }

    /// Pop the oldest message in the highest non-empty level.
    pub fn remove_first(&mut self) -> Option<Message> {
        for priority in Priority::HIGHEST_TO_LOWEST {
            if let Some(message) = self.levels[priority.index()].pop_front() {
                self.count -= 1;
                self.length -= message.length();
                return Some(message);
            }
        }
        None
    }

    /// Drop every queued message of the given kind.
    pub fn flush_kind(&mut self, kind: MessageKind) {
        for level in &mut self.levels {
            level.retain(|message| {
                let keep = message.kind() != kind;
                if !keep {
                    self.count -= 1;
                    self.length -= message.length();
                }
                keep
            });
        }
    }

    pub fn clear(&mut self) {
        for level in &mut self.levels {
            level.clear();
        }
        self.count = 0;
        self.length = 0;
    }

    /// Evict the most recent message in the lowest non-empty level if the
    /// aggregate length exceeds capacity. At most one eviction per call.
    fn enforce_capacity(&mut self) {
        if self.length <= self.capacity {
            return;
        }
        for priority in Priority::LOWEST_TO_HIGHEST {
            if let Some(evicted) = self.levels[priority.index()].pop_back() {
                self.count -= 1;
                self.length -= evicted.length();
                trace!(
                    kind = evicted.kind().name(),
                    bytes = evicted.length(),
                    ?priority,
                    "send buffer over capacity, evicting"
                );
                return;
            }
        }
    }
}
