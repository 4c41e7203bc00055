//! One directional, bandwidth-limited link.

use crate::{Message, MessageKind, PrioritySendingQueue};
use packmind_types::{Clock, Priority};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

/// Millibytes per byte: the fixed-point scale of the budget accumulator.
///
/// Elapsed milliseconds times speed in bytes/sec lands directly in
/// millibytes, so accounting at millisecond granularity loses nothing to
/// rounding.
const MILLIBYTES: u64 = 1000;

/// Mutable transmission state, guarded by the channel's lock.
#[derive(Debug)]
struct ChannelState {
    sending: PrioritySendingQueue,
    /// Message currently being transmitted, if any.
    in_flight: Option<Message>,
    /// Messages that have fully arrived and await [`Channel::receive`].
    delivered: VecDeque<Message>,
    /// Millibytes of transmission credit accrued since the last delivery.
    /// Meaningful only while a message is in flight; zeroed otherwise so an
    /// idle channel banks no credit.
    budget_millibytes: u64,
    /// When the budget was last brought up to date.
    last_catch_up_ms: u64,
}

/// One uni-directional link with finite byte throughput.
///
/// Every operation, observation or mutation alike, first runs a catch-up step
/// that lazily advances the transmission state to the current time, all
/// inside a single critical section on the channel's own lock. Channels are
/// independent: no lock spans more than one channel.
///
/// Overload is handled by the sending queue's synchronous eviction, never by
/// blocking the caller; the link is a lossy, best-effort transport.
pub struct Channel {
    name: String,
    /// Transmission speed in bytes per second.
    speed: u64,
    clock: Arc<dyn Clock>,
    state: Mutex<ChannelState>,
}

impl Channel {
    /// Create an idle channel.
    ///
    /// `speed` is in bytes per second, `capacity` is the sending buffer
    /// limit in bytes. The clock must be monotonically non-decreasing; a
    /// regressing clock violates the contract and is not defended against.
    pub fn new(name: String, speed: u64, capacity: u64, clock: Arc<dyn Clock>) -> Self {
        let last_catch_up_ms = clock.now_millis();
        Channel {
            name,
            speed,
            clock,
            state: Mutex::new(ChannelState {
                sending: PrioritySendingQueue::new(capacity),
                in_flight: None,
                delivered: VecDeque::new(),
                budget_millibytes: 0,
                last_catch_up_ms,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transmission speed in bytes per second.
    pub fn speed(&self) -> u64 {
        self.speed
    }

    /// Advance transmission state to the current time.
    ///
    /// Accrues `elapsed × speed` millibytes of credit, then moves every
    /// message whose full cost is strictly covered into the delivered queue.
    /// A message completes only once the accrued credit exceeds its cost;
    /// at exact equality it is still one instant short of fully arriving.
    fn catch_up(&self, state: &mut ChannelState) {
        let now = self.clock.now_millis();
        state.budget_millibytes += (now - state.last_catch_up_ms) * self.speed;

        if state.in_flight.is_none() {
            state.in_flight = state.sending.remove_first();
        }

        loop {
            let cost = match &state.in_flight {
                Some(message) => MILLIBYTES * message.length(),
                None => break,
            };
            if cost >= state.budget_millibytes {
                break;
            }
            state.budget_millibytes -= cost;
            if let Some(arrived) = state.in_flight.take() {
                trace!(
                    channel = %self.name,
                    kind = arrived.kind().name(),
                    bytes = arrived.length(),
                    "message delivered"
                );
                state.delivered.push_back(arrived);
            }
            state.in_flight = state.sending.remove_first();
        }

        if state.in_flight.is_none() {
            state.budget_millibytes = 0;
        }
        state.last_catch_up_ms = now;
    }

    /// Outstanding transmission debt in millibytes: everything queued or in
    /// flight, minus the credit already accrued against the in-flight
    /// message.
    fn send_queue_millis_length(&self, state: &ChannelState) -> u64 {
        let mut bytes = state.sending.length();
        if let Some(message) = &state.in_flight {
            bytes += message.length();
        }
        (MILLIBYTES * bytes).saturating_sub(state.budget_millibytes)
    }

    /// Enqueue a message for transmission.
    ///
    /// If the sending queue is empty immediately before the call, the
    /// catch-up timestamp resets to now: a message sent after an idle period
    /// must not instantly consume bandwidth credit accrued while idle.
    pub fn send(&self, priority: Priority, message: Message) {
        let mut state = self.state.lock();
        if state.sending.is_empty() {
            state.last_catch_up_ms = self.clock.now_millis();
        }
        state.sending.add(priority, message);
        self.catch_up(&mut state);
    }

    /// Enqueue a message at the front of its priority level.
    pub fn send_first(&self, priority: Priority, message: Message) {
        let mut state = self.state.lock();
        if state.sending.is_empty() {
            state.last_catch_up_ms = self.clock.now_millis();
        }
        state.sending.add_first(priority, message);
        self.catch_up(&mut state);
    }

    /// Pop the oldest fully delivered message, if any.
    pub fn receive(&self) -> Option<Message> {
        let mut state = self.state.lock();
        self.catch_up(&mut state);
        state.delivered.pop_front()
    }

    /// Drop still-queued (not in-flight) messages of the given kind.
    ///
    /// Lets a sender supersede stale unsent state before publishing fresher
    /// state of the same kind. A message already in flight keeps
    /// transmitting.
    pub fn flush_unsent(&self, kind: MessageKind) {
        let mut state = self.state.lock();
        self.catch_up(&mut state);
        state.sending.flush_kind(kind);
    }

    /// True when nothing is queued or in flight.
    pub fn send_queue_empty(&self) -> bool {
        let mut state = self.state.lock();
        self.catch_up(&mut state);
        state.in_flight.is_none()
    }

    /// True when no delivered message awaits [`Channel::receive`].
    pub fn receive_queue_empty(&self) -> bool {
        let mut state = self.state.lock();
        self.catch_up(&mut state);
        state.delivered.is_empty()
    }

    /// Messages queued or in flight.
    pub fn send_queue_items_count(&self) -> u64 {
        let mut state = self.state.lock();
        self.catch_up(&mut state);
        match &state.in_flight {
            Some(_) => 1 + state.sending.items_count(),
            None => 0,
        }
    }

    /// Delivered messages awaiting [`Channel::receive`].
    pub fn receive_queue_items_count(&self) -> u64 {
        let mut state = self.state.lock();
        self.catch_up(&mut state);
        state.delivered.len() as u64
    }

    /// Outstanding bytes still to transmit, rounded up.
    pub fn send_queue_length(&self) -> u64 {
        let mut state = self.state.lock();
        self.catch_up(&mut state);
        self.send_queue_millis_length(&state).div_ceil(MILLIBYTES)
    }

    /// Bytes of delivered-but-unconsumed messages.
    pub fn receive_queue_length(&self) -> u64 {
        let mut state = self.state.lock();
        self.catch_up(&mut state);
        state.delivered.iter().map(|m| m.length()).sum()
    }

    /// Time to drain everything queued or in flight at the current speed.
    pub fn seconds_to_send_all(&self) -> f64 {
        let mut state = self.state.lock();
        self.catch_up(&mut state);
        0.001 * self.send_queue_millis_length(&state) as f64 / self.speed as f64
    }

    /// Drop all transmission state. Used for episode resets.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.sending.clear();
        state.delivered.clear();
        state.in_flight = None;
        state.budget_millibytes = 0;
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("speed", &self.speed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Payload;
    use packmind_types::{JointAction, VirtualClock};

    fn msg(bytes: u64) -> Message {
        Message::sized(Payload::MoveVote(JointAction::neutral(2)), bytes)
    }

    fn channel(speed: u64, capacity: u64) -> (Channel, Arc<VirtualClock>) {
        let clock = Arc::new(VirtualClock::new());
        let channel = Channel::new("test".to_string(), speed, capacity, clock.clone());
        (channel, clock)
    }

    #[test]
    fn test_transmission_takes_wall_time() {
        // 500 B at 1000 B/s: not there at 0.5 s (credit exactly equals the
        // cost, which is one instant short), there at 1 s.
        let (channel, clock) = channel(1000, 2000);
        channel.send(Priority::Medium, msg(500));

        clock.advance_millis(500);
        assert!(channel.receive().is_none());

        clock.advance_millis(500);
        let received = channel.receive();
        assert_eq!(received.map(|m| m.length()), Some(500));
        assert!(channel.receive_queue_empty());
    }

    #[test]
    fn test_idle_channel_banks_no_credit() {
        let (channel, clock) = channel(1000, 2000);

        // A long idle period must not prepay for the next message.
        clock.advance_millis(10_000);
        channel.send(Priority::Medium, msg(500));
        assert!(channel.receive().is_none());

        clock.advance_millis(499);
        assert!(channel.receive().is_none());
        clock.advance_millis(2);
        assert!(channel.receive().is_some());
    }

    #[test]
    fn test_fifo_within_level() {
        let (channel, clock) = channel(100, 10_000);
        channel.send(Priority::Medium, msg(50));
        channel.send(Priority::Medium, msg(60));
        channel.send(Priority::Medium, msg(70));

        // 1.2 s at 100 B/s strictly covers the first two messages only.
        clock.advance_millis(1200);
        let order: Vec<u64> = std::iter::from_fn(|| channel.receive())
            .map(|m| m.length())
            .collect();
        assert_eq!(order, vec![50, 60]);

        clock.advance_millis(700);
        assert_eq!(channel.receive().map(|m| m.length()), Some(70));
    }

    #[test]
    fn test_high_priority_overtakes_queued_low() {
        let (channel, clock) = channel(100, 10_000);
        // First LOW goes in flight immediately; the second waits.
        channel.send(Priority::Low, msg(50));
        channel.send(Priority::Low, msg(10));
        channel.send(Priority::High, msg(11));

        // 0.7 s: the in-flight 50 B completes, then the HIGH message beats
        // the earlier-queued LOW into flight and through.
        clock.advance_millis(700);
        assert_eq!(channel.receive().map(|m| m.length()), Some(50));
        assert_eq!(
            channel.receive().map(|m| m.length()),
            Some(11),
            "high priority must be delivered before the earlier low message"
        );
        assert!(channel.receive().is_none());

        clock.advance_millis(200);
        assert_eq!(channel.receive().map(|m| m.length()), Some(10));
    }

    #[test]
    fn test_bandwidth_conservation() {
        // Keep the queue non-empty for the whole window: delivered bytes can
        // never exceed speed × elapsed.
        let (channel, clock) = channel(1000, u64::MAX);
        for _ in 0..100 {
            channel.send(Priority::Medium, msg(100));
        }

        let mut delivered = 0;
        for _ in 0..7 {
            clock.advance_millis(500);
            while let Some(message) = channel.receive() {
                delivered += message.length();
            }
            let elapsed_ms = clock.now_millis();
            assert!(delivered * 1000 <= 1000 * elapsed_ms);
        }
        // 3.5 s at 1000 B/s moves 34 whole 100 B messages (strict
        // completion keeps the 35th in flight).
        assert_eq!(delivered, 3400);
    }

    #[test]
    fn test_send_queue_accounting() {
        let (channel, clock) = channel(1000, 10_000);
        assert!(channel.send_queue_empty());
        assert_eq!(channel.send_queue_length(), 0);

        channel.send(Priority::Medium, msg(500));
        channel.send(Priority::Medium, msg(300));
        assert!(!channel.send_queue_empty());
        assert_eq!(channel.send_queue_items_count(), 2);
        assert_eq!(channel.send_queue_length(), 800);
        assert!((channel.seconds_to_send_all() - 0.8).abs() < 1e-9);

        // Partway through the first message the outstanding debt shrinks
        // and rounds up.
        clock.advance_millis(250);
        assert_eq!(channel.send_queue_length(), 550);
        assert!((channel.seconds_to_send_all() - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_receive_queue_accounting() {
        let (channel, clock) = channel(1000, 10_000);
        channel.send(Priority::Medium, msg(200));
        channel.send(Priority::Medium, msg(300));

        clock.advance_millis(10_000);
        assert_eq!(channel.receive_queue_items_count(), 2);
        assert_eq!(channel.receive_queue_length(), 500);
        assert!(!channel.receive_queue_empty());
        assert!(channel.send_queue_empty());
    }

    #[test]
    fn test_flush_unsent_spares_in_flight() {
        let (channel, clock) = channel(100, 10_000);
        channel.send(Priority::Medium, msg(50)); // goes in flight
        channel.send(Priority::Medium, msg(60)); // still queued

        channel.flush_unsent(MessageKind::MoveVote);
        assert_eq!(channel.send_queue_items_count(), 1);

        clock.advance_millis(1000);
        assert_eq!(channel.receive().map(|m| m.length()), Some(50));
        assert!(channel.receive().is_none());
    }

    #[test]
    fn test_clear_resets_everything() {
        let (channel, clock) = channel(1000, 10_000);
        channel.send(Priority::Medium, msg(500));
        channel.send(Priority::Low, msg(500));
        clock.advance_millis(600);

        channel.clear();
        assert!(channel.send_queue_empty());
        assert!(channel.receive_queue_empty());
        assert_eq!(channel.send_queue_length(), 0);

        // The channel behaves like new after a reset.
        channel.send(Priority::Medium, msg(100));
        clock.advance_millis(101);
        assert!(channel.receive().is_some());
    }

    #[test]
    fn test_message_larger_than_buffer_is_dropped() {
        // Capacity enforcement runs on enqueue, before transmission pulls
        // anything into flight, so a lone message bigger than the buffer is
        // evicted immediately; the transport is lossy under overload.
        let (channel, clock) = channel(1000, 100);
        channel.send(Priority::Medium, msg(5000));
        clock.advance_millis(10_000);
        assert!(channel.receive().is_none());
        assert!(channel.send_queue_empty());
    }
}
