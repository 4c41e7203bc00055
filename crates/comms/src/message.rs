//! Protocol messages and their bandwidth accounting.

use packmind_types::{JointAction, RootSnapshot};
use serde::{Deserialize, Serialize};

/// Framing overhead added to every payload's logical size estimate:
/// length prefix, kind tag, and a little protocol slack.
const FRAME_OVERHEAD: u64 = 15;

/// Dispatch tag for a message, one per [`Payload`] variant.
///
/// Agents resolve their handler tables against these tags once at
/// construction; no runtime type inspection anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// A peer's locally best joint action.
    MoveVote,
    /// A peer's root visit-count digest.
    RootStats,
}

impl MessageKind {
    /// Human-readable name, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            MessageKind::MoveVote => "move.vote",
            MessageKind::RootStats => "root.stats",
        }
    }
}

/// The content a message carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    MoveVote(JointAction),
    RootStats(RootSnapshot),
}

impl Payload {
    /// The dispatch tag for this payload.
    pub fn kind(&self) -> MessageKind {
        match self {
            Payload::MoveVote(_) => MessageKind::MoveVote,
            Payload::RootStats(_) => MessageKind::RootStats,
        }
    }

    /// Logical encoded size in bytes, used for bandwidth accounting.
    ///
    /// No physical wire encoding is mandated at this layer; the estimate is
    /// deterministic so experiments are reproducible: one byte per unit move,
    /// eight bytes per visit count, plus framing.
    pub fn encoded_len(&self) -> u64 {
        let body = match self {
            Payload::MoveVote(action) => action.len() as u64,
            Payload::RootStats(snapshot) => snapshot
                .branches()
                .map(|(_, actions)| {
                    1 + actions
                        .keys()
                        .map(|action| action.len() as u64 + 8)
                        .sum::<u64>()
                })
                .sum(),
        };
        FRAME_OVERHEAD + body
    }
}

/// Immutable unit of transmission.
///
/// The length is fixed at creation and used only by the channel's byte
/// accounting; it never changes once the message is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    payload: Payload,
    length: u64,
}

impl Message {
    /// Create a message whose length is the payload's logical size.
    pub fn new(payload: Payload) -> Self {
        let length = payload.encoded_len().max(1);
        Message { payload, length }
    }

    /// Create a message with an explicit accounting length.
    ///
    /// Lengths are clamped to at least one byte; a zero-length message
    /// would transmit instantly and break the bandwidth model.
    pub fn sized(payload: Payload, length: u64) -> Self {
        Message {
            payload,
            length: length.max(1),
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Accounting length in bytes.
    pub fn length(&self) -> u64 {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packmind_types::Direction;

    #[test]
    fn test_kind_matches_payload() {
        let vote = Message::new(Payload::MoveVote(JointAction::neutral(4)));
        assert_eq!(vote.kind(), MessageKind::MoveVote);

        let stats = Message::new(Payload::RootStats(RootSnapshot::new()));
        assert_eq!(stats.kind(), MessageKind::RootStats);
    }

    #[test]
    fn test_length_is_positive() {
        let msg = Message::new(Payload::RootStats(RootSnapshot::new()));
        assert!(msg.length() > 0);

        let clamped = Message::sized(Payload::MoveVote(JointAction::neutral(2)), 0);
        assert_eq!(clamped.length(), 1);
    }

    #[test]
    fn test_snapshot_length_grows_with_content() {
        let empty = Payload::RootStats(RootSnapshot::new());

        let mut snapshot = RootSnapshot::new();
        snapshot.record(Direction::Neutral, JointAction::neutral(4), 10);
        snapshot.record(Direction::Left, JointAction::neutral(4), 3);
        let full = Payload::RootStats(snapshot);

        assert!(full.encoded_len() > empty.encoded_len());
    }
}
