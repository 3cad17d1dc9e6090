//! Messages and their traffic classes.

use std::fmt;

use crate::{MessageId, NodeId, Tick};

// ── MessageKind ───────────────────────────────────────────────────────────────

/// The three application traffic classes carried by the network.
///
/// Each class fixes its payload size, inter-send interval, and queue
/// priority.  The numbers are the calibrated profile of the simulated
/// applications, not protocol constants.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// Collision warnings etc. — small, frequent, broadcast to all neighbors.
    Safety,
    /// Periodic vehicle state reports, unicast to the nearest roadside unit.
    Telemetry,
    /// Bulk content, unicast to a random peer vehicle.
    Infotainment,
}

impl MessageKind {
    /// All kinds, in priority order.
    pub const ALL: [MessageKind; 3] = [
        MessageKind::Safety,
        MessageKind::Telemetry,
        MessageKind::Infotainment,
    ];

    /// Queue priority — lower sorts (and therefore transmits) first.
    #[inline]
    pub fn priority(self) -> u8 {
        match self {
            MessageKind::Safety => 0,
            MessageKind::Telemetry => 1,
            MessageKind::Infotainment => 2,
        }
    }

    /// Payload size in bytes.
    #[inline]
    pub fn payload_size(self) -> u32 {
        match self {
            MessageKind::Safety => 50,
            MessageKind::Telemetry => 200,
            MessageKind::Infotainment => 1_500,
        }
    }

    /// Interval between sends from one application, in simulated ms.
    #[inline]
    pub fn interval_ms(self) -> u64 {
        match self {
            MessageKind::Safety => 1_000,
            MessageKind::Telemetry => 5_000,
            MessageKind::Infotainment => 15_000,
        }
    }

    /// Lower-case label for logs and CSV columns.
    pub fn label(self) -> &'static str {
        match self {
            MessageKind::Safety => "safety",
            MessageKind::Telemetry => "telemetry",
            MessageKind::Infotainment => "infotainment",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Message ───────────────────────────────────────────────────────────────────

/// A message waiting in (or moving through) the network.
///
/// Immutable once created.  A `destination` of `None` means broadcast.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub id: MessageId,
    pub source: NodeId,
    pub destination: Option<NodeId>,
    pub kind: MessageKind,
    /// Payload size in bytes.
    pub size: u32,
    /// Tick at which the message was generated.
    pub created: Tick,
}

impl Message {
    #[inline]
    pub fn is_broadcast(&self) -> bool {
        self.destination.is_none()
    }
}
