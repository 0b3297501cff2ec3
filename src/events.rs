//! Outbound monitor events.
//!
//! The [`DoorMonitor`](crate::monitor::DoorMonitor) emits these through the
//! [`EventSink`](crate::ports::EventSink) port.  The adapter on the other
//! side decides what to do with them; in production they go to the serial
//! log, in tests they are recorded and asserted on.

use crate::monitor::DoorState;
use crate::ports::NotifyOutcome;

/// Structured events emitted by the monitor core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// The monitor seeded its confirmed state at boot (silent: the seed is
    /// never reported to the network).
    Started(DoorState),

    /// A transition survived the settle window and was committed.
    TransitionConfirmed { from: DoorState, to: DoorState },

    /// A differing read reverted within the settle window and was dropped.
    GlitchRejected { observed: DoorState },

    /// The notifier finished its one attempt for a confirmed transition.
    NotifyFinished {
        state: DoorState,
        outcome: NotifyOutcome,
    },
}
