//! Port traits: the hexagonal boundary between the monitor core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DoorMonitor (domain)
//! ```
//!
//! Driven adapters (the door switch, the Wi-Fi link, the HTTP notifier, the
//! LED indicator, the clock) implement these traits.  The
//! [`DoorMonitor`](crate::monitor::DoorMonitor) consumes them via generics,
//! so the core never touches hardware or sockets directly and tests can
//! substitute recording fakes.

use core::time::Duration;

use crate::monitor::{DoorState, PinLevel};

// ───────────────────────────────────────────────────────────────
// Door sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the monitor calls this to obtain the raw switch level.
pub trait DoorSensorPort {
    /// Read the current signal level.  No side effects; the read is treated
    /// as infallible at this layer.
    fn sample(&mut self) -> PinLevel;
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (consulted by the notifier, never the monitor)
// ───────────────────────────────────────────────────────────────

/// Network-availability predicate.  Must return in bounded time; the
/// notifier treats it as synchronous and fast.  Implementations may use the
/// call to nudge their own reconnect machinery, but any such attempt has to
/// stay bounded too.
pub trait LinkPort {
    fn is_usable(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Notifier port (driven adapter: domain → network)
// ───────────────────────────────────────────────────────────────

/// One-way transition reporting.  The monitor calls `notify` once per
/// confirmed transition and never branches on the outcome; the return value
/// exists for logging and for tests.
pub trait NotifierPort {
    fn notify(&mut self, state: DoorState) -> NotifyOutcome;
}

/// What became of a single notification attempt.
///
/// Deliberately not `must_use`: the caller is allowed to drop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The request went out and came back with an accepted status.
    Delivered { status: u16 },
    /// The link was down; no request was attempted.  Expected condition,
    /// handled by omission.
    SkippedLinkDown,
    /// The request was attempted and failed.  Logged, never retried.
    Failed(NotifyError),
}

impl NotifyOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Failure detail for a notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// Transport session could not be established (DNS, TCP, TLS).
    Connect,
    /// The request could not be written or the response never arrived.
    Request,
    /// The response head could not be parsed.
    Response,
    /// The server answered with a status outside the accepted set.
    RejectedStatus(u16),
}

impl core::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Connect => write!(f, "connect failed"),
            Self::Request => write!(f, "request failed"),
            Self::Response => write!(f, "unparseable response"),
            Self::RejectedStatus(code) => write!(f, "rejected with status {}", code),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → status LED)
// ───────────────────────────────────────────────────────────────

/// Visual feedback.  `show` blocks for the duration of the pattern (the
/// pattern length therefore adds to the monitor's cycle time) and returns
/// nothing; fire and forget.
pub trait IndicatorPort {
    fn show(&mut self, pattern: IndicatorPattern);
}

/// The closed set of patterns the indicator knows how to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorPattern {
    /// Run once after bring-up completes.
    Startup,
    /// Run every poll cycle while the monitor is armed.
    Armed,
}

// ───────────────────────────────────────────────────────────────
// Clock port (blocking delay source)
// ───────────────────────────────────────────────────────────────

/// Blocking sleep.  The whole system is one sequential loop; every delay
/// (debounce window, inter-poll gap, blink timing) goes through this port
/// so host tests can replace real waiting with recording.
pub trait ClockPort {
    fn sleep(&mut self, period: Duration);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The monitor emits structured [`MonitorEvent`](crate::events::MonitorEvent)s
/// through this port.  Adapters decide where they go; in production that is
/// the serial log.
pub trait EventSink {
    fn emit(&mut self, event: &crate::events::MonitorEvent);
}
