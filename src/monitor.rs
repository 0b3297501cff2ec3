//! Door monitor: the hexagonal core.
//!
//! [`DoorMonitor`] owns the single confirmed door state and runs the
//! debounced poll cycle.  All I/O flows through port traits injected at
//! call sites, so the whole core runs unchanged against mock collaborators
//! on the host.
//!
//! ```text
//!  DoorSensorPort ──▶ ┌─────────────────────┐ ──▶ NotifierPort
//!                     │     DoorMonitor      │ ──▶ IndicatorPort
//!       ClockPort ◀── │  debounce · confirm  │ ──▶ EventSink
//!                     └─────────────────────┘
//! ```

use core::time::Duration;

use log::{debug, info};

use crate::events::MonitorEvent;
use crate::ports::{ClockPort, DoorSensorPort, EventSink, IndicatorPattern, IndicatorPort, NotifierPort};

// ───────────────────────────────────────────────────────────────
// Timing constants
// ───────────────────────────────────────────────────────────────

/// Debounce window: a differing level must still differ from the confirmed
/// level after this blocking wait before the transition is accepted.
pub const SETTLE_WINDOW_MS: u32 = 15_000;

/// Gap between poll cycles.  Together with the settle window and the
/// armed indicator pattern this bounds how fast transitions can be seen.
pub const POLL_INTERVAL_MS: u32 = 8_000;

// ───────────────────────────────────────────────────────────────
// Raw level and door state
// ───────────────────────────────────────────────────────────────

/// Raw signal level read from the switch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinLevel {
    High,
    Low,
}

/// The one domain entity: which way the door is.
///
/// The level mapping is a fixed design constant.  The reed contact sits
/// between the input and GND with the internal pull-up enabled; the magnet
/// on the closed door holds the contact open, so HIGH means closed and LOW
/// means open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Open,
    Closed,
}

impl DoorState {
    /// Map a raw level to a door state (HIGH = closed, LOW = open).
    pub fn from_level(level: PinLevel) -> Self {
        match level {
            PinLevel::High => Self::Closed,
            PinLevel::Low => Self::Open,
        }
    }

    /// The raw level this state corresponds to.
    pub fn level(self) -> PinLevel {
        match self {
            Self::Open => PinLevel::Low,
            Self::Closed => PinLevel::High,
        }
    }

    /// Path segment used when reporting this state.  Note the asymmetry
    /// with [`Display`](core::fmt::Display): the receiver's resource is
    /// named `close`, while the state word is `closed`.
    pub fn action(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "close",
        }
    }
}

impl core::fmt::Display for DoorState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Debounce confirmation rule
// ───────────────────────────────────────────────────────────────

/// A transition is accepted only when the triggering read *and* the re-read
/// taken after the settle window both differ from the confirmed level.
/// Single fixed-duration re-check; deliberately not a majority vote, so a
/// flicker that happens to match at both ends of the window is accepted.
pub fn confirm(confirmed: PinLevel, first: PinLevel, second: PinLevel) -> bool {
    first != confirmed && second != confirmed
}

// ───────────────────────────────────────────────────────────────
// DoorMonitor
// ───────────────────────────────────────────────────────────────

/// Owns the confirmed door state and drives the poll cycle.
///
/// Exactly one instance exists per process; the confirmed state lives here
/// as a plain owned field and is mutated only by [`poll_cycle`]'s
/// confirmation step.
///
/// [`poll_cycle`]: DoorMonitor::poll_cycle
pub struct DoorMonitor {
    confirmed: DoorState,
    cycle_count: u64,
}

impl DoorMonitor {
    /// Seed the confirmed state from a single raw read.
    ///
    /// The seed is silent: it is logged and emitted, but nothing is sent to
    /// the network for it.  The first notification happens on the first
    /// confirmed transition after boot.
    pub fn seed(sensor: &mut impl DoorSensorPort, sink: &mut impl EventSink) -> Self {
        let confirmed = DoorState::from_level(sensor.sample());
        info!("monitor armed, door is {}", confirmed);
        sink.emit(&MonitorEvent::Started(confirmed));
        Self {
            confirmed,
            cycle_count: 0,
        }
    }

    /// Run one poll cycle: sample → debounce-confirm → notify → indicate →
    /// inter-poll sleep.
    ///
    /// Blocking by design: during the settle window, the notifier call and
    /// the indicator pattern, nothing else runs and the input is not
    /// polled.  The monitor never branches on the notifier outcome.
    pub fn poll_cycle(
        &mut self,
        sensor: &mut impl DoorSensorPort,
        notifier: &mut impl NotifierPort,
        indicator: &mut impl IndicatorPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        self.cycle_count += 1;
        debug!("cycle {}, door {}", self.cycle_count, self.confirmed);
        let held = self.confirmed.level();

        // 1. Raw sample; anything equal to the confirmed level is steady
        //    state and ends the check immediately.
        let first = sensor.sample();
        if first != held {
            let observed = DoorState::from_level(first);
            debug!(
                "level flipped towards {}, holding {} ms",
                observed, SETTLE_WINDOW_MS
            );

            // 2. Settle window, then one re-read.
            clock.sleep(Duration::from_millis(u64::from(SETTLE_WINDOW_MS)));
            let second = sensor.sample();

            if confirm(held, first, second) {
                // 3. Commit first, then report.  The two are not
                //    transactionally linked: a failed report never rolls
                //    the state back.
                let from = self.confirmed;
                let to = DoorState::from_level(second);
                self.confirmed = to;
                info!("door {} -> {}", from, to);
                sink.emit(&MonitorEvent::TransitionConfirmed { from, to });

                let outcome = notifier.notify(to);
                sink.emit(&MonitorEvent::NotifyFinished { state: to, outcome });
            } else {
                debug!("blip rejected, door stays {}", self.confirmed);
                sink.emit(&MonitorEvent::GlitchRejected { observed });
            }
        }

        // 4. Armed pattern every cycle, transition or not, then the
        //    inter-poll gap.
        indicator.show(IndicatorPattern::Armed);
        clock.sleep(Duration::from_millis(u64::from(POLL_INTERVAL_MS)));
    }

    /// The last value accepted as ground truth.
    pub fn confirmed(&self) -> DoorState {
        self.confirmed
    }

    /// Total poll cycles executed since seeding.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }
}
