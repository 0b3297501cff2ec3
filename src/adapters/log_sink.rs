//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured monitor events to the
//! ESP-IDF logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::events::MonitorEvent;
use crate::ports::{EventSink, NotifyOutcome};

/// Adapter that logs every [`MonitorEvent`] to the serial console.
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &MonitorEvent) {
        match event {
            MonitorEvent::Started(state) => {
                info!("MON   | seeded, door {} (not reported)", state);
            }
            MonitorEvent::TransitionConfirmed { from, to } => {
                info!("MON   | confirmed {} -> {}", from, to);
            }
            MonitorEvent::GlitchRejected { observed } => {
                info!("MON   | glitch towards {} rejected", observed);
            }
            MonitorEvent::NotifyFinished { state, outcome } => match outcome {
                NotifyOutcome::Delivered { status } => {
                    info!("NOTIF | {} delivered, status {}", state, status);
                }
                NotifyOutcome::SkippedLinkDown => {
                    info!("NOTIF | {} skipped, link down", state);
                }
                NotifyOutcome::Failed(err) => {
                    warn!("NOTIF | {} failed: {}", state, err);
                }
            },
        }
    }
}
