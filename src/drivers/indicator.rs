//! Blink-pattern indicator.
//!
//! Plays fixed on/off sequences on the status LED.  Playback is blocking:
//! `show` returns only after the whole pattern ran, and that time adds to
//! the monitor's cycle time.  The pattern tables are plain data so the
//! timing can be checked without hardware.

use core::time::Duration;

use embedded_hal::digital::OutputPin;

use crate::drivers::status_led::StatusLed;
use crate::ports::{ClockPort, IndicatorPattern, IndicatorPort};

/// One `(on_ms, off_ms)` step of a blink sequence.
type Step = (u32, u32);

/// Four fast blinks after bring-up: "firmware is up, monitor arming".
const STARTUP_STEPS: [Step; 4] = [(150, 150); 4];

/// Two slow pulses every poll cycle: "armed and watching".  Runs 3.2 s,
/// which is the dominant fixed cost of a quiet cycle besides the poll gap.
const ARMED_STEPS: [Step; 2] = [(900, 700); 2];

/// Steps for a pattern.
pub fn pattern_steps(pattern: IndicatorPattern) -> &'static [Step] {
    match pattern {
        IndicatorPattern::Startup => &STARTUP_STEPS,
        IndicatorPattern::Armed => &ARMED_STEPS,
    }
}

/// Total playback time of a pattern.
pub fn pattern_duration_ms(pattern: IndicatorPattern) -> u32 {
    pattern_steps(pattern)
        .iter()
        .map(|(on, off)| on + off)
        .sum()
}

/// Plays blink patterns on the status LED, sleeping through the clock port.
pub struct BlinkIndicator<P, C> {
    led: StatusLed<P>,
    clock: C,
}

impl<P: OutputPin, C: ClockPort> BlinkIndicator<P, C> {
    pub fn new(led: StatusLed<P>, clock: C) -> Self {
        Self { led, clock }
    }
}

impl<P: OutputPin, C: ClockPort> IndicatorPort for BlinkIndicator<P, C> {
    fn show(&mut self, pattern: IndicatorPattern) {
        for &(on_ms, off_ms) in pattern_steps(pattern) {
            self.led.on();
            self.clock.sleep(Duration::from_millis(u64::from(on_ms)));
            self.led.off();
            self.clock.sleep(Duration::from_millis(u64::from(off_ms)));
        }
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::rc::Rc;

    use embedded_hal::digital::{ErrorType, OutputPin};

    use super::*;

    /// Output pin that appends every commanded level to a shared log, so
    /// the log stays readable after the pin moves into the driver.
    struct RecordingPin {
        log: Rc<RefCell<Vec<bool>>>,
    }

    impl RecordingPin {
        fn new() -> (Self, Rc<RefCell<Vec<bool>>>) {
            let log = Rc::new(RefCell::new(Vec::new()));
            (Self { log: Rc::clone(&log) }, log)
        }
    }

    impl ErrorType for RecordingPin {
        type Error = Infallible;
    }

    impl OutputPin for RecordingPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push(true);
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push(false);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingClock {
        sleeps_ms: Rc<RefCell<Vec<u64>>>,
    }

    impl ClockPort for RecordingClock {
        fn sleep(&mut self, period: core::time::Duration) {
            self.sleeps_ms.borrow_mut().push(period.as_millis() as u64);
        }
    }

    #[test]
    fn armed_pattern_runs_just_over_three_seconds() {
        assert_eq!(pattern_duration_ms(IndicatorPattern::Armed), 3200);
    }

    #[test]
    fn startup_pattern_is_short() {
        assert_eq!(pattern_duration_ms(IndicatorPattern::Startup), 1200);
    }

    #[test]
    fn show_alternates_led_and_sleeps_each_step() {
        let (pin, levels) = RecordingPin::new();
        let clock = RecordingClock::default();
        let sleeps = Rc::clone(&clock.sleeps_ms);
        let mut indicator = BlinkIndicator::new(StatusLed::new(pin), clock);

        indicator.show(IndicatorPattern::Armed);

        // new() forces one off, then on/off per step
        assert_eq!(*levels.borrow(), vec![false, true, false, true, false]);
        assert_eq!(*sleeps.borrow(), vec![900, 700, 900, 700]);
    }

    #[test]
    fn startup_blinks_four_times() {
        let (pin, levels) = RecordingPin::new();
        let mut indicator =
            BlinkIndicator::new(StatusLed::new(pin), RecordingClock::default());

        indicator.show(IndicatorPattern::Startup);

        let ons = levels.borrow().iter().filter(|&&l| l).count();
        assert_eq!(ons, 4);
    }
}
