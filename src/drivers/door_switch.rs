//! Reed-switch door sensor driver.
//!
//! The contact sits between [`pins::DOOR_SWITCH_GPIO`](crate::pins) and GND
//! with the internal pull-up enabled: door closed (magnet present, contact
//! open) reads HIGH, door open reads LOW.
//!
//! The driver is generic over [`embedded_hal::digital::InputPin`], so the
//! same code runs against an `esp_idf_hal::gpio::PinDriver` on the device
//! and against a simulated pin on the host.

use embedded_hal::digital::InputPin;

use crate::monitor::PinLevel;
use crate::ports::DoorSensorPort;

/// Digital door switch on a pull-up input.
pub struct DoorSwitch<P> {
    pin: P,
}

impl<P: InputPin> DoorSwitch<P> {
    /// Wrap an already configured input pin (pull-up set by the caller).
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> DoorSensorPort for DoorSwitch<P> {
    fn sample(&mut self) -> PinLevel {
        // A HAL read error collapses to the pull-up idle level.
        if self.pin.is_high().unwrap_or(true) {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub use sim::{SimDoorPin, sim_set_door_closed};

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::convert::Infallible;
    use core::sync::atomic::{AtomicBool, Ordering};

    use embedded_hal::digital::{ErrorType, InputPin};

    // Closed (HIGH) is the pull-up idle, so it is the boot default too.
    static SIM_DOOR_CLOSED: AtomicBool = AtomicBool::new(true);

    /// Drive the simulated switch from host code.
    pub fn sim_set_door_closed(closed: bool) {
        SIM_DOOR_CLOSED.store(closed, Ordering::Relaxed);
    }

    /// Input pin backed by [`sim_set_door_closed`] instead of hardware.
    pub struct SimDoorPin;

    impl ErrorType for SimDoorPin {
        type Error = Infallible;
    }

    impl InputPin for SimDoorPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(SIM_DOOR_CLOSED.load(Ordering::Relaxed))
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!SIM_DOOR_CLOSED.load(Ordering::Relaxed))
        }
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embedded_hal::digital::{ErrorType, InputPin};

    use super::*;

    struct FixedPin(bool);

    impl ErrorType for FixedPin {
        type Error = Infallible;
    }

    impl InputPin for FixedPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0)
        }
    }

    #[test]
    fn high_pin_samples_high() {
        let mut switch = DoorSwitch::new(FixedPin(true));
        assert_eq!(switch.sample(), PinLevel::High);
    }

    #[test]
    fn low_pin_samples_low() {
        let mut switch = DoorSwitch::new(FixedPin(false));
        assert_eq!(switch.sample(), PinLevel::Low);
    }

    #[cfg(not(target_os = "espidf"))]
    #[test]
    fn sim_pin_follows_injected_state() {
        let mut switch = DoorSwitch::new(SimDoorPin);
        sim_set_door_closed(false);
        assert_eq!(switch.sample(), PinLevel::Low);
        sim_set_door_closed(true);
        assert_eq!(switch.sample(), PinLevel::High);
    }
}
