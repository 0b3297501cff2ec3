//! Status LED driver.
//!
//! Single active-HIGH LED on [`pins::STATUS_LED_GPIO`](crate::pins).  The
//! driver only knows on/off; timing lives in the blink-pattern indicator
//! one layer up.

use embedded_hal::digital::OutputPin;

/// On/off wrapper around an output pin, tracking the last commanded state.
pub struct StatusLed<P> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Wrap an already configured output pin, forcing it off.
    pub fn new(pin: P) -> Self {
        let mut led = Self { pin, lit: false };
        led.off();
        led
    }

    pub fn on(&mut self) {
        let _ = self.pin.set_high();
        self.lit = true;
    }

    pub fn off(&mut self) {
        let _ = self.pin.set_low();
        self.lit = false;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub use sim::{SimLedPin, sim_led_lit};

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::convert::Infallible;
    use core::sync::atomic::{AtomicBool, Ordering};

    use embedded_hal::digital::{ErrorType, OutputPin};

    static SIM_LED_LIT: AtomicBool = AtomicBool::new(false);

    /// Observe the simulated LED from host code.
    pub fn sim_led_lit() -> bool {
        SIM_LED_LIT.load(Ordering::Relaxed)
    }

    /// Output pin backed by an in-memory flag instead of hardware.
    pub struct SimLedPin;

    impl ErrorType for SimLedPin {
        type Error = Infallible;
    }

    impl OutputPin for SimLedPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            SIM_LED_LIT.store(true, Ordering::Relaxed);
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            SIM_LED_LIT.store(false, Ordering::Relaxed);
            Ok(())
        }
    }
}
