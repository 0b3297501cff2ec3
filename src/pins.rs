//! GPIO pin assignments for the doorsign sensor board (ESP32-C3).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Door switch (reed contact on the door frame)
// ---------------------------------------------------------------------------

/// Digital input: reed switch between this pin and GND, internal pull-up
/// enabled.  Magnet present (door closed) leaves the contact open, so the
/// pin reads HIGH when the door is closed and LOW when it is open.
pub const DOOR_SWITCH_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// Digital output: the devkit's onboard LED (active HIGH).  Driven by the
/// blink-pattern indicator, never directly by the monitor.
pub const STATUS_LED_GPIO: i32 = 8;
