//! Hardware drivers: the door switch input and the status LED output,
//! plus the blink-pattern indicator built on top of them.

pub mod door_switch;
pub mod indicator;
pub mod status_led;
