//! Doorsign firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module, so the whole
//! crate builds and tests on the host with `--no-default-features`.

#![deny(unused_must_use)]

pub mod config;
pub mod events;
pub mod monitor;
pub mod pins;
pub mod ports;

pub mod adapters;
pub mod drivers;
