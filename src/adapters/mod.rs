//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                     |
//! |------------|----------------|---------------------------------|
//! | `wifi`     | LinkPort       | ESP-IDF WiFi STA                |
//! | `notifier` | NotifierPort   | HTTPS space-events endpoint     |
//! | `clock`    | ClockPort      | Scheduler sleep                 |
//! | `log_sink` | EventSink      | Serial log output               |

pub mod clock;
pub mod log_sink;
pub mod notifier;
pub mod wifi;
