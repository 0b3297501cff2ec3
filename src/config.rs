//! Device configuration.
//!
//! Everything is resolved at build/deploy time: the `DOORSIGN_*`
//! environment variables are baked in by `option_env!` when the firmware is
//! compiled, and nothing is reconfigurable at runtime.  There is no stored
//! config and no provisioning channel.

use serde::{Deserialize, Serialize};

// Compile-time settings, overridable per build via environment variables.
const BUILD_SSID: &str = match option_env!("DOORSIGN_SSID") {
    Some(v) => v,
    None => "hackerspace",
};
const BUILD_PASS: &str = match option_env!("DOORSIGN_PASS") {
    Some(v) => v,
    None => "changeme-wifi",
};
const BUILD_SSID2: &str = match option_env!("DOORSIGN_SSID2") {
    Some(v) => v,
    None => "",
};
const BUILD_PASS2: &str = match option_env!("DOORSIGN_PASS2") {
    Some(v) => v,
    None => "",
};
const BUILD_SPACE_ID: &str = match option_env!("DOORSIGN_SPACE_ID") {
    Some(v) => v,
    None => "1",
};
const BUILD_AUTH_USER: &str = match option_env!("DOORSIGN_AUTH_USER") {
    Some(v) => v,
    None => "doorsign",
};
const BUILD_AUTH_PASS: &str = match option_env!("DOORSIGN_AUTH_PASS") {
    Some(v) => v,
    None => "changeme-auth",
};
const BUILD_HOST: &str = match option_env!("DOORSIGN_HOST") {
    Some(v) => v,
    None => "status.example.org",
};

/// Core device configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Wi-Fi ---
    /// Primary network SSID.
    pub ssid: heapless::String<32>,
    /// Primary network password (empty = open network).
    pub password: heapless::String<64>,
    /// Optional fallback network SSID (empty = none configured).
    pub ssid2: heapless::String<32>,
    /// Fallback network password.
    pub password2: heapless::String<64>,

    // --- Reporting endpoint ---
    /// Space identifier encoded into the event path.
    pub space_id: u32,
    /// HTTP Basic auth username.
    pub auth_user: heapless::String<32>,
    /// HTTP Basic auth password.
    pub auth_pass: heapless::String<64>,
    /// Endpoint host, no scheme, optional `:port` (e.g. `status.example.org`).
    pub host: heapless::String<64>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}

impl DeviceConfig {
    /// Build the configuration from the values baked in at compile time.
    ///
    /// A `DOORSIGN_*` value longer than its field capacity collapses to an
    /// empty string here and is then rejected by [`validate`](Self::validate).
    pub fn from_build_env() -> Self {
        Self {
            ssid: BUILD_SSID.try_into().unwrap_or_default(),
            password: BUILD_PASS.try_into().unwrap_or_default(),
            ssid2: BUILD_SSID2.try_into().unwrap_or_default(),
            password2: BUILD_PASS2.try_into().unwrap_or_default(),
            space_id: BUILD_SPACE_ID.parse().unwrap_or(0),
            auth_user: BUILD_AUTH_USER.try_into().unwrap_or_default(),
            auth_pass: BUILD_AUTH_PASS.try_into().unwrap_or_default(),
            host: BUILD_HOST.try_into().unwrap_or_default(),
        }
    }

    /// Reject configurations that cannot possibly work before bring-up
    /// starts.  Checked once in `main`; there is no later reload.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ssid.is_empty() {
            return Err(ConfigError::ValidationFailed("ssid must not be empty"));
        }
        if self.host.is_empty() {
            return Err(ConfigError::ValidationFailed("host must not be empty"));
        }
        if self.space_id == 0 {
            return Err(ConfigError::ValidationFailed(
                "space_id must be a positive integer",
            ));
        }
        if self.auth_user.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "auth_user must not be empty",
            ));
        }
        Ok(())
    }

    /// The fallback network, when one is configured.
    pub fn secondary_network(&self) -> Option<(&str, &str)> {
        if self.ssid2.is_empty() {
            None
        } else {
            Some((self.ssid2.as_str(), self.password2.as_str()))
        }
    }
}

/// Errors from configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
