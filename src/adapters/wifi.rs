//! WiFi station-mode link adapter.
//!
//! Implements [`LinkPort`], the availability predicate the notifier
//! consults before every request.  The adapter holds an ordered set of
//! candidate networks and associates with the first one that accepts.
//!
//! ## Reconnection policy
//!
//! When the link is down, each `is_usable()` call performs at most one
//! bounded rejoin attempt, starting with the network that last worked and
//! rotating to the next candidate after a failure.  The caller's poll
//! cadence (~8 s between cycles) provides the retry spacing, so there is
//! no backoff timer of its own.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   [`BlockingWifi`](esp_idf_svc::wifi::BlockingWifi).
//! - **all other targets**: simulation stub with injectable join failures.

use core::fmt;

use log::{info, warn};

use crate::ports::LinkPort;

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    NoNetworks,
    InvalidSsid,
    InvalidPassword,
    TableFull,
    AssociationFailed,
    Platform,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNetworks => write!(f, "no candidate networks configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::TableFull => write!(f, "candidate table full"),
            Self::AssociationFailed => write!(f, "association failed on every candidate"),
            Self::Platform => write!(f, "WiFi driver error"),
        }
    }
}

/// Upper bound on configured candidate networks.
const MAX_CANDIDATES: usize = 4;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), LinkError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(LinkError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(LinkError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), LinkError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(LinkError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi link
// ───────────────────────────────────────────────────────────────

struct Candidate {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

pub struct WifiLink {
    candidates: heapless::Vec<Candidate, MAX_CANDIDATES>,
    /// Candidate we are associated with, when the link is up.
    active: Option<usize>,
    /// Rotation cursor for the next rejoin attempt.
    next_try: usize,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    /// Simulation: pending injected join failures.
    #[cfg(not(target_os = "espidf"))]
    sim_fail_joins: u32,
}

impl WifiLink {
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
    ) -> Result<Self, LinkError> {
        let driver = EspWifi::new(modem, sysloop.clone(), Some(nvs))
            .map_err(|e| esp_fail("driver init", e))?;
        let wifi = BlockingWifi::wrap(driver, sysloop).map_err(|e| esp_fail("wrap", e))?;
        Ok(Self {
            candidates: heapless::Vec::new(),
            active: None,
            next_try: 0,
            wifi,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            candidates: heapless::Vec::new(),
            active: None,
            next_try: 0,
            sim_fail_joins: 0,
        }
    }

    /// Append a candidate network.  Order matters: earlier candidates are
    /// preferred at bring-up.
    pub fn add_network(&mut self, ssid: &str, password: &str) -> Result<(), LinkError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let candidate = Candidate {
            ssid: ssid.try_into().map_err(|()| LinkError::InvalidSsid)?,
            password: password.try_into().map_err(|()| LinkError::InvalidPassword)?,
        };
        self.candidates
            .push(candidate)
            .map_err(|_| LinkError::TableFull)?;
        info!("wifi: candidate '{}' registered", ssid);
        Ok(())
    }

    /// Initial association: try every candidate once, in order.
    ///
    /// Failure is not fatal to the caller; the link keeps retrying from
    /// [`is_usable`](LinkPort::is_usable), one attempt per call.
    pub fn connect(&mut self) -> Result<(), LinkError> {
        if self.candidates.is_empty() {
            return Err(LinkError::NoNetworks);
        }
        for idx in 0..self.candidates.len() {
            if self.try_candidate(idx) {
                self.active = Some(idx);
                self.next_try = idx;
                return Ok(());
            }
        }
        Err(LinkError::AssociationFailed)
    }

    /// SSID of the network currently associated with.
    pub fn current_ssid(&self) -> Option<&str> {
        self.active.map(|idx| self.candidates[idx].ssid.as_str())
    }

    fn try_candidate(&mut self, idx: usize) -> bool {
        info!("wifi: associating with '{}'", self.candidates[idx].ssid);
        match self.platform_join(idx) {
            Ok(()) => {
                info!("wifi: up on '{}'", self.candidates[idx].ssid);
                true
            }
            Err(e) => {
                warn!("wifi: '{}' unreachable: {}", self.candidates[idx].ssid, e);
                false
            }
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_join(&mut self, idx: usize) -> Result<(), LinkError> {
        let config = {
            let cand = &self.candidates[idx];
            let auth_method = if cand.password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            };
            Configuration::Client(ClientConfiguration {
                ssid: cand.ssid.clone(),
                password: cand.password.clone(),
                auth_method,
                ..Default::default()
            })
        };

        self.wifi
            .set_configuration(&config)
            .map_err(|e| esp_fail("configure", e))?;
        if !self.wifi.is_started().unwrap_or(false) {
            self.wifi.start().map_err(|e| esp_fail("start", e))?;
        }
        self.wifi.connect().map_err(|e| esp_fail("associate", e))?;
        self.wifi
            .wait_netif_up()
            .map_err(|e| esp_fail("netif up", e))?;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_up(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_join(&mut self, idx: usize) -> Result<(), LinkError> {
        if self.sim_fail_joins > 0 {
            self.sim_fail_joins -= 1;
            warn!(
                "wifi(sim): association with '{}' refused",
                self.candidates[idx].ssid
            );
            return Err(LinkError::AssociationFailed);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_up(&self) -> bool {
        self.active.is_some()
    }

    // ── Host simulation controls ──────────────────────────────

    /// Make the next `n` join attempts fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next_joins(&mut self, n: u32) {
        self.sim_fail_joins = n;
    }

    /// Drop the simulated link, as if the AP went away.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop_link(&mut self) {
        self.active = None;
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiLink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
fn esp_fail(stage: &'static str, err: esp_idf_svc::sys::EspError) -> LinkError {
    warn!("wifi: {} failed: {}", stage, err);
    LinkError::Platform
}

// ───────────────────────────────────────────────────────────────
// LinkPort
// ───────────────────────────────────────────────────────────────

impl LinkPort for WifiLink {
    fn is_usable(&mut self) -> bool {
        if self.candidates.is_empty() {
            return false;
        }
        if self.platform_is_up() {
            return true;
        }
        if self.active.take().is_some() {
            warn!("wifi: link lost");
        }

        // One bounded rejoin attempt per call; the cursor rotates to the
        // next candidate after every failure.
        let idx = self.next_try % self.candidates.len();
        self.next_try = self.next_try.wrapping_add(1);
        if self.try_candidate(idx) {
            self.active = Some(idx);
            self.next_try = idx;
            true
        } else {
            false
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_ssid() {
        let mut link = WifiLink::new();
        assert_eq!(link.add_network("", "password123"), Err(LinkError::InvalidSsid));
    }

    #[test]
    fn rejects_oversized_ssid() {
        let mut link = WifiLink::new();
        let long = "x".repeat(33);
        assert_eq!(link.add_network(&long, ""), Err(LinkError::InvalidSsid));
    }

    #[test]
    fn rejects_short_password() {
        let mut link = WifiLink::new();
        assert_eq!(
            link.add_network("MyNet", "short"),
            Err(LinkError::InvalidPassword)
        );
    }

    #[test]
    fn accepts_open_network() {
        let mut link = WifiLink::new();
        assert!(link.add_network("OpenCafe", "").is_ok());
    }

    #[test]
    fn candidate_table_is_bounded() {
        let mut link = WifiLink::new();
        for i in 0..4 {
            let ssid = format!("net{}", i);
            assert!(link.add_network(&ssid, "password1").is_ok());
        }
        assert_eq!(link.add_network("net4", "password1"), Err(LinkError::TableFull));
    }

    #[test]
    fn connect_without_networks_fails() {
        let mut link = WifiLink::new();
        assert_eq!(link.connect(), Err(LinkError::NoNetworks));
    }

    #[test]
    fn connect_falls_through_to_second_candidate() {
        let mut link = WifiLink::new();
        link.add_network("primary", "password1").unwrap();
        link.add_network("fallback", "password2").unwrap();
        link.sim_fail_next_joins(1);

        assert!(link.connect().is_ok());
        assert_eq!(link.current_ssid(), Some("fallback"));
    }

    #[test]
    fn usable_short_circuits_while_up() {
        let mut link = WifiLink::new();
        link.add_network("primary", "password1").unwrap();
        link.connect().unwrap();

        // Injected failures must not be consumed while the link is up.
        link.sim_fail_next_joins(5);
        assert!(link.is_usable());
        assert!(link.is_usable());
        assert_eq!(link.current_ssid(), Some("primary"));
    }

    #[test]
    fn rejoin_rotates_candidates_after_failure() {
        let mut link = WifiLink::new();
        link.add_network("primary", "password1").unwrap();
        link.add_network("fallback", "password2").unwrap();
        link.connect().unwrap();
        assert_eq!(link.current_ssid(), Some("primary"));

        link.sim_drop_link();
        link.sim_fail_next_joins(1);

        // First call retries the network that last worked and fails.
        assert!(!link.is_usable());
        // Second call rotates to the fallback and succeeds.
        assert!(link.is_usable());
        assert_eq!(link.current_ssid(), Some("fallback"));
    }

    #[test]
    fn unusable_with_no_candidates() {
        let mut link = WifiLink::new();
        assert!(!link.is_usable());
    }
}
