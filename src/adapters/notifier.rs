//! Space-event notifier adapter.
//!
//! Implements [`NotifierPort`]: one authenticated, empty-body `POST` to
//! `https://{host}/space_events/{space_id}/{open|close}` per confirmed
//! transition.  The link predicate is consulted first; when the network is
//! down the call is a silent skip.  There is no retry and no queue; a
//! report that fails is logged and lost.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc` HTTP client over TLS.
//!   Certificate verification is disabled in `sdkconfig.defaults`, and
//!   redirects are not followed so a `301` surfaces as the response status
//!   (it counts as acceptance).
//! - **all other targets**: plaintext HTTP/1.1 over `std::net::TcpStream`
//!   (TLS is not applied on the host); `host` must carry an explicit
//!   `:port` there.
//!
//! The receiver answers with a small JSON event record; it is parsed on a
//! best-effort basis purely for the log.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::{debug, info, warn};
use serde::Deserialize;

use crate::config::DeviceConfig;
use crate::monitor::DoorState;
use crate::ports::{LinkPort, NotifierPort, NotifyError, NotifyOutcome};

/// Socket read timeout for the host transport.
#[cfg(not(target_os = "espidf"))]
const SIM_READ_TIMEOUT_MS: u64 = 2_000;

// ───────────────────────────────────────────────────────────────
// Request composition (pure, shared by both targets)
// ───────────────────────────────────────────────────────────────

/// Resource path for a state report.
pub fn request_path(space_id: u32, state: DoorState) -> String {
    format!("/space_events/{}/{}", space_id, state.action())
}

/// Full request URL as sent on the device.
pub fn request_url(host: &str, space_id: u32, state: DoorState) -> String {
    format!("https://{}{}", host, request_path(space_id, state))
}

/// RFC 7617 `Authorization` header value.
pub fn basic_auth(user: &str, pass: &str) -> String {
    let mut creds = String::with_capacity(user.len() + 1 + pass.len());
    creds.push_str(user);
    creds.push(':');
    creds.push_str(pass);
    format!("Basic {}", STANDARD.encode(creds))
}

/// Statuses the receiver answers with when it accepted the event.
pub fn is_success_status(status: u16) -> bool {
    matches!(status, 200 | 301)
}

/// Extract the status code from an HTTP response status line.
pub fn parse_status_line(line: &str) -> Option<u16> {
    let mut parts = line.split_whitespace();
    if !parts.next()?.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// The receiver's JSON acknowledgement.  Every field is optional: the ack
/// is diagnostics only and absent or malformed bodies are not errors.
#[derive(Debug, Deserialize)]
pub struct EventAck {
    pub id: Option<i64>,
    pub space_id: Option<i64>,
    pub state: Option<heapless::String<16>>,
}

/// Best-effort ack parse.
pub fn parse_event_ack(body: &[u8]) -> Option<EventAck> {
    serde_json::from_slice(body).ok()
}

// ───────────────────────────────────────────────────────────────
// SpaceNotifier
// ───────────────────────────────────────────────────────────────

/// Notifier bound to one endpoint and one space id, owning the link it
/// consults.
pub struct SpaceNotifier<L> {
    link: L,
    space_id: u32,
    host: heapless::String<64>,
    auth_header: String,
}

impl<L: LinkPort> SpaceNotifier<L> {
    /// The Basic auth header is composed once here; credentials are fixed
    /// for the process lifetime.
    pub fn new(link: L, config: &DeviceConfig) -> Self {
        Self {
            link,
            space_id: config.space_id,
            host: config.host.clone(),
            auth_header: basic_auth(&config.auth_user, &config.auth_pass),
        }
    }

    // ── Platform-specific request execution ───────────────────

    #[cfg(target_os = "espidf")]
    fn send(&mut self, state: DoorState) -> Result<u16, NotifyError> {
        use embedded_svc::http::client::Client;
        use embedded_svc::http::{Method, Status};
        use embedded_svc::io::Read as _;
        use esp_idf_svc::http::client::{
            Configuration as HttpConfiguration, EspHttpConnection, FollowRedirectsPolicy,
        };

        let connection = EspHttpConnection::new(&HttpConfiguration {
            follow_redirects_policy: FollowRedirectsPolicy::FollowNone,
            ..Default::default()
        })
        .map_err(|e| {
            warn!("notify: client init failed: {}", e);
            NotifyError::Connect
        })?;
        let mut client = Client::wrap(connection);

        let url = request_url(&self.host, self.space_id, state);
        let headers = [
            ("Authorization", self.auth_header.as_str()),
            ("Content-Length", "0"),
        ];

        let request = client.request(Method::Post, &url, &headers).map_err(|e| {
            warn!("notify: request setup failed: {}", e);
            NotifyError::Request
        })?;
        let mut response = request.submit().map_err(|e| {
            warn!("notify: submit failed: {}", e);
            NotifyError::Request
        })?;
        let status = response.status();

        let mut body = [0u8; 256];
        if let Ok(n) = response.read(&mut body) {
            if let Some(ack) = parse_event_ack(&body[..n]) {
                debug!("notify: ack id={:?} state={:?}", ack.id, ack.state);
            }
        }
        Ok(status)
    }

    #[cfg(not(target_os = "espidf"))]
    fn send(&mut self, state: DoorState) -> Result<u16, NotifyError> {
        use std::io::{BufRead, BufReader, Read as _, Write as _};

        let mut stream = std::net::TcpStream::connect(self.host.as_str()).map_err(|e| {
            warn!("notify(sim): connect to {} failed: {}", self.host, e);
            NotifyError::Connect
        })?;
        stream
            .set_read_timeout(Some(std::time::Duration::from_millis(SIM_READ_TIMEOUT_MS)))
            .map_err(|_| NotifyError::Connect)?;

        let request = format!(
            "POST {} HTTP/1.1\r\nHost: {}\r\nAuthorization: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            request_path(self.space_id, state),
            self.host,
            self.auth_header,
        );
        stream.write_all(request.as_bytes()).map_err(|e| {
            warn!("notify(sim): write failed: {}", e);
            NotifyError::Request
        })?;

        let mut reader = BufReader::new(stream);
        let mut status_line = String::new();
        reader
            .read_line(&mut status_line)
            .map_err(|_| NotifyError::Request)?;
        let status = parse_status_line(status_line.trim_end()).ok_or(NotifyError::Response)?;

        // Drain headers, then whatever body arrives before EOF or timeout.
        let mut line = String::new();
        loop {
            line.clear();
            let n = reader.read_line(&mut line).map_err(|_| NotifyError::Response)?;
            if n == 0 || line == "\r\n" || line == "\n" {
                break;
            }
        }
        let mut body = Vec::new();
        let _ = reader.read_to_end(&mut body);
        if let Some(ack) = parse_event_ack(&body) {
            debug!("notify(sim): ack id={:?} state={:?}", ack.id, ack.state);
        }
        Ok(status)
    }
}

// ───────────────────────────────────────────────────────────────
// NotifierPort
// ───────────────────────────────────────────────────────────────

impl<L: LinkPort> NotifierPort for SpaceNotifier<L> {
    fn notify(&mut self, state: DoorState) -> NotifyOutcome {
        if !self.link.is_usable() {
            info!("notify: link down, door {} not reported", state);
            return NotifyOutcome::SkippedLinkDown;
        }

        match self.send(state) {
            Ok(status) if is_success_status(status) => {
                info!("notify: door {} accepted, status {}", state, status);
                NotifyOutcome::Delivered { status }
            }
            Ok(status) => {
                warn!("notify: door {} rejected, status {}", state, status);
                NotifyOutcome::Failed(NotifyError::RejectedStatus(status))
            }
            Err(e) => {
                warn!("notify: door {} not delivered: {}", state, e);
                NotifyOutcome::Failed(e)
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests (request composition; wire behaviour is covered in tests/)
// ───────────────────────────────────────────────────────────────
