//! Wire tests: SpaceNotifier against a real local TCP listener.
//!
//! These exercise the host transport end to end: request line, headers,
//! empty body, and status handling for accepted, redirected and rejected
//! responses.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;

use doorsign::adapters::notifier::SpaceNotifier;
use doorsign::config::DeviceConfig;
use doorsign::monitor::DoorState;
use doorsign::ports::{LinkPort, NotifierPort, NotifyError, NotifyOutcome};

// ── Harness ───────────────────────────────────────────────────

struct UpLink;
impl LinkPort for UpLink {
    fn is_usable(&mut self) -> bool {
        true
    }
}

struct DownLink;
impl LinkPort for DownLink {
    fn is_usable(&mut self) -> bool {
        false
    }
}

fn config_for(host: &str) -> DeviceConfig {
    DeviceConfig {
        space_id: 7,
        auth_user: "door".try_into().unwrap(),
        auth_pass: "secret".try_into().unwrap(),
        host: host.try_into().unwrap(),
        ..DeviceConfig::default()
    }
}

/// Accepts one connection, reads the request head, answers with `response`
/// and closes.  Returns the raw request head.
fn serve_one(listener: TcpListener, response: String) -> JoinHandle<String> {
    std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut head = String::new();
        loop {
            let mut line = String::new();
            let n = reader.read_line(&mut line).unwrap();
            if n == 0 || line == "\r\n" || line == "\n" {
                break;
            }
            head.push_str(&line);
        }

        let mut stream: TcpStream = reader.into_inner();
        stream.write_all(response.as_bytes()).unwrap();
        head
    })
}

fn response_with_body(status_line: &str, body: &str) -> String {
    format!(
        "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}

/// Runs one notify against a one-shot local server; returns the request
/// head the server saw and the outcome.
fn notify_against(response: String, state: DoorState) -> (String, NotifyOutcome) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
    let server = serve_one(listener, response);

    let mut notifier = SpaceNotifier::new(UpLink, &config_for(&host));
    let outcome = notifier.notify(state);
    let head = server.join().unwrap();
    (head, outcome)
}

// ── Request shape ─────────────────────────────────────────────

#[test]
fn open_report_has_expected_request_shape() {
    let ack = r#"{"id":1,"space_id":7,"timestamp":1724500000,"state":"open"}"#;
    let (head, outcome) = notify_against(
        response_with_body("HTTP/1.1 200 OK", ack),
        DoorState::Open,
    );

    let request_line = head.lines().next().unwrap();
    assert_eq!(request_line, "POST /space_events/7/open HTTP/1.1");
    assert!(head.contains("Authorization: Basic ZG9vcjpzZWNyZXQ="));
    assert!(head.contains("Content-Length: 0"));
    assert_eq!(outcome, NotifyOutcome::Delivered { status: 200 });
}

#[test]
fn close_report_uses_close_segment() {
    let ack = r#"{"id":2,"space_id":7,"timestamp":1724500060,"state":"closed"}"#;
    let (head, outcome) = notify_against(
        response_with_body("HTTP/1.1 200 OK", ack),
        DoorState::Closed,
    );

    let request_line = head.lines().next().unwrap();
    assert_eq!(request_line, "POST /space_events/7/close HTTP/1.1");
    assert_eq!(outcome, NotifyOutcome::Delivered { status: 200 });
}

// ── Status handling ───────────────────────────────────────────

#[test]
fn moved_permanently_counts_as_delivered() {
    let (_, outcome) = notify_against(
        "HTTP/1.1 301 Moved Permanently\r\nLocation: https://elsewhere/\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
        DoorState::Open,
    );
    assert_eq!(outcome, NotifyOutcome::Delivered { status: 301 });
    assert!(outcome.is_delivered());
}

#[test]
fn server_error_is_a_rejected_status() {
    let (_, outcome) = notify_against(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string(),
        DoorState::Open,
    );
    assert_eq!(
        outcome,
        NotifyOutcome::Failed(NotifyError::RejectedStatus(500))
    );
    assert!(!outcome.is_delivered());
}

#[test]
fn garbage_status_line_is_a_response_error() {
    let (_, outcome) = notify_against("WAT\r\n\r\n".to_string(), DoorState::Open);
    assert_eq!(outcome, NotifyOutcome::Failed(NotifyError::Response));
}

#[test]
fn repeat_reports_are_sent_independently() {
    // The notifier keeps no memory of what it already sent: the same state
    // twice in a row produces two full requests.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());

    let server = std::thread::spawn(move || {
        let mut heads = Vec::new();
        for _ in 0..2 {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut head = String::new();
            loop {
                let mut line = String::new();
                let n = reader.read_line(&mut line).unwrap();
                if n == 0 || line == "\r\n" || line == "\n" {
                    break;
                }
                head.push_str(&line);
            }
            let mut stream: TcpStream = reader.into_inner();
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .unwrap();
            heads.push(head);
        }
        heads
    });

    let mut notifier = SpaceNotifier::new(UpLink, &config_for(&host));
    assert_eq!(
        notifier.notify(DoorState::Closed),
        NotifyOutcome::Delivered { status: 200 }
    );
    assert_eq!(
        notifier.notify(DoorState::Closed),
        NotifyOutcome::Delivered { status: 200 }
    );

    let heads = server.join().unwrap();
    assert_eq!(heads.len(), 2);
    for head in &heads {
        assert!(head.starts_with("POST /space_events/7/close HTTP/1.1"));
    }
}

// ── Transport failures ────────────────────────────────────────

#[test]
fn refused_connection_is_a_connect_error() {
    // Bind to learn a free port, then close the listener again.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
    drop(listener);

    let mut notifier = SpaceNotifier::new(UpLink, &config_for(&host));
    assert_eq!(
        notifier.notify(DoorState::Open),
        NotifyOutcome::Failed(NotifyError::Connect)
    );
}

#[test]
fn link_down_skips_without_touching_the_network() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
    listener.set_nonblocking(true).unwrap();

    let mut notifier = SpaceNotifier::new(DownLink, &config_for(&host));
    assert_eq!(
        notifier.notify(DoorState::Open),
        NotifyOutcome::SkippedLinkDown
    );

    // No connection may have been attempted.
    assert!(
        listener.accept().is_err(),
        "skip must not open a connection"
    );
}
