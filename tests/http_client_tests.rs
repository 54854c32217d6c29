//! Drives the blocking HTTP client against a one-shot local responder.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use dangerscan::{
    CheckError, CheckOutcome, CheckerConfig, DomainChecker, HttpReputationClient,
    ReputationClient, RetryPolicy, RunTally, ThreadSleeper,
};

/// Serves a single canned response and reports the request line it received.
fn serve_once(content_type: &str, body: &str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/status", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        content_type,
        body.len(),
        body
    );
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }

        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        tx.send(request_line.trim_end().to_string()).unwrap();
    });

    (endpoint, rx)
}

/// Answers the first read on a connection with `reply`, whatever the client sent.
fn serve_raw(reply: &'static [u8]) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf);
        let _ = stream.write_all(reply);
        let _ = stream.flush();
    });

    port
}

fn config(endpoint: String) -> CheckerConfig {
    CheckerConfig {
        endpoint,
        request_timeout: Duration::from_secs(5),
        ..CheckerConfig::default()
    }
}

#[test]
fn test_fetch_reports_status_content_type_and_body() {
    let (endpoint, requests) = serve_once("application/json", ")]}'\n{\"flag\":false}");
    let client = HttpReputationClient::new(&config(endpoint)).unwrap();

    let response = client.fetch("example.com").unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    assert_eq!(response.body, ")]}'\n{\"flag\":false}");
    assert!(response.headers.contains("content-type"));
    assert_eq!(
        requests.recv().unwrap(),
        "GET /status?site=example.com HTTP/1.1"
    );
}

#[test]
fn test_checker_over_http_flags_dangerous_domain() {
    let (endpoint, _requests) = serve_once("application/json", r#"{"cbsd":[{"b":1,"r":"true"}]}"#);
    let client = HttpReputationClient::new(&config(endpoint)).unwrap();
    let checker = DomainChecker::new(client, ThreadSleeper, RetryPolicy::new(3, Duration::ZERO));
    let mut tally = RunTally::new();

    assert_eq!(checker.check("evil.com", &mut tally), CheckOutcome::Dangerous);
    assert_eq!(tally.dangerous, vec!["evil.com"]);
}

#[test]
fn test_checker_over_http_rejects_html() {
    let (endpoint, _requests) = serve_once("text/html; charset=utf-8", "<html>true</html>");
    let client = HttpReputationClient::new(&config(endpoint)).unwrap();
    let checker = DomainChecker::new(client, ThreadSleeper, RetryPolicy::new(3, Duration::ZERO));
    let mut tally = RunTally::new();

    assert_eq!(checker.check("example.com", &mut tally), CheckOutcome::Invalid);
    assert!(tally.dangerous.is_empty());
    assert!(tally.skipped.is_empty());
}

#[test]
fn test_connection_refused_is_a_request_failure() {
    // Bind then drop to get a port with nothing listening.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client =
        HttpReputationClient::new(&config(format!("http://127.0.0.1:{}/status", port))).unwrap();

    let err = client.fetch("example.com").unwrap_err();
    assert!(matches!(err, CheckError::Request(_)), "unexpected error: {:?}", err);
    assert!(!err.is_retryable());
}

#[test]
fn test_plain_http_reply_to_https_is_transient_tls_failure() {
    let port = serve_raw(b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}");
    let client =
        HttpReputationClient::new(&config(format!("https://127.0.0.1:{}/status", port))).unwrap();

    let err = client.fetch("example.com").unwrap_err();
    assert!(
        matches!(err, CheckError::TransientTransport(_)),
        "unexpected error: {:?}",
        err
    );
    assert!(err.is_retryable());
}
