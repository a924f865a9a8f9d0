//! Shared test fixtures for the market SDK integration tests.
//!
//! Provides sample records, a registry-shaped JSON body, and `StubServer`, a
//! loopback HTTP server that answers a fixed sequence of canned responses and
//! records each request target.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use agrimarket_sdk::MarketRecord;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

pub fn record(
    market: &str,
    commodity: &str,
    district: &str,
    state: &str,
    coords: Option<(&str, &str)>,
) -> MarketRecord {
    MarketRecord {
        state: state.to_string(),
        district: district.to_string(),
        market: market.to_string(),
        commodity: commodity.to_string(),
        modal_price: Some(1500.0),
        latitude: coords.map(|c| c.0.to_string()),
        longitude: coords.map(|c| c.1.to_string()),
        ..Default::default()
    }
}

/// Pune and Nashik carry coordinates (about 165 km apart); Azadpur does not;
/// the last record has an empty state.
pub fn sample_records() -> Vec<MarketRecord> {
    vec![
        record("Pune", "Onion", "Pune", "Maharashtra", Some(("18.52", "73.85"))),
        record("Nashik", "Onion", "Nashik", "Maharashtra", Some(("20.0", "73.78"))),
        record("Azadpur", "Tomato", "North Delhi", "NCT of Delhi", None),
        record("Kolar", "Tomato", "Kolar", "", Some(("13.13", "78.13"))),
    ]
}

/// A registry response body in the Agmarknet shape (string prices).
pub fn registry_body() -> Value {
    json!({
        "status": "ok",
        "total": 120,
        "count": 4,
        "records": [
            {
                "state": "Maharashtra", "district": "Pune", "market": "Pune",
                "commodity": "Onion", "variety": "Red", "grade": "FAQ",
                "arrival_date": "17/10/2026",
                "min_price": "1200", "max_price": "2000", "modal_price": "1650",
                "latitude": "18.52", "longitude": "73.85"
            },
            {
                "state": "Maharashtra", "district": "Nashik", "market": "Lasalgaon",
                "commodity": "Onion", "variety": "Red", "grade": "FAQ",
                "arrival_date": "17/10/2026",
                "min_price": "1100", "max_price": "1900", "modal_price": "1500",
                "latitude": "20.15", "longitude": "74.23"
            },
            {
                "state": "NCT of Delhi", "district": "North Delhi", "market": "Azadpur",
                "commodity": "Tomato", "variety": "Hybrid", "grade": "FAQ",
                "arrival_date": "17/10/2026",
                "min_price": "800", "max_price": "1600", "modal_price": "1200"
            },
            {
                "state": "Karnataka", "district": "Kolar", "market": "Kolar",
                "commodity": "Tomato", "variety": "Local", "grade": "FAQ",
                "arrival_date": "17/10/2026",
                "min_price": "600", "max_price": "1400", "modal_price": "1000"
            }
        ]
    })
}

// ---------------------------------------------------------------------------
// StubServer
// ---------------------------------------------------------------------------

/// Loopback HTTP server answering canned `(status, body)` responses in
/// connection order, one per connection.
pub struct StubServer {
    pub base_url: String,
    targets: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn serve(responses: Vec<(u16, String)>) -> Self {
        Self::serve_delayed(
            responses
                .into_iter()
                .map(|(status, body)| (status, body, Duration::ZERO))
                .collect(),
        )
    }

    /// Like [`serve`](Self::serve), but each response is held back for its
    /// delay. Connections are answered concurrently, so a delayed response
    /// does not hold up the ones accepted after it.
    pub fn serve_delayed(responses: Vec<(u16, String, Duration)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let targets = Arc::new(Mutex::new(Vec::new()));
        let seen = targets.clone();

        thread::spawn(move || {
            for (status, body, delay) in responses {
                let (stream, _) = match listener.accept() {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let seen = seen.clone();
                thread::spawn(move || answer(stream, &seen, status, &body, delay));
            }
        });

        Self {
            base_url: format!("http://{}/resource/test-resource", addr),
            targets,
        }
    }

    /// Serve a single 200 response with `body`.
    pub fn ok(body: &Value) -> Self {
        Self::serve(vec![(200, body.to_string())])
    }

    /// Decoded query parameters of each request received so far.
    pub fn queries(&self) -> Vec<Vec<(String, String)>> {
        self.targets
            .lock()
            .unwrap()
            .iter()
            .map(|t| {
                let url = reqwest::Url::parse(&format!("http://stub{}", t)).unwrap();
                url.query_pairs()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.targets.lock().unwrap().len()
    }
}

fn answer(
    mut stream: TcpStream,
    seen: &Mutex<Vec<String>>,
    status: u16,
    body: &str,
    delay: Duration,
) {
    let head = read_head(&mut stream);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    seen.lock().unwrap().push(target);
    thread::sleep(delay);

    let reason = if status < 400 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn read_head(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/resource/test-resource", addr)
}
