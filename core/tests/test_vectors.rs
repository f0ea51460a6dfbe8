//! Drive `ListClient` through an in-memory transport using the JSON vectors in
//! `test-vectors/`.
//!
//! The fake transport counts how many times its connection is released, so
//! every case also checks that the connection is closed exactly once whatever
//! the outcome.

use std::cell::{Cell, RefCell};
use std::io::{self, BufReader, Cursor, Read};
use std::rc::Rc;

use list_client::{
    ClientConfig, ClientError, HttpMethod, HttpRequest, HttpResponse, ListClient, Transport,
};

const BASE_URL: &str = "http://localhost:8080";

fn client() -> ListClient {
    ListClient::new(ClientConfig {
        base_url: BASE_URL.to_string(),
        timeout: None,
    })
}

/// Stand-in for a socket. Bumps `released` when dropped.
#[derive(Debug)]
struct FakeConnection {
    data: Cursor<Vec<u8>>,
    reset_at_end: bool,
    released: Rc<Cell<usize>>,
}

impl Read for FakeConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data.read(buf)?;
        if n == 0 && self.reset_at_end {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"));
        }
        Ok(n)
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

enum Outcome {
    Respond { status: u16, body: Vec<u8> },
    ResetMidBody { body: String },
    Fail(io::ErrorKind),
}

struct FakeTransport {
    outcome: Outcome,
    released: Rc<Cell<usize>>,
    captured: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            released: Rc::new(Cell::new(0)),
            captured: RefCell::new(Vec::new()),
        }
    }

    fn respond(status: u16, body: &[u8]) -> Self {
        Self::new(Outcome::Respond {
            status,
            body: body.to_vec(),
        })
    }

    fn connect(&self, body: &[u8], reset_at_end: bool) -> FakeConnection {
        FakeConnection {
            data: Cursor::new(body.to_vec()),
            reset_at_end,
            released: Rc::clone(&self.released),
        }
    }

    fn released(&self) -> usize {
        self.released.get()
    }
}

impl Transport for FakeTransport {
    type Body = BufReader<FakeConnection>;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse<Self::Body>, ClientError> {
        self.captured.borrow_mut().push(request.clone());
        match &self.outcome {
            Outcome::Respond { status, body } => Ok(HttpResponse {
                status: *status,
                body: BufReader::new(self.connect(body, false)),
            }),
            Outcome::ResetMidBody { body } => Ok(HttpResponse {
                status: 200,
                body: BufReader::new(self.connect(body.as_bytes(), true)),
            }),
            Outcome::Fail(kind) => {
                let conn = self.connect(b"", false);
                drop(conn);
                Err(ClientError::Io(io::Error::new(*kind, "transport failure")))
            }
        }
    }
}

fn vectors() -> serde_json::Value {
    let raw = include_str!("../../test-vectors/fetch_list.json");
    serde_json::from_str(raw).unwrap()
}

/// `body_bytes` carries raw octets for bodies that are not valid UTF-8.
fn transport_for(case: &serde_json::Value) -> FakeTransport {
    let sim = &case["simulated_response"];
    let body: Vec<u8> = match sim.get("body_bytes") {
        Some(bytes) => bytes
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b.as_u64().unwrap() as u8)
            .collect(),
        None => sim["body"].as_str().unwrap().as_bytes().to_vec(),
    };
    FakeTransport::respond(sim["status"].as_u64().unwrap() as u16, &body)
}

#[test]
fn request_matches_vector() {
    let vectors = vectors();
    let expected = &vectors["expected_request"];
    let transport = FakeTransport::respond(200, b"");

    drop(client().fetch_list(&transport).unwrap());

    let captured = transport.captured.borrow();
    assert_eq!(captured.len(), 1);
    let req = &captured[0];
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.method.as_str(), expected["method"].as_str().unwrap());
    assert_eq!(
        req.url,
        format!("{BASE_URL}{}", expected["path"].as_str().unwrap())
    );
    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers);
}

#[test]
fn fetch_list_test_vectors() {
    for case in vectors()["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let transport = transport_for(case);

        let result = client().fetch_list(&transport);
        match case.get("expected_error_status") {
            Some(status) => {
                let err = result.unwrap_err();
                assert_eq!(err.status(), Some(status.as_u64().unwrap() as u16), "{name}: status");
            }
            None => {
                let response = result.unwrap();
                assert_eq!(response.status, 200, "{name}: status");
                assert_eq!(transport.released(), 0, "{name}: released before read");
                let lines: Vec<String> = response.lines.collect::<Result<_, _>>().unwrap();
                let expected: Vec<String> =
                    serde_json::from_value(case["expected_lines"].clone()).unwrap();
                assert_eq!(lines, expected, "{name}: lines");
            }
        }
        assert_eq!(transport.released(), 1, "{name}: released");
    }
}

#[test]
fn fetch_and_print_test_vectors() {
    for case in vectors()["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let transport = transport_for(case);
        let mut out = Vec::new();

        let result = client().fetch_and_print(&transport, &mut out);
        assert_eq!(
            case.get("expected_error_status").is_some(),
            result.is_err(),
            "{name}: outcome"
        );
        if let Some(lines) = case.get("expected_lines") {
            assert_eq!(result.unwrap(), lines.as_array().unwrap().len(), "{name}: count");
        }
        assert_eq!(
            String::from_utf8(out).unwrap(),
            case["expected_output"].as_str().unwrap(),
            "{name}: output"
        );
        assert_eq!(transport.released(), 1, "{name}: released");
    }
}

#[test]
fn transport_failure_releases_once_and_prints_nothing() {
    let transport = FakeTransport::new(Outcome::Fail(io::ErrorKind::ConnectionRefused));
    let mut out = Vec::new();

    let err = client().fetch_and_print(&transport, &mut out).unwrap_err();

    assert!(matches!(err, ClientError::Io(ref e) if e.kind() == io::ErrorKind::ConnectionRefused));
    assert!(out.is_empty());
    assert_eq!(transport.released(), 1);
}

#[test]
fn reset_mid_body_yields_io_error_after_received_lines() {
    let transport = FakeTransport::new(Outcome::ResetMidBody {
        body: "a\nb".to_string(),
    });

    let mut lines = client().fetch_list(&transport).unwrap().lines;
    assert_eq!(lines.next().unwrap().unwrap(), "a");
    assert!(matches!(lines.next(), Some(Err(ClientError::Io(_)))));
    drop(lines);

    assert_eq!(transport.released(), 1);
}

#[test]
fn reset_mid_body_keeps_lines_already_printed() {
    let transport = FakeTransport::new(Outcome::ResetMidBody {
        body: "a\nb".to_string(),
    });
    let mut out = Vec::new();

    let err = client().fetch_and_print(&transport, &mut out).unwrap_err();

    assert!(matches!(err, ClientError::Io(_)));
    assert_eq!(String::from_utf8(out).unwrap(), "Output from Server .... \n\na\n");
    assert_eq!(transport.released(), 1);
}

#[test]
fn each_fetch_opens_its_own_connection() {
    let transport = FakeTransport::respond(200, b"x\n");
    let client = client();

    for _ in 0..3 {
        let lines: Vec<String> = client
            .fetch_list(&transport)
            .unwrap()
            .lines
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines, ["x"]);
    }

    assert_eq!(transport.captured.borrow().len(), 3);
    assert_eq!(transport.released(), 3);
}
