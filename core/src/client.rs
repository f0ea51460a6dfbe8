//! Request builder and response handling for the list endpoint.
//!
//! # Design
//! `ListClient` holds only its `ClientConfig` and carries no state between
//! calls. `build_fetch_list` produces the request as data; `fetch_list` runs
//! it through a caller-supplied `Transport` and applies the status rule. The
//! body is handed back as a lazy `BodyLines` iterator so lines can be printed
//! as they arrive.

use std::io::{BufRead, Write};
use std::time::Duration;

use tracing::warn;

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::Transport;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

const LIST_PATH: &str = "/list";
const EXPECTED_STATUS: u16 = 200;
const BANNER: &str = "Output from Server .... \n";

/// Where the client points and how long it is willing to wait.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` means no deadline: a server that never answers blocks the
    /// caller indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Synchronous, stateless client for the list endpoint.
#[derive(Debug, Clone)]
pub struct ListClient {
    config: ClientConfig,
}

/// A 200 response whose body has not been consumed yet.
#[derive(Debug)]
pub struct ListResponse<B> {
    pub status: u16,
    pub lines: BodyLines<B>,
}

/// Lazy, single-pass iterator over the lines of a response body.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing the line. Owns the body, and with it the connection; the
/// connection is released when the iterator is dropped.
#[derive(Debug)]
pub struct BodyLines<B> {
    body: B,
}

impl<B: BufRead> BodyLines<B> {
    pub fn new(body: B) -> Self {
        Self { body }
    }
}

impl<B: BufRead> Iterator for BodyLines<B> {
    type Item = Result<String, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.body.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&buf).into_owned()))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl ListClient {
    pub fn new(mut config: ClientConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_fetch_list(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{LIST_PATH}", self.config.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }

    /// Send the list request and check the status.
    ///
    /// A non-200 response is dropped unread, which releases its connection.
    pub fn fetch_list<T: Transport>(
        &self,
        transport: &T,
    ) -> Result<ListResponse<T::Body>, ClientError> {
        let request = self.build_fetch_list();
        let response = transport.send(&request)?;
        check_status(response.status)?;
        Ok(ListResponse {
            status: response.status,
            lines: BodyLines::new(response.body),
        })
    }

    /// Fetch the list and copy it to `out`: a banner, then each body line as
    /// it is read. Nothing is written unless the status check passes.
    pub fn fetch_and_print<T: Transport, W: Write>(
        &self,
        transport: &T,
        out: &mut W,
    ) -> Result<usize, ClientError> {
        let response = self.fetch_list(transport)?;
        writeln!(out, "{BANNER}")?;
        print_lines(response.lines, out)
    }
}

/// Write each line to `out` as soon as it is read. Returns how many lines
/// were written.
pub fn print_lines<B: BufRead, W: Write>(
    lines: BodyLines<B>,
    out: &mut W,
) -> Result<usize, ClientError> {
    let mut count = 0;
    for line in lines {
        writeln!(out, "{}", line?)?;
        out.flush()?;
        count += 1;
    }
    Ok(count)
}

fn check_status(status: u16) -> Result<(), ClientError> {
    if status == EXPECTED_STATUS {
        return Ok(());
    }
    warn!(status, "list request rejected");
    Err(ClientError::UnexpectedStatus { status })
}
