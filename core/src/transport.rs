//! Moving an `HttpRequest` over the wire.
//!
//! `Transport` is the single I/O seam of the crate. `UreqTransport` is the
//! production implementation; tests substitute doubles that record whether
//! their connection was closed.

use std::io::{self, BufRead, BufReader, Read};
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Sends one request and returns the response with its body still unread.
///
/// The returned body owns the connection. Implementations must release the
/// connection when the body is dropped, and must release it themselves
/// before returning an error.
pub trait Transport {
    type Body: BufRead;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse<Self::Body>, ClientError>;
}

/// A body stream that owns its connection and releases it on drop.
#[derive(Debug)]
pub struct Connection<R> {
    inner: R,
}

impl<R> Connection<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> Read for Connection<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: BufRead> BufRead for Connection<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl<R> Drop for Connection<R> {
    fn drop(&mut self) {
        trace!("connection released");
    }
}

/// Blocking transport backed by `ureq`.
///
/// A fresh agent is built for every request, so no connection is pooled or
/// reused across calls. With `timeout` unset the agent has no global
/// deadline and a silent server blocks the caller.
#[derive(Debug, Clone, Default)]
pub struct UreqTransport {
    timeout: Option<Duration>,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Status codes are returned as data; `ListClient` decides what is
    /// acceptable.
    fn agent(&self) -> ureq::Agent {
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(self.timeout)
            .max_idle_connections(0)
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    type Body = Connection<BufReader<ureq::BodyReader<'static>>>;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse<Self::Body>, ClientError> {
        let agent = self.agent();
        let mut builder = match request.method {
            HttpMethod::Get => agent.get(request.url.as_str()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = builder.call().map_err(map_ureq_error)?;

        let status = response.status().as_u16();
        let body = Connection::new(BufReader::new(response.into_body().into_reader()));

        Ok(HttpResponse { status, body })
    }
}

/// Sort `ureq` failures into connection-level and protocol-level errors.
fn map_ureq_error(err: ureq::Error) -> ClientError {
    let message = err.to_string();
    match err {
        ureq::Error::Io(e) => ClientError::Io(e),
        ureq::Error::Timeout(_) => ClientError::Io(io::Error::new(io::ErrorKind::TimedOut, message)),
        ureq::Error::ConnectionFailed => {
            ClientError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, message))
        }
        ureq::Error::HostNotFound => ClientError::Io(io::Error::new(io::ErrorKind::NotFound, message)),
        ureq::Error::StatusCode(status) => ClientError::UnexpectedStatus { status },
        _ => ClientError::Protocol(message),
    }
}
