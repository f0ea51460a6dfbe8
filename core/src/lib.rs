//! Blocking client for the todo-list service's `/list` endpoint.
//!
//! # Overview
//! Issues one `GET /list` with `accept: application/json`, insists on a 200,
//! and streams the body back line by line. Also provides the time-stamped
//! heading used by the list views.
//!
//! # Design
//! - `ListClient` is stateless; it holds only a `ClientConfig`.
//! - All network I/O goes through the `Transport` trait. `UreqTransport`
//!   builds a fresh agent per request, so nothing is pooled.
//! - The response body owns its connection. Dropping the body, on any path,
//!   releases it.
//! - Failures are returned as `ClientError`; the binary decides to report
//!   and exit normally.

pub mod client;
pub mod error;
pub mod http;
pub mod time;
pub mod transport;

pub use client::{print_lines, BodyLines, ClientConfig, ListClient, ListResponse, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use time::{time_message, TIME_MESSAGE_PREFIX};
pub use transport::{Connection, Transport, UreqTransport};
