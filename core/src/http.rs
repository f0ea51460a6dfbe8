//! HTTP request and response types exchanged with a `Transport`.
//!
//! # Design
//! The request is plain data built by `ListClient`. The response carries its
//! body as a `BufRead` stream rather than a `String`: the body owns the
//! underlying connection, so the connection is released when the body is
//! dropped, whichever way the caller exits.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response whose body has not been read yet.
///
/// `body` is consumed at most once. Dropping the response releases the
/// connection it was read from.
#[derive(Debug)]
pub struct HttpResponse<B> {
    pub status: u16,
    pub body: B,
}
