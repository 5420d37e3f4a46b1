//! Response abstraction module
//!
//! A writable response the core and handlers share: status, settable
//! headers, and an append-only text sink. Converted to a hyper response
//! by the host adapter after dispatch completes.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Writable response consumed by handlers and the dispatch boundary
#[derive(Debug, Clone)]
pub struct WebResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl Default for WebResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl WebResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Set a header, replacing any existing value under the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let Some(existing) = self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            existing.1 = value.to_string();
        } else {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Append text to the response body.
    pub fn write(&mut self, text: &str) {
        self.body.push_str(text);
    }

    /// Discard anything already written and set the body to `text`.
    ///
    /// Used by the dispatch boundary so a failing handler cannot leak a
    /// partial body alongside the error text.
    pub fn replace_body(&mut self, text: &str) {
        self.body.clear();
        self.body.push_str(text);
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Convert into a hyper response for the host container.
    pub fn into_hyper(self) -> Response<Full<Bytes>> {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut builder = Response::builder().status(status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .header("Content-Length", self.body.len())
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|e| {
                crate::logger::log_error(&format!("Failed to build response: {e}"));
                Response::new(Full::new(Bytes::new()))
            })
    }
}
