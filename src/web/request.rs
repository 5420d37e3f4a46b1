//! Request abstraction module
//!
//! A decoded view of an inbound request: method, URI path, and named
//! string parameters merged from the query string and a urlencoded form
//! body. The dispatch core never touches raw HTTP bytes; the host adapter
//! builds this once per request.

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::Request;
use std::collections::HashMap;

/// Decoded request consumed by the dispatcher and handlers
#[derive(Debug, Clone)]
pub struct WebRequest {
    method: String,
    path: String,
    query: Option<String>,
    params: HashMap<String, String>,
}

impl WebRequest {
    /// Create a request with the given URI path and no parameters.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            path: path.into(),
            query: None,
            params: HashMap::new(),
        }
    }

    /// Add a named parameter; the first value for a name wins.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.entry(name.into()).or_insert_with(|| value.into());
        self
    }

    /// Build a request from hyper parts, collecting the body when it is
    /// `application/x-www-form-urlencoded`.
    ///
    /// Query parameters take precedence over form parameters; for a
    /// repeated name the first value wins.
    pub async fn from_hyper(req: Request<Incoming>) -> Result<Self, hyper::Error> {
        let method = req.method().as_str().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(ToString::to_string);

        let is_form = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

        let mut params = HashMap::new();
        if let Some(q) = &query {
            merge_urlencoded(&mut params, q.as_bytes());
        }
        if is_form {
            let body = req.into_body().collect().await?.to_bytes();
            merge_urlencoded(&mut params, &body);
        }

        Ok(Self {
            method,
            path,
            query,
            params,
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request URI path, before any context-path stripping.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Look up a named parameter value.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Decode a urlencoded byte run into the parameter map, first value wins
fn merge_urlencoded(params: &mut HashMap<String, String>, input: &[u8]) {
    for (name, value) in url::form_urlencoded::parse(input) {
        params
            .entry(name.into_owned())
            .or_insert_with(|| value.into_owned());
    }
}
