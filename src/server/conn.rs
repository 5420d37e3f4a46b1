//! Connection handling module
//!
//! Serves one accepted TCP stream over HTTP/1.1 and adapts between hyper
//! types and the dispatch core's request/response abstractions. This is
//! the only place that touches raw transport concerns.

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::logger::{self, AccessLogEntry};
use crate::web::{WebRequest, WebResponse};

/// Handle a single connection in a spawned task.
pub(super) fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    config: Arc<Config>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let keep_alive = config.performance.keep_alive_timeout > 0;
        let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
            config.performance.read_timeout,
            config.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        if keep_alive {
            builder.keep_alive(true);
        }

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let dispatcher = Arc::clone(&dispatcher);
                let config = Arc::clone(&config);
                async move { serve_request(req, peer_addr, &dispatcher, &config).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }
    });
}

/// Decode the request, run it through the dispatcher, and emit the access
/// log entry.
async fn serve_request(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    dispatcher: &Dispatcher,
    config: &Config,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let request = match WebRequest::from_hyper(req).await {
        Ok(request) => request,
        Err(err) => {
            logger::log_error(&format!("Failed to read request from {peer_addr}: {err}"));
            let mut response = WebResponse::new();
            response.set_status(400);
            response.write("400 Bad Request");
            return Ok(response.into_hyper());
        }
    };

    let response = dispatcher.dispatch(&request);

    if config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            request.method().to_string(),
            request.path().to_string(),
        );
        entry.query = request.query().map(ToString::to_string);
        entry.status = response.status();
        entry.body_bytes = response.body_len();
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &config.logging.access_log_format);
    }

    Ok(response.into_hyper())
}
