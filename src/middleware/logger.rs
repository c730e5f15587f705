//! One structured log record per HTTP request.
//!
//! [`HttpLogger`] swaps the request's writer for a [`ResponseRecorder`],
//! runs the rest of the chain, then emits a single event:
//!
//! ```text
//! INFO  received a HTTP request protocol="http" method=GET path=/ status_code=200 status_text="OK" duration=0.41
//! ERROR received a HTTP request protocol="http" method=POST path=/snippet/create status_code=500 status_text="Internal Server Error" duration=3.2 body=boom
//! ```
//!
//! `duration` is in milliseconds. `body` is only present when the status is
//! not `200`, and holds the bytes of the last body write.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::HeaderMap;
use tracing::{Dispatch, error, info};

use super::Middleware;
use crate::handler::{BoxFuture, BoxedService, Service};
use crate::request::Request;
use crate::status;
use crate::writer::ResponseWriter;

const PROTOCOL: &str = "http";
const OK: u16 = 200;

/// Request-logging middleware.
///
/// Records go to the process-wide `tracing` dispatcher unless one is supplied
/// with [`HttpLogger::with_dispatch`].
#[derive(Clone, Default)]
pub struct HttpLogger {
    dispatch: Option<Dispatch>,
}

impl HttpLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit every record into `dispatch` instead of the global default.
    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self { dispatch: Some(dispatch) }
    }
}

impl Middleware for HttpLogger {
    fn wrap(&self, next: BoxedService) -> BoxedService {
        Arc::new(HttpLoggerService { next, dispatch: self.dispatch.clone() })
    }
}

/// The service produced by [`HttpLogger`].
pub struct HttpLoggerService {
    next: BoxedService,
    dispatch: Option<Dispatch>,
}

impl HttpLoggerService {
    fn emit(&self, record: &RequestRecord) {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, || record.emit()),
            None => record.emit(),
        }
    }
}

impl Service for HttpLoggerService {
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let start = Instant::now();
            let method = req.method().to_owned();
            let path = req.uri().to_owned();

            let mut recorder = ResponseRecorder::new(w);
            self.next.serve(req, &mut recorder).await;

            let record = recorder.finish(method, path, start.elapsed());
            self.emit(&record);
        })
    }
}

// ── Recorder ──────────────────────────────────────────────────────────────────

/// A [`ResponseWriter`] that forwards every call to the wrapped writer and
/// remembers the committed status and, for non-`200` responses, the last
/// chunk of body written.
pub struct ResponseRecorder<'w> {
    inner: &'w mut dyn ResponseWriter,
    status: Option<u16>,
    last_write: Vec<u8>,
}

impl<'w> ResponseRecorder<'w> {
    pub fn new(inner: &'w mut dyn ResponseWriter) -> Self {
        Self { inner, status: None, last_write: Vec::new() }
    }

    /// The committed status; `200` until one is written.
    pub fn status(&self) -> u16 {
        self.status.unwrap_or(OK)
    }

    /// Bytes of the most recent `write`, kept only for non-`200` responses.
    pub fn last_write(&self) -> &[u8] {
        &self.last_write
    }

    pub fn finish(self, method: String, path: String, duration: Duration) -> RequestRecord {
        let status = self.status();
        let body = (status != OK).then_some(self.last_write);
        RequestRecord { method, path, status, duration, body }
    }
}

impl ResponseWriter for ResponseRecorder<'_> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_header(&mut self, status: u16) {
        if self.status.is_none() {
            self.status = Some(status);
        }
        self.inner.write_header(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // The status cannot change once bytes are flowing, so 200s never copy.
        if *self.status.get_or_insert(OK) != OK {
            self.last_write.clear();
            self.last_write.extend_from_slice(buf);
        }
        self.inner.write(buf)
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// What one request looked like from the outside.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    pub method: String,
    /// Raw request target, query included.
    pub path: String,
    pub status: u16,
    pub duration: Duration,
    /// Last body write; `Some` exactly when `status != 200`.
    pub body: Option<Vec<u8>>,
}

impl RequestRecord {
    pub fn status_text(&self) -> &'static str {
        status::reason(self.status)
    }

    /// Emits the record to the current `tracing` dispatcher: `INFO` for
    /// `200`, `ERROR` with a `body` field for anything else.
    pub fn emit(&self) {
        let duration = self.duration.as_secs_f64() * 1_000.0;
        match &self.body {
            None => info!(
                protocol = PROTOCOL,
                method = %self.method,
                path = %self.path,
                status_code = self.status,
                status_text = self.status_text(),
                duration,
                "received a HTTP request"
            ),
            Some(body) => error!(
                protocol = PROTOCOL,
                method = %self.method,
                path = %self.path,
                status_code = self.status,
                status_text = self.status_text(),
                duration,
                body = %String::from_utf8_lossy(body),
                "received a HTTP request"
            ),
        }
    }
}
