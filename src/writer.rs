//! The response-writing capability handed to every [`Service`](crate::Service).
//!
//! Handlers return [`Response`](crate::Response) values; the router turns
//! those into calls on a [`ResponseWriter`]. Middleware sees the writer, not
//! the value, so it can observe or decorate the response as it is produced.
//!
//! Every implementation follows the same commit rules:
//!
//! - the first [`write_header`](ResponseWriter::write_header) commits the
//!   status; later calls are ignored,
//! - a [`write`](ResponseWriter::write) with no status yet commits `200 OK`,
//! - header changes made after the commit never reach the client.

use std::io;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use tracing::{error, warn};

/// A sink for one HTTP response.
pub trait ResponseWriter: Send {
    /// Headers that will be sent when the status is committed.
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sets the status code. Only the first call has any effect.
    fn write_header(&mut self, status: u16);

    /// Appends body bytes, committing `200 OK` if no status was set.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
}

/// In-memory [`ResponseWriter`] the server hands to the service chain.
///
/// Converted into a hyper response once the chain returns.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    headers: HeaderMap,
    committed: Option<(u16, HeaderMap)>,
    body: BytesMut,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed status, or `None` if nothing has been written yet.
    pub fn status(&self) -> Option<u16> {
        self.committed.as_ref().map(|(status, _)| *status)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Headers as they will be sent: the commit-time snapshot once the status
    /// is committed, the live map before that.
    pub fn sent_headers(&self) -> &HeaderMap {
        match &self.committed {
            Some((_, headers)) => headers,
            None => &self.headers,
        }
    }

    fn commit(&mut self, status: u16) {
        self.committed = Some((status, self.headers.clone()));
    }

    pub fn into_hyper(self) -> http::Response<Full<Bytes>> {
        let (status, headers) = self.committed.unwrap_or((200, self.headers));
        let status = StatusCode::from_u16(status).unwrap_or_else(|_| {
            error!(status, "invalid status code written, sending 500");
            StatusCode::INTERNAL_SERVER_ERROR
        });

        let mut response = http::Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl ResponseWriter for ResponseBuffer {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: u16) {
        if let Some(current) = self.status() {
            warn!(current, ignored = status, "superfluous write_header call");
            return;
        }
        self.commit(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.committed.is_none() {
            self.commit(200);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}
