//! Incoming HTTP request type.

use std::collections::HashMap;
use std::net::SocketAddr;

use http_body_util::BodyExt;

/// An incoming HTTP request with its body fully read.
pub struct Request {
    pub(crate) method: String,
    pub(crate) uri: String,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
    pub(crate) params: HashMap<String, String>,
    pub(crate) remote_addr: Option<SocketAddr>,
}

impl Request {
    /// Builds a request from its parts. `uri` is the raw request target as it
    /// appeared on the request line (`/snippet/view/1?x=y`).
    pub fn new(
        method: impl Into<String>,
        uri: impl Into<String>,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    ) -> Self {
        let uri = uri.into();
        let path = match uri.parse::<http::Uri>() {
            Ok(parsed) => parsed.path().to_owned(),
            Err(_) => uri.split('?').next().unwrap_or_default().to_owned(),
        };
        Self {
            method: method.into(),
            uri,
            path,
            headers,
            body,
            params: HashMap::new(),
            remote_addr: None,
        }
    }

    /// Reads the whole body off a hyper request.
    pub(crate) async fn from_hyper(
        req: hyper::Request<hyper::body::Incoming>,
        remote_addr: SocketAddr,
    ) -> Result<Self, hyper::Error> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes().to_vec();
        Ok(Self::from_parts(&parts, body, Some(remote_addr)))
    }

    pub(crate) fn from_parts(
        parts: &http::request::Parts,
        body: Vec<u8>,
        remote_addr: Option<SocketAddr>,
    ) -> Self {
        let headers = parts
            .headers
            .iter()
            .map(|(k, v)| (k.as_str().to_owned(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        let mut req = Self::new(parts.method.as_str(), request_target(parts), headers, body);
        req.remote_addr = remote_addr;
        req
    }

    pub fn method(&self) -> &str { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn remote_addr(&self) -> Option<SocketAddr> { self.remote_addr }

    /// The request target exactly as received, query string included.
    pub fn uri(&self) -> &str { &self.uri }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/snippet/view/{id}`, `req.param("id")` on `/snippet/view/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// The request target as the client sent it. HTTP/2 has no request line;
/// hyper rebuilds an absolute URI from `:scheme`, `:authority` and `:path`,
/// so only `:path` (path and query) is the target there.
fn request_target(parts: &http::request::Parts) -> String {
    if parts.version == http::Version::HTTP_2 {
        return parts.uri.path_and_query().map_or("/", |pq| pq.as_str()).to_owned();
    }
    parts.uri.to_string()
}
