//! Browser hardening headers, set on every response.

use std::sync::Arc;

use http::HeaderMap;
use http::header::{
    CONTENT_SECURITY_POLICY, HeaderValue, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS, X_XSS_PROTECTION,
};

use super::Middleware;
use crate::handler::{BoxFuture, BoxedService, Service};
use crate::request::Request;
use crate::writer::ResponseWriter;

const CSP: &str = "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com";

#[derive(Clone, Copy, Debug, Default)]
pub struct SecureHeaders;

impl Middleware for SecureHeaders {
    fn wrap(&self, next: BoxedService) -> BoxedService {
        Arc::new(SecureHeadersService { next })
    }
}

struct SecureHeadersService {
    next: BoxedService,
}

impl Service for SecureHeadersService {
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> {
        apply(w.headers_mut());
        self.next.serve(req, w)
    }
}

fn apply(headers: &mut HeaderMap) {
    headers.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_static(CSP));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("origin-when-cross-origin"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("deny"));
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("0"));
}
