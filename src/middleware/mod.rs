//! Middleware layer.
//!
//! Middleware wraps a [`Service`] in another [`Service`]. It sees every
//! request and the [`ResponseWriter`](crate::ResponseWriter) it is answered
//! through, which makes it the place for cross-cutting concerns: request
//! logging, panic recovery, security headers.
//!
//! ```rust,no_run
//! use snippetbox::middleware::{Chain, HttpLogger, RecoverPanic, SecureHeaders};
//! use snippetbox::Router;
//!
//! let app = Chain::new()
//!     .with(HttpLogger::new())
//!     .with(RecoverPanic)
//!     .with(SecureHeaders)
//!     .then(Router::new());
//! ```

use std::sync::Arc;

use crate::handler::{BoxedService, Service};

mod logger;
mod recover;
mod secure_headers;

pub use logger::{HttpLogger, HttpLoggerService, RequestRecord, ResponseRecorder};
pub use recover::RecoverPanic;
pub use secure_headers::SecureHeaders;

/// A service decorator.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedService) -> BoxedService;
}

/// An ordered middleware stack. The first middleware added is the outermost:
/// it sees the request first and the response last.
#[derive(Clone, Default)]
pub struct Chain {
    layers: Vec<Arc<dyn Middleware>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    /// Wraps `service` in every middleware of the chain.
    pub fn then(&self, service: impl Service) -> BoxedService {
        self.layers
            .iter()
            .rev()
            .fold(Arc::new(service) as BoxedService, |next, layer| layer.wrap(next))
    }
}
