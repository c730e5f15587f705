//! Handler and service traits, and the type erasure between them.
//!
//! Two levels of request processing live here:
//!
//! - a [`Handler`] is application code: `async fn(Request) -> impl IntoResponse`.
//!   It never sees the wire; it returns a value.
//! - a [`Service`] receives the request *and* the [`ResponseWriter`]. The
//!   router is a service, and so is every middleware. Middleware can swap the
//!   writer for a decorating one before delegating.
//!
//! ```text
//! async fn home(req: Request) -> Response { … }   ← user writes this
//!        ↓ router.get("/", home)
//! Arc::new(FnHandler(home))                        ← stored as BoxedHandler
//!        ↓ Router::serve(req, w)
//! handler.call(req).await.write_to(w)              ← value played into the writer
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::writer::ResponseWriter;

/// A heap-allocated, type-erased, `Send` future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ── Service ───────────────────────────────────────────────────────────────────

/// Request processing with direct access to the response writer.
///
/// Each call gets its own `Request` and its own writer; a service holds no
/// per-request state of its own and is shared across concurrent requests.
pub trait Service: Send + Sync + 'static {
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()>;
}

/// A shared, type-erased service, as produced by middleware.
pub type BoxedService = Arc<dyn Service>;

impl<S: Service + ?Sized> Service for Arc<S> {
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> {
        (**self).serve(req, w)
    }
}

// ── Handler internals ─────────────────────────────────────────────────────────

#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture<'static, Response>;
}

#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Automatically satisfied by any `async fn` (or closure returning a future)
/// with the shape `Fn(Request) -> impl Future<Output = impl IntoResponse>`.
/// Sealed: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture<'static, Response> {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
