//! Turns a panicking handler into a `500` instead of a dropped connection.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use http::header::{CONNECTION, HeaderValue};
use tracing::error;

use super::Middleware;
use crate::handler::{BoxFuture, BoxedService, Service};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;
use crate::writer::ResponseWriter;

/// Panic-recovery middleware.
///
/// The panic is logged, the connection is marked `Connection: close`, and the
/// client receives `500 Internal Server Error`. If the handler had already
/// committed a status before panicking, that status stands.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecoverPanic;

impl Middleware for RecoverPanic {
    fn wrap(&self, next: BoxedService) -> BoxedService {
        Arc::new(RecoverPanicService { next })
    }
}

struct RecoverPanicService {
    next: BoxedService,
}

impl Service for RecoverPanicService {
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let method = req.method().to_owned();
            let uri = req.uri().to_owned();

            let outcome = AssertUnwindSafe(self.next.serve(req, &mut *w)).catch_unwind().await;
            if let Err(panic) = outcome {
                error!(%method, %uri, panic = panic_message(&*panic), "recovered from handler panic");
                w.headers_mut().insert(CONNECTION, HeaderValue::from_static("close"));
                Response::builder()
                    .status(Status::InternalServerError)
                    .text("Internal Server Error")
                    .write_to(w);
            }
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
