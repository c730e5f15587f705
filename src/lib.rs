//! # snippetbox
//!
//! A small snippet-sharing web application, and the thin HTTP layer it runs
//! on: a radix-tree router, a middleware chain, and a hyper server.
//!
//! ## Request flow
//!
//! ```text
//! hyper ──▶ Server::dispatch ──▶ HttpLogger ──▶ RecoverPanic ──▶ SecureHeaders ──▶ Router ──▶ handler
//!              │ ResponseBuffer      │ ResponseRecorder                                │
//!              ◀─────────────────────┴──────────── Response::write_to ◀────────────────┘
//! ```
//!
//! Every request gets its own [`ResponseBuffer`]. [`middleware::HttpLogger`]
//! decorates it with a recorder, lets the rest of the chain run, and then
//! emits exactly one structured `tracing` event describing the request.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use snippetbox::middleware::{Chain, HttpLogger};
//! use snippetbox::{Request, Response, Router, Server, Status};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), snippetbox::Error> {
//!     let router = Router::new()
//!         .get("/", home)
//!         .post("/snippet/create", create);
//!     let app = Chain::new().with(HttpLogger::new()).then(router);
//!
//!     Server::bind(([127, 0, 0, 1], 4000).into()).serve(app).await
//! }
//!
//! async fn home(_req: Request) -> Response {
//!     Response::text("hello")
//! }
//!
//! async fn create(req: Request) -> Response {
//!     if req.body().is_empty() {
//!         return Response::status(Status::BadRequest);
//!     }
//!     Response::redirect(Status::SeeOther, "/snippet/view/1")
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;
mod writer;

pub mod app;
pub mod config;
pub mod logging;
pub mod middleware;
pub mod models;

pub use error::Error;
pub use handler::{BoxFuture, BoxedService, Handler, Service};
pub use method::{Method, UnknownMethod};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::{DEFAULT_HEADER_READ_TIMEOUT, Server};
pub use status::{Status, reason};
pub use writer::{ResponseBuffer, ResponseWriter};
