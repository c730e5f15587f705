//! The snippetbox application: shared state, routes and the standard
//! middleware chain.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use crate::handler::{BoxedService, Handler};
use crate::middleware::{Chain, HttpLogger, RecoverPanic, SecureHeaders};
use crate::models::{SnippetModel, UserModel};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

pub mod forms;
mod handlers;
mod helpers;

/// Application-wide dependencies, shared by every handler.
pub struct App {
    snippets: Arc<dyn SnippetModel>,
    users: Arc<dyn UserModel>,
    static_dir: PathBuf,
}

impl App {
    pub fn new(
        snippets: Arc<dyn SnippetModel>,
        users: Arc<dyn UserModel>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self { snippets, users, static_dir: static_dir.into() }
    }

    /// The full application: routes behind the standard middleware chain,
    /// logging to the global `tracing` dispatcher.
    pub fn routes(self) -> BoxedService {
        self.routes_with(HttpLogger::new())
    }

    /// Like [`routes`](App::routes), with a caller-supplied request logger.
    pub fn routes_with(self, logger: HttpLogger) -> BoxedService {
        standard_chain(logger).then(self.router())
    }

    fn router(self) -> Router {
        let app = Arc::new(self);
        Router::new()
            .not_found(handlers::not_found_handler)
            .get("/static/{*filepath}", bind(&app, handlers::static_file))
            .get("/", bind(&app, handlers::home))
            .get("/snippet/view/{id}", bind(&app, handlers::snippet_view))
            .get("/snippet/create", bind(&app, handlers::snippet_create))
            .post("/snippet/create", bind(&app, handlers::snippet_create_post))
            .get("/user/signup", bind(&app, handlers::user_signup))
            .post("/user/signup", bind(&app, handlers::user_signup_post))
            .get("/user/login", bind(&app, handlers::user_login))
            .post("/user/login", bind(&app, handlers::user_login_post))
    }
}

/// The middleware every application request passes through, outermost first.
/// The logger wraps panic recovery, so a recovered panic is still logged once,
/// as a `500`.
pub fn standard_chain(logger: HttpLogger) -> Chain {
    Chain::new().with(logger).with(RecoverPanic).with(SecureHeaders)
}

/// Adapts `f(app, req)` into a plain [`Handler`].
fn bind<F, Fut>(app: &Arc<App>, f: F) -> impl Handler + use<F, Fut>
where
    F: Fn(Arc<App>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let app = Arc::clone(app);
    move |req: Request| f(Arc::clone(&app), req)
}
