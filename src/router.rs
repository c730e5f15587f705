//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. The router is the
//! innermost [`Service`]: it resolves the handler, awaits its [`Response`]
//! and plays it through the request's writer.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedHandler, Handler, Service};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;
use crate::writer::ResponseWriter;

/// The application router.
///
/// Build it once at startup, wrap it in middleware, pass it to
/// [`Server::serve`](crate::Server::serve). Registration methods return
/// `self` so they chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    not_found: Option<BoxedHandler>,
}

enum Resolved {
    Found(BoxedHandler, HashMap<String, String>),
    /// The path exists, but not for this method.
    WrongMethod(Vec<Method>),
    UnknownMethod,
    Missing,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), not_found: None }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax, catch-alls `{*name}`:
    ///
    /// ```rust,no_run
    /// # use snippetbox::{Method, Request, Response, Router};
    /// # async fn view(_: Request) -> Response { Response::text("") }
    /// # async fn asset(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get, "/snippet/view/{id}", view)
    ///     .on(Method::Get, "/static/{*filepath}", asset);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route.
    /// Routes are fixed at startup, so this is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    /// Handler for requests that match no route. Defaults to a bare `404`.
    pub fn not_found(mut self, handler: impl Handler) -> Self {
        self.not_found = Some(handler.into_boxed_handler());
        self
    }

    fn resolve(&self, method: &str, path: &str) -> Resolved {
        let Ok(method) = method.parse::<Method>() else {
            return Resolved::UnknownMethod;
        };

        if let Some(matched) = self.routes.get(&method).and_then(|tree| tree.at(path).ok()) {
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Resolved::Found(Arc::clone(matched.value), params);
        }

        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(m, tree)| **m != method && tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();
        if allowed.is_empty() {
            return Resolved::Missing;
        }
        allowed.sort();
        Resolved::WrongMethod(allowed)
    }

    async fn respond(&self, mut req: Request) -> Response {
        match self.resolve(&req.method, &req.path) {
            Resolved::Found(handler, params) => {
                req.params = params;
                handler.call(req).await
            }
            Resolved::WrongMethod(allowed) => {
                let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
                Response::builder()
                    .status(Status::MethodNotAllowed)
                    .header("allow", &allow)
                    .text("Method Not Allowed")
            }
            Resolved::UnknownMethod => Response::status(Status::MethodNotAllowed),
            Resolved::Missing => match &self.not_found {
                Some(handler) => handler.call(req).await,
                None => Response::status(Status::NotFound),
            },
        }
    }
}

impl Service for Router {
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.respond(req).await.write_to(w);
        })
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
