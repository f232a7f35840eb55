//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Registration happens once
//! at startup and the table is immutable afterwards —
//! [`Server::serve`](crate::Server::serve) takes the router by value and
//! shares it behind an `Arc`.
//!
//! Two registration styles, freely mixed:
//!
//! ```rust,no_run
//! # use vereda::{Request, Response, Router};
//! # async fn list(_: Request) -> Response { Response::text("") }
//! # async fn get_book(_: Request) -> Response { Response::text("") }
//! # async fn add_book(_: Request) -> Response { Response::text("") }
//! # async fn update_book(_: Request) -> Response { Response::text("") }
//! // method + path per call…
//! let app = Router::new()
//!     .get("/books", list);
//!
//! // …or the path bound once, methods chained on it:
//! let app = Router::new()
//!     .route("/book")
//!     .get(get_book)
//!     .post(add_book)
//!     .put(update_book);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;

/// The route dispatch table.
///
/// Maps a (method, path) pair to the one handler registered for it. Each
/// registration call returns `self`, so a whole table builds as one
/// expression.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for
    /// chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves
    /// them.
    ///
    /// # Panics
    ///
    /// Panics if the path is malformed or already registered for this method.
    /// Routes are wired at process start; a conflicting table is a bug worth
    /// dying loudly for.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler.into_boxed_handler())
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    /// Bind `path` once and chain method handlers onto it.
    ///
    /// Declaring the path at a single spot keeps multi-method routes free of
    /// copy-paste drift. Call [`Route::route`] to move on to the next path.
    pub fn route(self, path: &str) -> Route {
        Route { router: self, path: path.to_owned() }
    }

    fn add(mut self, method: Method, path: &str, handler: BoxedHandler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Methods registered for `path`, in wire-name order. Empty when no
    /// method matches — the caller's 404-versus-405 distinction.
    pub(crate) fn allowed(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self
            .routes
            .iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| *method)
            .collect();
        methods.sort_by_key(|m| m.as_str());
        methods
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// A path with its method handlers attached one by one.
///
/// Produced by [`Router::route`]. Convertible back into the [`Router`] (and
/// accepted directly by `Server::serve`), so a chain never needs unwinding by
/// hand.
pub struct Route {
    router: Router,
    path: String,
}

impl Route {
    /// Attach a handler for `method` on this route's path.
    pub fn on(mut self, method: Method, handler: impl Handler) -> Self {
        let path = self.path.clone();
        self.router = self.router.on(method, &path, handler);
        self
    }

    pub fn get(self, handler: impl Handler) -> Self {
        self.on(Method::Get, handler)
    }

    pub fn post(self, handler: impl Handler) -> Self {
        self.on(Method::Post, handler)
    }

    pub fn put(self, handler: impl Handler) -> Self {
        self.on(Method::Put, handler)
    }

    pub fn delete(self, handler: impl Handler) -> Self {
        self.on(Method::Delete, handler)
    }

    /// Finish this path and start chaining handlers for another.
    pub fn route(self, path: &str) -> Route {
        Route { router: self.router, path: path.to_owned() }
    }
}

impl From<Route> for Router {
    fn from(route: Route) -> Self {
        route.router
    }
}
