//! Radix-tree request router with scoped middleware.
//!
//! One tree per HTTP method, O(path-length) lookup via [`matchit`]. Routers
//! nest: [`Router::route`] mounts a sub-router under a path prefix, and
//! middleware installed on a router only sees requests dispatched through it.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::{Params, Router as MatchitRouter};

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler, ready};
use crate::method::Method;
use crate::middleware::{BoxedMiddleware, Layer, Middleware};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// A configuration-time builder: every method takes and returns `self`.
/// [`into_service`](Router::into_service) (or [`Server::serve`](crate::Server::serve))
/// turns it into the request chain once, at startup.
///
/// ```rust
/// use trailhead::middleware::StripSlashes;
/// use trailhead::{Request, Response, Router, Status};
///
/// # async fn root(_: Request) -> &'static str { "root" }
/// # async fn account(req: Request) -> String { req.param("id").unwrap_or("").to_owned() }
/// # async fn nothing(_: Request) -> Response { Response::builder().status(Status::NotFound).text("nothing here") }
/// let app = Router::new()
///     .with(StripSlashes)
///     .not_found(nothing)
///     .get("/", root)
///     .route("/accounts/{id}", |r| r.get("/", account));
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    middleware: Vec<BoxedMiddleware>,
    mounts: MatchitRouter<usize>,
    scopes: Vec<Router>,
    not_found: Option<BoxedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            middleware: Vec::new(),
            mounts: MatchitRouter::new(),
            scopes: Vec::new(),
            not_found: None,
        }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with a route already
    /// registered for `method`.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler)
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::Put, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::Patch, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::Delete, path, handler)
    }

    fn add(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Install a middleware on this router.
    ///
    /// Middleware run in the order they are added, before this router looks
    /// up a route, so a path rewrite changes which route matches. The order of
    /// `with` relative to route registration does not matter.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Mount a sub-router under `pattern`.
    ///
    /// A request whose path starts with a match for `pattern` is handed to the
    /// sub-router with that prefix removed; an empty remainder becomes `/`.
    /// Parameters in `pattern` are bound on the request. Routes registered
    /// directly on this router take precedence over mounts.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is `/`, ends in `/`, or conflicts with another mount.
    pub fn route(mut self, pattern: &str, build: impl FnOnce(Router) -> Router) -> Self {
        if !pattern.starts_with('/') || pattern.ends_with('/') {
            panic!("invalid mount `{pattern}`: must start with `/` and must not end with `/`");
        }
        self.mounts
            .insert(pattern, self.scopes.len())
            .unwrap_or_else(|e| panic!("invalid mount `{pattern}`: {e}"));
        self.scopes.push(build(Router::new()));
        self
    }

    /// Handler used when no route matches.
    ///
    /// Sub-routers without their own fallback use the nearest ancestor's.
    /// Without any, the response is a bare `404`.
    pub fn not_found(mut self, handler: impl Handler) -> Self {
        self.not_found = Some(handler.into_boxed_handler());
        self
    }

    /// Composes routers and middleware into the request chain.
    pub fn into_service(self) -> Service {
        Service { root: self.compile(None) }
    }

    fn compile(self, inherited: Option<BoxedHandler>) -> BoxedHandler {
        let not_found = self.not_found.or(inherited);
        let scopes = self.scopes.into_iter()
            .map(|scope| scope.compile(not_found.clone()))
            .collect();
        let dispatcher = Dispatcher {
            routes: self.routes,
            mounts: self.mounts,
            scopes,
            not_found,
        };
        Layer::compose(self.middleware, Arc::new(dispatcher))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

// ── Service ───────────────────────────────────────────────────────────────────

/// A composed router, ready to answer requests.
///
/// Cheap to clone. The server holds one; tests can drive one directly:
///
/// ```rust
/// use trailhead::{Method, Request, Router};
///
/// # async fn hi(_: Request) -> &'static str { "hi" }
/// # async fn run() {
/// let app = Router::new().get("/hi", hi).into_service();
/// let res = app.call(Request::new(Method::Get, "/hi")).await;
/// assert_eq!(res.body(), b"hi");
/// # }
/// ```
#[derive(Clone)]
pub struct Service {
    root: BoxedHandler,
}

impl Service {
    pub fn call(&self, req: Request) -> BoxFuture {
        self.root.call(req)
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// The innermost link of one router's chain: route lookup, then mounts, then
/// the fallbacks.
struct Dispatcher {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    mounts: MatchitRouter<usize>,
    scopes: Vec<BoxedHandler>,
    not_found: Option<BoxedHandler>,
}

impl Dispatcher {
    fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler, Vec<(String, String)>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        Some((Arc::clone(matched.value), owned(&matched.params)))
    }

    /// Finds the longest path prefix, ending at a segment boundary, that
    /// matches a mount. Returns the scope index, the remainder and the params.
    fn mount(&self, path: &str) -> Option<(usize, String, Vec<(String, String)>)> {
        if self.scopes.is_empty() {
            return None;
        }
        let boundaries = path.match_indices('/')
            .map(|(i, _)| i)
            .filter(|&i| i > 0)
            .chain(std::iter::once(path.len()));

        for end in boundaries.rev() {
            if let Ok(matched) = self.mounts.at(&path[..end]) {
                let rest = if end == path.len() { "/" } else { &path[end..] };
                return Some((*matched.value, rest.to_owned(), owned(&matched.params)));
            }
        }
        None
    }

    /// Methods other than `method` that have a route for `path`.
    fn allowed(&self, method: Method, path: &str) -> Vec<Method> {
        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(m, tree)| **m != method && tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();
        allowed.sort();
        allowed
    }
}

impl ErasedHandler for Dispatcher {
    fn call(&self, mut req: Request) -> BoxFuture {
        if let Some((handler, params)) = self.lookup(req.method, &req.route_path) {
            req.params.extend(params);
            return handler.call(req);
        }

        if let Some((scope, rest, params)) = self.mount(&req.route_path) {
            req.params.extend(params);
            req.route_path = rest;
            return self.scopes[scope].call(req);
        }

        let allowed = self.allowed(req.method, &req.route_path);
        if !allowed.is_empty() {
            let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
            return ready(
                Response::builder()
                    .status(Status::MethodNotAllowed)
                    .header("allow", &allow)
                    .no_body(),
            );
        }

        match &self.not_found {
            Some(handler) => handler.call(req),
            None => ready(Response::status(Status::NotFound)),
        }
    }
}

fn owned(params: &Params<'_, '_>) -> Vec<(String, String)> {
    params.iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect()
}
