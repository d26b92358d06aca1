//! Middleware layer.
//!
//! A middleware sees every request dispatched through the router it is
//! installed on, before that router looks up a route. It either produces a
//! response itself or delegates to [`Next`]:
//!
//! ```rust
//! use trailhead::middleware::{Middleware, Next};
//! use trailhead::{BoxFuture, Request, Router, Status, Response};
//!
//! struct DenyPurge;
//!
//! impl Middleware for DenyPurge {
//!     fn handle(&self, req: Request, next: Next) -> BoxFuture {
//!         if req.method() == trailhead::Method::Purge {
//!             return Box::pin(async { Response::status(Status::Forbidden) });
//!         }
//!         next.run(req)
//!     }
//! }
//!
//! # async fn hi(_: Request) -> &'static str { "hi" }
//! let app = Router::new().with(DenyPurge).get("/hi", hi);
//! ```
//!
//! Middleware installed with [`Router::with`](crate::Router::with) run in
//! registration order, outermost first. A middleware installed on a sub-router
//! only sees requests routed into that sub-router.
//!
//! Built-in middleware:
//! - [`StripSlashes`] — drop a superfluous trailing slash and continue
//! - [`RedirectSlashes`] — answer a superfluous trailing slash with a `301`
//! - [`Trace`] — per-request span with method, path, status, latency
//! - [`RequestId`] — assign and echo an `x-request-id`

use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::request::Request;

mod request_id;
mod slashes;
mod trace;

pub use request_id::RequestId;
pub use slashes::{RedirectSlashes, StripSlashes, canonical_path};
pub use trace::Trace;

/// A request interceptor installed on a [`Router`](crate::Router).
///
/// Implementations must be stateless or synchronise their own state: one value
/// is shared by every concurrent request.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: Request, next: Next) -> BoxFuture;
}

/// The rest of the chain after the current middleware.
///
/// Consumed by [`run`](Next::run); a middleware that never calls it
/// short-circuits everything downstream, route lookup and NotFound included.
pub struct Next {
    inner: BoxedHandler,
}

impl Next {
    pub fn run(self, req: Request) -> BoxFuture {
        self.inner.call(req)
    }
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

/// One middleware composed with everything after it. Built once by
/// [`Router::into_service`](crate::Router::into_service).
pub(crate) struct Layer {
    middleware: BoxedMiddleware,
    next: BoxedHandler,
}

impl Layer {
    /// Wraps `endpoint` so that `stack[0]` runs first.
    pub(crate) fn compose(stack: Vec<BoxedMiddleware>, endpoint: BoxedHandler) -> BoxedHandler {
        stack.into_iter().rev().fold(endpoint, |next, middleware| {
            Arc::new(Layer { middleware, next }) as BoxedHandler
        })
    }
}

impl ErasedHandler for Layer {
    fn call(&self, req: Request) -> BoxFuture {
        let next = Next { inner: Arc::clone(&self.next) };
        self.middleware.handle(req, next)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::handler::Handler;
    use crate::{Method, Response};

    struct Record(&'static str, Arc<Mutex<Vec<&'static str>>>);

    impl Middleware for Record {
        fn handle(&self, req: Request, next: Next) -> BoxFuture {
            self.1.lock().unwrap().push(self.0);
            next.run(req)
        }
    }

    #[tokio::test]
    async fn layers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let endpoint = (|_req: Request| async { Response::text("done") }).into_boxed_handler();
        let stack: Vec<BoxedMiddleware> = vec![
            Arc::new(Record("outer", Arc::clone(&log))),
            Arc::new(Record("inner", Arc::clone(&log))),
        ];
        let chain = Layer::compose(stack, endpoint);

        let res = chain.call(Request::new(Method::Get, "/")).await;
        assert_eq!(res.body(), b"done");
        assert_eq!(*log.lock().unwrap(), vec!["outer", "inner"]);
    }
}
