//! Trailing-slash canonicalization.
//!
//! Register `/accounts/{id}` once and install one of these to have
//! `/accounts/admin/` reach it as well:
//!
//! ```rust
//! use trailhead::middleware::{RedirectSlashes, StripSlashes};
//! use trailhead::{Request, Router};
//!
//! # async fn account(_: Request) -> &'static str { "" }
//! // `/accounts/admin/` is served as `/accounts/admin`.
//! let app = Router::new().with(StripSlashes).get("/accounts/{id}", account);
//!
//! // `/accounts/admin/?a=1` is answered `301 Location: /accounts/admin?a=1`.
//! let app = Router::new().with(RedirectSlashes).get("/accounts/{id}", account);
//! ```
//!
//! Both look at the route path of the router they are installed on, so they
//! must sit on a router that dispatches the request, not on the end handler.

use tracing::debug;

use super::{Middleware, Next};
use crate::handler::{BoxFuture, ready};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Returns `path` without its superfluous trailing slash.
///
/// `/` is already canonical. A path that does not end in `/` is returned as is.
/// Exactly one slash is removed, so `//` becomes `/` and `/a//` becomes `/a/`.
///
/// ```rust
/// use trailhead::middleware::canonical_path;
///
/// assert_eq!(canonical_path("/accounts/admin/"), "/accounts/admin");
/// assert_eq!(canonical_path("/accounts/admin"), "/accounts/admin");
/// assert_eq!(canonical_path("/"), "/");
/// assert_eq!(canonical_path("//"), "/");
/// ```
pub fn canonical_path(path: &str) -> &str {
    if path == "/" {
        return path;
    }
    path.strip_suffix('/').unwrap_or(path)
}

/// Rewrites a path with a superfluous trailing slash and carries on.
///
/// The request is then routed as if the canonical path had been requested:
/// the status is whatever the canonical route (or NotFound) produces. The
/// query string and headers are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripSlashes;

impl Middleware for StripSlashes {
    fn handle(&self, mut req: Request, next: Next) -> BoxFuture {
        let canonical = canonical_path(req.route_path());
        if canonical.len() != req.route_path().len() {
            let canonical = canonical.to_owned();
            debug!(from = %req.route_path(), to = %canonical, "stripping trailing slash");
            req.strip_trailing_slash(&canonical);
        }
        next.run(req)
    }
}

/// Answers a path with a superfluous trailing slash with `301 Moved Permanently`.
///
/// `Location` is the canonical path followed by `?` and the raw query when
/// there is one; the query is copied verbatim. Nothing downstream runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedirectSlashes;

impl Middleware for RedirectSlashes {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        if canonical_path(req.route_path()).len() == req.route_path().len() {
            return next.run(req);
        }

        let mut location = canonical_path(req.path()).to_owned();
        if !req.query().is_empty() {
            location.push('?');
            location.push_str(req.query());
        }
        debug!(from = %req.path(), %location, "redirecting trailing slash");

        ready(
            Response::builder()
                .status(Status::MovedPermanently)
                .header("location", &location)
                .no_body(),
        )
    }
}
