//! # trailhead
//!
//! A minimal HTTP router for Rust services, with scoped middleware and
//! trailing-slash canonicalization built in.
//!
//! Register a route once, without a trailing slash, and decide per router what
//! happens to `/accounts/admin/`:
//!
//! - [`StripSlashes`](middleware::StripSlashes) serves it as `/accounts/admin`.
//! - [`RedirectSlashes`](middleware::RedirectSlashes) answers
//!   `301 Location: /accounts/admin`, keeping the raw query string.
//!
//! Middleware installed on a sub-router only sees the requests routed into
//! that sub-router.
//!
//! What's inside:
//!
//! - Radix-tree routing: O(path-length) lookup via [`matchit`]
//! - Nested routers with per-scope middleware and NotFound fallback
//! - hyper + tokio, HTTP/1.1 and HTTP/2
//! - Graceful shutdown: SIGTERM / Ctrl-C, drains in-flight requests
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use trailhead::middleware::{StripSlashes, Trace};
//! use trailhead::{Request, Response, Router, Server, Status};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .with(Trace)
//!         .with(StripSlashes)
//!         .not_found(nothing_here)
//!         .get("/", root)
//!         .route("/accounts/{id}", |r| r.get("/", account));
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn root(_req: Request) -> &'static str {
//!     "root"
//! }
//!
//! async fn account(req: Request) -> String {
//!     req.param("id").unwrap_or("unknown").to_owned()
//! }
//!
//! async fn nothing_here(_req: Request) -> Response {
//!     Response::builder().status(Status::NotFound).text("nothing here")
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

pub mod middleware;

pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use method::{Method, UnknownMethod};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::{Router, Service};
pub use server::Server;
pub use status::Status;
