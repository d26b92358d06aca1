//! Per-request tracing span.

use std::time::Instant;

use tracing::{Instrument, info, info_span};

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;

/// Opens an `http.request` span carrying the method and path, and emits one
/// `info` event with the status and latency once the response is ready.
///
/// Install it first so the span covers every other middleware:
///
/// ```rust
/// use trailhead::Router;
/// use trailhead::middleware::{StripSlashes, Trace};
///
/// let app = Router::new().with(Trace).with(StripSlashes);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Middleware for Trace {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        let span = info_span!(
            "http.request",
            method = %req.method(),
            path = %req.path(),
            request_id = req.header("x-request-id").unwrap_or(""),
        );
        let started = Instant::now();
        let fut = next.run(req);

        Box::pin(
            async move {
                let res = fut.await;
                info!(
                    status = res.status_code(),
                    latency_us = started.elapsed().as_micros() as u64,
                    "request completed"
                );
                res
            }
            .instrument(span),
        )
    }
}
