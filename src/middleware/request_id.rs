//! Request-id assignment.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;

const HEADER: &str = "x-request-id";

/// Makes sure every request carries an `x-request-id` header and echoes it on
/// the response.
///
/// An id sent by the client (or by the proxy in front) is kept. Otherwise the
/// request gets `<prefix>-<n>`, where `n` counts up from 1 for this
/// middleware value. The default prefix is derived from the process id.
#[derive(Clone, Debug)]
pub struct RequestId {
    prefix: Arc<str>,
    counter: Arc<AtomicU64>,
}

impl RequestId {
    pub fn new() -> Self {
        Self::with_prefix(format!("{:x}", std::process::id()))
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Arc::from(prefix.into()),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{n:06}", self.prefix)
    }
}

impl Default for RequestId {
    fn default() -> Self { Self::new() }
}

impl Middleware for RequestId {
    fn handle(&self, mut req: Request, next: Next) -> BoxFuture {
        let incoming = req.header(HEADER).filter(|id| !id.is_empty()).map(str::to_owned);
        let id = match incoming {
            Some(id) => id,
            None => {
                let id = self.next_id();
                req.set_header(HEADER, id.clone());
                id
            }
        };
        let fut = next.run(req);
        Box::pin(async move {
            let mut res = fut.await;
            res.set_header(HEADER, &id);
            res
        })
    }
}
