//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;

use crate::method::Method;

/// An incoming HTTP request.
///
/// Owned by exactly one request future at a time. Middleware receive it by
/// value and hand it on to [`Next`](crate::middleware::Next), so a rewrite made
/// by one layer is seen by every layer after it and by no one else.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) route_path: String,
    pub(crate) query: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request from a method and an origin-form target such as
    /// `/users/42?expand=true`.
    ///
    /// The server constructs requests itself; this is for driving a
    /// [`Service`](crate::Service) in process.
    ///
    /// ```rust
    /// use trailhead::{Method, Request};
    ///
    /// let req = Request::new(Method::Get, "/accounts/admin/?a=1&b=2");
    /// assert_eq!(req.path(), "/accounts/admin/");
    /// assert_eq!(req.query(), "a=1&b=2");
    /// ```
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        let path = if path.is_empty() { "/" } else { path };
        Self::from_parts(method, path.to_owned(), query.to_owned(), Vec::new(), Bytes::new())
    }

    pub(crate) fn from_parts(
        method: Method,
        path: String,
        query: String,
        headers: Vec<(String, String)>,
        body: Bytes,
    ) -> Self {
        Self {
            method,
            route_path: path.clone(),
            path,
            query,
            headers,
            body,
            params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The raw query string, without the leading `?`. Empty when absent.
    pub fn query(&self) -> &str { &self.query }

    /// The part of the path the current router still has to match.
    ///
    /// Equal to [`path`](Request::path) at the root router. Inside a router
    /// mounted at `/accounts/{id}`, a request for `/accounts/admin/query` has
    /// route path `/query`.
    pub fn route_path(&self) -> &str { &self.route_path }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    /// Parameters captured by an enclosing mount are visible too.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Replaces the route path with `canonical`, which must be the route path
    /// minus its trailing slash. The same slash is dropped from the full path.
    pub(crate) fn strip_trailing_slash(&mut self, canonical: &str) {
        debug_assert!(self.route_path.strip_suffix('/') == Some(canonical));
        if self.path.len() > 1 && self.path.ends_with('/') {
            self.path.pop();
        }
        self.route_path = canonical.to_owned();
    }

    pub(crate) fn set_header(&mut self, name: &str, value: String) {
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value,
            None => self.headers.push((name.to_owned(), value)),
        }
    }
}
