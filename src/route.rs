//! A single URL pattern and its per-method handler table.

use crate::chain::Chain;
use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::path::{join, normalize, normalize_prefix};

/// One URL pattern with an ordered table of composed handler chains, keyed
/// by HTTP method.
///
/// A `Route` knows nothing about other routes. It owns exactly one pattern
/// (its own path joined with whatever prefix its owner set) and, per
/// accepted method, at most one composed chain. Registering the same method
/// twice on the same route fails with [`Error::Conflict`].
///
/// Routes are normally created through
/// [`Router::route`](crate::Router::route) or the router's method helpers
/// and live for the router's lifetime.
pub struct Route<C> {
    prefix: String,
    path: String,
    name: Option<String>,
    table: Vec<(Method, Chain<C>)>,
}

impl<C: Send + 'static> Route<C> {
    /// Creates a route for `path` with no prefix.
    pub fn new(path: &str) -> Self {
        Self::with_prefix(path, "")
    }

    pub(crate) fn with_prefix(path: &str, prefix: &str) -> Self {
        Self {
            prefix: normalize_prefix(prefix),
            path: normalize(path),
            name: None,
            table: Vec::new(),
        }
    }

    /// The full pattern: current prefix joined with the route's own path.
    ///
    /// Recomputed on every call so a later [`prefix`](Route::prefix) change
    /// is always reflected.
    pub fn path(&self) -> String {
        join(&self.prefix, &self.path)
    }

    /// The advisory name set via [`named`](Route::named), if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Names the route for reverse lookup. Purely advisory metadata — no
    /// uniqueness check happens at this layer.
    pub fn named(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the route's prefix. Already-registered chains are untouched;
    /// only [`path`](Route::path) changes.
    pub fn prefix(&mut self, path: &str) -> &mut Self {
        self.prefix = normalize_prefix(path);
        self
    }

    /// Registers `handlers` as one composed chain under each of `methods`.
    ///
    /// Fails with [`Error::Validation`] if `methods` or `handlers` is empty,
    /// and with [`Error::Conflict`] if any listed method (including a
    /// duplicate within `methods` itself) already has a chain on this route.
    /// A failed call leaves the table untouched.
    pub fn any(
        &mut self,
        methods: &[Method],
        handlers: Vec<BoxedHandler<C>>,
    ) -> Result<&mut Self, Error> {
        if handlers.is_empty() {
            return Err(Error::Validation("handler chain is empty".to_owned()));
        }
        if methods.is_empty() {
            return Err(Error::Validation(
                "at least one method is required".to_owned(),
            ));
        }

        // All conflict checks happen before any insertion.
        for (i, &method) in methods.iter().enumerate() {
            if methods[..i].contains(&method) || self.chain(method).is_some() {
                return Err(Error::Conflict {
                    method,
                    pattern: self.path(),
                });
            }
        }

        let chain = Chain::new(handlers)?;
        for &method in methods {
            self.table.push((method, chain.clone()));
        }

        Ok(self)
    }

    /// Registers handlers for both `HEAD` and `GET`, sharing one chain.
    pub fn get(&mut self, handlers: Vec<BoxedHandler<C>>) -> Result<&mut Self, Error> {
        self.any(&[Method::Head, Method::Get], handlers)
    }

    /// Registers handlers for `HEAD`.
    pub fn head(&mut self, handlers: Vec<BoxedHandler<C>>) -> Result<&mut Self, Error> {
        self.any(&[Method::Head], handlers)
    }

    /// Registers handlers for `POST`.
    pub fn post(&mut self, handlers: Vec<BoxedHandler<C>>) -> Result<&mut Self, Error> {
        self.any(&[Method::Post], handlers)
    }

    /// Registers handlers for `PUT`.
    pub fn put(&mut self, handlers: Vec<BoxedHandler<C>>) -> Result<&mut Self, Error> {
        self.any(&[Method::Put], handlers)
    }

    /// Registers handlers for `PATCH`.
    pub fn patch(&mut self, handlers: Vec<BoxedHandler<C>>) -> Result<&mut Self, Error> {
        self.any(&[Method::Patch], handlers)
    }

    /// Registers handlers for `DELETE`.
    pub fn delete(&mut self, handlers: Vec<BoxedHandler<C>>) -> Result<&mut Self, Error> {
        self.any(&[Method::Delete], handlers)
    }

    /// Registers handlers for `OPTIONS`.
    pub fn options(&mut self, handlers: Vec<BoxedHandler<C>>) -> Result<&mut Self, Error> {
        self.any(&[Method::Options], handlers)
    }

    /// Registers handlers for every accepted method.
    pub fn all(&mut self, handlers: Vec<BoxedHandler<C>>) -> Result<&mut Self, Error> {
        self.any(&Method::ALL, handlers)
    }

    /// Records an already-composed chain under each of `methods`. The
    /// caller (the router's registration path) has done all conflict
    /// checking up front.
    pub(crate) fn insert_chain(&mut self, methods: &[Method], chain: Chain<C>) {
        for &method in methods {
            self.table.push((method, chain.clone()));
        }
    }

    /// Enumerates `(method, chain)` pairs in registration order.
    pub fn handlers(&self) -> impl Iterator<Item = (Method, &Chain<C>)> {
        self.table.iter().map(|(method, chain)| (*method, chain))
    }

    /// The composed chain registered for `method`, if any.
    pub fn chain(&self, method: Method) -> Option<&Chain<C>> {
        self.table
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, chain)| chain)
    }
}
