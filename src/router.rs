//! Route collection, global middleware, and the registration/dispatch
//! protocol.
//!
//! The router owns three things: an ordered list of [`Route`]s, the global
//! middleware applied ahead of every chain registered after it, and a
//! [`Storage`] collaborator that does the actual path matching. Registration
//! is a synchronous setup-phase activity; [`Router::lookup`] takes `&self`,
//! mutates nothing, and is safe to call from concurrently dispatching tasks.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::chain::Chain;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::path::{join, normalize, normalize_prefix};
use crate::route::Route;
use crate::storage::{MethodTable, Storage, TrieStorage};

// ── RouteMatch ───────────────────────────────────────────────────────────────

/// The outcome of a successful pattern match.
///
/// `handler` is `Some` when the requested method has a chain on the matched
/// pattern. When it is `None` the pattern matched but the method did not —
/// the 405 case — and `methods` carries the full declared set (in canonical
/// [`Method`] order) for the caller's `Allow` header.
pub struct RouteMatch<C> {
    pub handler: Option<Chain<C>>,
    pub methods: Vec<Method>,
    pub params: HashMap<String, String>,
}

impl<C> RouteMatch<C> {
    /// `true` when the requested method has a handler on the matched
    /// pattern.
    pub fn is_method_allowed(&self) -> bool {
        self.handler.is_some()
    }
}

// ── Router ───────────────────────────────────────────────────────────────────

/// The route registry.
///
/// Configure it once at startup, then share it read-only for dispatch:
///
/// ```rust
/// use wend::{handlers, Method, Next, Router};
///
/// type Cx = Vec<String>;
///
/// async fn trace(mut cx: Cx, next: Next<Cx>) -> Cx {
///     cx.push("trace".to_owned());
///     next.run(cx).await
/// }
///
/// async fn show(mut cx: Cx, _next: Next<Cx>) -> Cx {
///     cx.push("show".to_owned());
///     cx
/// }
///
/// let mut router: Router<Cx> = Router::new();
/// router.middleware(trace);
/// router.get("/users/:id", handlers![show]).unwrap();
///
/// let found = router.lookup(Method::Get, "/users/42").unwrap();
/// assert_eq!(found.params.get("id").map(String::as_str), Some("42"));
/// ```
///
/// The second type parameter selects the pattern matcher; it defaults to
/// [`TrieStorage`] and any [`Storage`] implementation can stand in via
/// [`Router::with_storage`].
pub struct Router<C, S = TrieStorage<C>> {
    prefix: String,
    middleware: Vec<BoxedHandler<C>>,
    routes: Vec<Route<C>>,
    storage: S,
}

impl<C: Send + 'static> Router<C> {
    pub fn new() -> Self {
        Self::with_storage(TrieStorage::new())
    }

    /// A router whose routes are all mounted under `prefix`.
    pub fn with_prefix(prefix: &str) -> Self {
        let mut router = Self::new();
        router.prefix = normalize_prefix(prefix);
        router
    }
}

impl<C: Send + 'static> Default for Router<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S> Router<C, S>
where
    C: Send + 'static,
    S: Storage<C>,
{
    /// A router backed by a caller-supplied [`Storage`] implementation.
    pub fn with_storage(storage: S) -> Self {
        Self {
            prefix: String::new(),
            middleware: Vec::new(),
            routes: Vec::new(),
            storage,
        }
    }

    /// Appends one global middleware.
    ///
    /// Middleware runs ahead of the route-specific handlers of every chain
    /// registered *after* this call; routes already registered are not
    /// retroactively augmented.
    pub fn middleware(&mut self, handler: impl Handler<C>) -> &mut Self {
        self.middleware.push(handler.into_boxed_handler());
        debug!(count = self.middleware.len(), "global middleware added");
        self
    }

    /// Every route this router created, in insertion order.
    pub fn routes(&self) -> &[Route<C>] {
        &self.routes
    }

    /// Reverse lookup by advisory route name. First match wins; names are
    /// not required to be unique.
    pub fn route_named(&self, name: &str) -> Option<&Route<C>> {
        self.routes.iter().find(|route| route.name() == Some(name))
    }

    /// Creates a new route for `path` under the current prefix and returns
    /// it for chaining.
    ///
    /// Every call creates a *new* [`Route`], even for a path seen before.
    /// The method helpers below instead find-or-create by exact pattern, so
    /// prefer them unless you need to hold the route itself.
    pub fn route(&mut self, path: &str) -> &mut Route<C> {
        debug!(path, "route created");
        let idx = self.routes.len();
        self.routes.push(Route::with_prefix(path, &self.prefix));
        &mut self.routes[idx]
    }

    /// Registers `handlers` (prefixed with the current global middleware)
    /// under each of `methods` for `path`.
    ///
    /// Finds or creates the route for the joined pattern. Fails with
    /// [`Error::Validation`] if `methods` or `handlers` is empty, and with
    /// [`Error::Conflict`] if any listed method already has a chain for the
    /// pattern — in which case nothing is registered at all.
    pub fn any(
        &mut self,
        methods: &[Method],
        path: &str,
        handlers: Vec<BoxedHandler<C>>,
    ) -> Result<&mut Route<C>, Error> {
        if handlers.is_empty() {
            return Err(Error::Validation("handler chain is empty".to_owned()));
        }

        let mut combined = self.middleware.clone();
        combined.extend(handlers);
        self.mount(methods, path, combined)
    }

    /// Registers handlers for both `HEAD` and `GET`, sharing one chain.
    pub fn get(
        &mut self,
        path: &str,
        handlers: Vec<BoxedHandler<C>>,
    ) -> Result<&mut Route<C>, Error> {
        self.any(&[Method::Head, Method::Get], path, handlers)
    }

    /// Registers handlers for `HEAD`.
    pub fn head(
        &mut self,
        path: &str,
        handlers: Vec<BoxedHandler<C>>,
    ) -> Result<&mut Route<C>, Error> {
        self.any(&[Method::Head], path, handlers)
    }

    /// Registers handlers for `POST`.
    pub fn post(
        &mut self,
        path: &str,
        handlers: Vec<BoxedHandler<C>>,
    ) -> Result<&mut Route<C>, Error> {
        self.any(&[Method::Post], path, handlers)
    }

    /// Registers handlers for `PUT`.
    pub fn put(
        &mut self,
        path: &str,
        handlers: Vec<BoxedHandler<C>>,
    ) -> Result<&mut Route<C>, Error> {
        self.any(&[Method::Put], path, handlers)
    }

    /// Registers handlers for `PATCH`.
    pub fn patch(
        &mut self,
        path: &str,
        handlers: Vec<BoxedHandler<C>>,
    ) -> Result<&mut Route<C>, Error> {
        self.any(&[Method::Patch], path, handlers)
    }

    /// Registers handlers for `DELETE`.
    pub fn delete(
        &mut self,
        path: &str,
        handlers: Vec<BoxedHandler<C>>,
    ) -> Result<&mut Route<C>, Error> {
        self.any(&[Method::Delete], path, handlers)
    }

    /// Registers handlers for `OPTIONS`.
    pub fn options(
        &mut self,
        path: &str,
        handlers: Vec<BoxedHandler<C>>,
    ) -> Result<&mut Route<C>, Error> {
        self.any(&[Method::Options], path, handlers)
    }

    /// Registers handlers for every accepted method.
    pub fn all(
        &mut self,
        path: &str,
        handlers: Vec<BoxedHandler<C>>,
    ) -> Result<&mut Route<C>, Error> {
        self.any(&Method::ALL, path, handlers)
    }

    /// Raw storage-backed registration of a single handler.
    ///
    /// Unlike the method helpers, the global middleware list is *not*
    /// prepended — `handler` becomes the whole chain. Returns the router
    /// for chaining.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler<C>,
    ) -> Result<&mut Self, Error> {
        self.mount(&[method], pattern, vec![handler.into_boxed_handler()])?;
        Ok(self)
    }

    /// Resolves `(method, path)` against the stored patterns.
    ///
    /// Returns `None` when no pattern matches; a [`RouteMatch`] without a
    /// handler when the pattern matched but the method is not declared on
    /// it. Lookup never fails — registration mistakes surface at
    /// registration time, not here.
    pub fn lookup(&self, method: Method, path: &str) -> Option<RouteMatch<C>> {
        let mut params = HashMap::new();
        let table = self.storage.match_path(path, &mut params)?;

        let mut methods: Vec<Method> = table.keys().copied().collect();
        methods.sort();

        Some(RouteMatch {
            handler: table.get(&method).cloned(),
            methods,
            params,
        })
    }

    /// Replaces the router's prefix, retroactively re-prefixing every owned
    /// route and re-keying storage so lookups immediately see the new
    /// paths.
    pub fn prefix(&mut self, path: &str) -> Result<&mut Self, Error>
    where
        S: Default,
    {
        self.prefix = normalize_prefix(path);
        debug!(prefix = %self.prefix, "route prefix updated");

        for route in &mut self.routes {
            route.prefix(path);
        }
        self.rebuild_storage()?;

        Ok(self)
    }

    /// Shared registration path behind `any` and `register`.
    ///
    /// All validation and conflict checks run before the route list, route
    /// table, or storage mutate, so a failed call changes nothing.
    fn mount(
        &mut self,
        methods: &[Method],
        path: &str,
        handlers: Vec<BoxedHandler<C>>,
    ) -> Result<&mut Route<C>, Error> {
        if methods.is_empty() {
            return Err(Error::Validation(
                "at least one method is required".to_owned(),
            ));
        }

        let pattern = join(&self.prefix, &normalize(path));

        // Duplicates within the list itself.
        for (i, &method) in methods.iter().enumerate() {
            if methods[..i].contains(&method) {
                return Err(Error::Conflict { method, pattern });
            }
        }

        // Conflicts against storage. This also covers patterns registered
        // through a different Route object for the same path.
        if let Some(table) = self.storage.get(&pattern) {
            for &method in methods {
                if table.contains_key(&method) {
                    return Err(Error::Conflict { method, pattern });
                }
            }
        }

        // Conflicts against the route's own table.
        let found = self.routes.iter().position(|route| route.path() == pattern);
        if let Some(idx) = found {
            for &method in methods {
                if self.routes[idx].chain(method).is_some() {
                    return Err(Error::Conflict { method, pattern });
                }
            }
        }

        let chain = Chain::new(handlers)?;

        // Persist into storage first: an invalid pattern is the one failure
        // left, and it must not leave a half-registered route behind.
        let mut table = self
            .storage
            .get(&pattern)
            .cloned()
            .unwrap_or_default();
        for &method in methods {
            table.insert(method, chain.clone());
        }
        self.storage.set(&pattern, table)?;

        let idx = match found {
            Some(idx) => idx,
            None => {
                debug!(pattern = %pattern, "route created");
                self.routes.push(Route::with_prefix(path, &self.prefix));
                self.routes.len() - 1
            }
        };
        self.routes[idx].insert_chain(methods, chain);
        debug!(pattern = %pattern, ?methods, "chains registered");

        Ok(&mut self.routes[idx])
    }

    /// Rebuilds storage from the route list's current paths and tables.
    ///
    /// Routes created through [`route`](Router::route) and populated
    /// directly are folded in here too. If two route objects declare the
    /// same (pattern, method), the earlier registration wins.
    fn rebuild_storage(&mut self) -> Result<(), Error>
    where
        S: Default,
    {
        let mut tables: HashMap<String, MethodTable<C>> = HashMap::new();
        for route in &self.routes {
            let pattern = route.path();
            let table = tables.entry(pattern.clone()).or_default();
            for (method, chain) in route.handlers() {
                if table.contains_key(&method) {
                    warn!(pattern = %pattern, method = %method, "duplicate chain dropped in prefix re-sync");
                    continue;
                }
                table.insert(method, chain.clone());
            }
        }

        let mut storage = S::default();
        for (pattern, table) in tables {
            storage.set(&pattern, table)?;
        }
        self.storage = storage;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Next;
    use crate::handlers;

    type Cx = Vec<String>;

    fn onion(label: &'static str) -> impl Handler<Cx> {
        move |mut cx: Cx, next: Next<Cx>| async move {
            cx.push(format!("{label}:in"));
            let mut cx = next.run(cx).await;
            cx.push(format!("{label}:out"));
            cx
        }
    }

    fn terminal(label: &'static str) -> impl Handler<Cx> {
        move |mut cx: Cx, _next: Next<Cx>| async move {
            cx.push(label.to_owned());
            cx
        }
    }

    #[tokio::test]
    async fn global_middleware_runs_before_route_handlers() {
        let mut router: Router<Cx> = Router::new();
        router.middleware(onion("a"));
        router.get("/x", handlers![onion("b"), terminal("c")]).unwrap();

        let found = router.lookup(Method::Get, "/x").unwrap();
        let trace = found.handler.unwrap().run(Vec::new()).await;

        assert_eq!(trace, ["a:in", "b:in", "c", "b:out", "a:out"]);
    }

    #[tokio::test]
    async fn middleware_added_later_does_not_reach_earlier_routes() {
        let mut router: Router<Cx> = Router::new();
        router.get("/early", handlers![terminal("h")]).unwrap();
        router.middleware(onion("mw"));
        router.get("/late", handlers![terminal("h")]).unwrap();

        let early = router.lookup(Method::Get, "/early").unwrap();
        assert_eq!(early.handler.unwrap().run(Vec::new()).await, ["h"]);

        let late = router.lookup(Method::Get, "/late").unwrap();
        assert_eq!(
            late.handler.unwrap().run(Vec::new()).await,
            ["mw:in", "h", "mw:out"]
        );
    }

    #[test]
    fn duplicate_pattern_method_registration_fails() {
        let mut router: Router<Cx> = Router::new();
        router.post("/x", handlers![terminal("first")]).unwrap();

        match router.post("/x", handlers![terminal("second")]) {
            Err(Error::Conflict { method, pattern }) => {
                assert_eq!(method, Method::Post);
                assert_eq!(pattern, "/x");
            }
            other => panic!("expected Conflict error, got {:?}", other.map(|_| ())),
        }

        // The same method on a different pattern is independent.
        router.post("/y", handlers![terminal("h")]).unwrap();
    }

    #[test]
    fn method_helpers_find_or_create_by_pattern() {
        let mut router: Router<Cx> = Router::new();
        router.get("/x", handlers![terminal("h")]).unwrap();
        router.post("/x", handlers![terminal("h")]).unwrap();

        assert_eq!(router.routes().len(), 1);
        let methods: Vec<Method> = router.routes()[0].handlers().map(|(m, _)| m).collect();
        assert_eq!(methods, [Method::Head, Method::Get, Method::Post]);
    }

    #[test]
    fn route_always_creates_a_new_object() {
        let mut router: Router<Cx> = Router::new();
        router.route("/x");
        router.route("/x");

        assert_eq!(router.routes().len(), 2);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let mut router: Router<Cx> = Router::new();

        assert!(matches!(
            router.any(&[Method::Post], "/x", Vec::new()),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            router.any(&[], "/x", handlers![terminal("h")]),
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn lookup_resolves_handler_methods_and_params() {
        let mut router: Router<Cx> = Router::new();
        router
            .register(Method::Get, "/a/:id", terminal("h"))
            .unwrap();

        let found = router.lookup(Method::Get, "/a/42").unwrap();
        assert_eq!(found.params.get("id").map(String::as_str), Some("42"));
        assert_eq!(found.handler.unwrap().run(Vec::new()).await, ["h"]);

        let not_allowed = router.lookup(Method::Post, "/a/42").unwrap();
        assert!(!not_allowed.is_method_allowed());
        assert_eq!(not_allowed.methods, [Method::Get]);

        assert!(router.lookup(Method::Get, "/nope").is_none());
    }

    #[test]
    fn register_skips_global_middleware() {
        let mut router: Router<Cx> = Router::new();
        router.middleware(onion("mw"));
        router
            .register(Method::Get, "/raw", terminal("h"))
            .unwrap();

        // register() chains do not include the middleware; only GET was
        // declared (no HEAD duality on the raw path).
        let found = router.lookup(Method::Get, "/raw").unwrap();
        assert_eq!(found.methods, [Method::Get]);
    }

    #[test]
    fn register_conflicts_against_storage() {
        let mut router: Router<Cx> = Router::new();
        router.register(Method::Get, "/a", terminal("h")).unwrap();

        assert!(matches!(
            router.register(Method::Get, "/a", terminal("h")),
            Err(Error::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn prefix_applies_to_new_routes_and_retroactively() {
        let mut router: Router<Cx> = Router::with_prefix("/foo");
        router.get("/bar", handlers![terminal("h")]).unwrap();
        assert_eq!(router.routes()[0].path(), "/foo/bar");
        assert!(router.lookup(Method::Get, "/foo/bar").is_some());

        router.prefix("/baz").unwrap();
        assert_eq!(router.routes()[0].path(), "/baz/bar");
        assert!(router.lookup(Method::Get, "/foo/bar").is_none());

        let found = router.lookup(Method::Get, "/baz/bar").unwrap();
        assert_eq!(found.handler.unwrap().run(Vec::new()).await, ["h"]);
    }

    #[test]
    fn prefix_resync_folds_in_directly_built_routes() {
        let mut router: Router<Cx> = Router::new();
        router
            .route("/held")
            .put(handlers![terminal("h")])
            .unwrap();

        // Direct route() registrations reach storage on the next re-sync.
        assert!(router.lookup(Method::Put, "/held").is_none());
        router.prefix("").unwrap();
        assert!(router.lookup(Method::Put, "/held").is_some());
    }

    #[test]
    fn routes_preserve_insertion_order() {
        let mut router: Router<Cx> = Router::new();
        router.get("/a", handlers![terminal("h")]).unwrap();
        router.get("/b", handlers![terminal("h")]).unwrap();
        router.get("/c", handlers![terminal("h")]).unwrap();

        let paths: Vec<String> = router.routes().iter().map(Route::path).collect();
        assert_eq!(paths, ["/a", "/b", "/c"]);
    }

    #[test]
    fn route_named_reverse_lookup() {
        let mut router: Router<Cx> = Router::new();
        router
            .get("/users", handlers![terminal("h")])
            .unwrap()
            .named("users.index");

        assert_eq!(
            router.route_named("users.index").map(Route::path),
            Some("/users".to_owned())
        );
        assert!(router.route_named("missing").is_none());
    }

    #[tokio::test]
    async fn get_registers_head_duality() {
        let mut router: Router<Cx> = Router::new();
        router.get("/x", handlers![terminal("h")]).unwrap();

        let head = router.lookup(Method::Head, "/x").unwrap();
        let get = router.lookup(Method::Get, "/x").unwrap();
        assert_eq!(head.handler.unwrap().run(Vec::new()).await, ["h"]);
        assert_eq!(get.handler.unwrap().run(Vec::new()).await, ["h"]);
    }
}
