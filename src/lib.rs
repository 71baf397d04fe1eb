//! # wend
//!
//! A minimal route-registration and dispatch core for async services.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! The host application owns sockets, request parsing, and response
//! writing. wend does not — by design. What's left is the only part that
//! changes between applications:
//!
//! - **Registration** — per pattern, one ordered handler chain per HTTP
//!   method, with global middleware folded in ahead of route handlers
//! - **Composition** — onion-style chains built once at registration time,
//!   not per request
//! - **Resolution** — `(method, path)` in; handler, allowed-method set, and
//!   extracted path parameters out
//!
//! Pattern matching itself is delegated to a [`Storage`] collaborator
//! (radix-tree [`TrieStorage`] by default); wend is generic over a
//! caller-supplied context type that handlers thread down and back up the
//! chain.
//!
//! ## Quick start
//!
//! ```rust
//! use wend::{handlers, Method, Next, Router};
//!
//! // The context is yours: request, response-in-progress, extensions —
//! // wend only moves it through the chain.
//! #[derive(Default)]
//! struct Ctx {
//!     trace: Vec<&'static str>,
//! }
//!
//! async fn auth(mut cx: Ctx, next: Next<Ctx>) -> Ctx {
//!     cx.trace.push("auth");
//!     next.run(cx).await
//! }
//!
//! async fn show_user(mut cx: Ctx, _next: Next<Ctx>) -> Ctx {
//!     cx.trace.push("show_user");
//!     cx
//! }
//!
//! let mut router: Router<Ctx> = Router::new();
//! router.middleware(auth);
//! router.get("/users/:id", handlers![show_user]).unwrap();
//!
//! let found = router.lookup(Method::Get, "/users/42").unwrap();
//! assert_eq!(found.params["id"], "42");
//! assert_eq!(found.methods, [Method::Head, Method::Get]);
//! ```
//!
//! Registration is a single-threaded setup-phase activity; once configured,
//! [`Router::lookup`] takes `&self` and is safe for concurrent dispatch.

mod chain;
mod error;
mod handler;
mod method;
mod path;
mod route;
mod router;
mod storage;

pub use chain::Chain;
pub use error::Error;
pub use handler::{Handler, Next};
pub use method::Method;
pub use route::Route;
pub use router::{RouteMatch, Router};
pub use storage::{MethodTable, Storage, TrieStorage};

#[doc(hidden)]
pub use handler::BoxedHandler;
