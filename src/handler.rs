//! Handler trait, continuation value, and type erasure.
//!
//! # How async handlers are stored
//!
//! A route table needs to hold handlers of *different* types in a single
//! collection. Rust collections can only hold one concrete type, so we use
//! **trait objects** (`dyn ErasedHandler`) to hide the concrete handler type
//! behind a common interface and store everything uniformly.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn auth(cx: Ctx, next: Next<Ctx>) -> Ctx { … }   ← user writes this
//!        ↓ router.get("/users/:id", handlers![auth, show])
//! auth.into_boxed_handler()                              ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(auth))                              ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler<Ctx> = Arc<dyn ErasedHandler<Ctx>>
//! handler.call(cx, next)  at request time                ← one vtable dispatch
//! ```
//!
//! The only runtime cost per invocation is **one Arc clone** (atomic inc) +
//! **one virtual call** — negligible compared to handler work.
//!
//! # The continuation
//!
//! Handlers receive the context *and* a [`Next`] — the already-composed
//! remainder of their chain. A handler runs its before-logic, optionally
//! awaits `next.run(cx)`, then runs its after-logic on whatever comes back.
//! Not calling `next` short-circuits everything downstream. The context is
//! moved down the chain and returned back up, so ownership, not sharing,
//! carries state between handlers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A heap-allocated, type-erased future that resolves back to the context.
///
/// `Pin<Box<…>>` is required because the async runtime must be able to poll
/// the future in-place — it cannot move it in memory after the first poll.
/// `Send + 'static` let multi-threaded runtimes move the future across
/// threads safely.
pub(crate) type BoxFuture<C> = Pin<Box<dyn Future<Output = C> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
/// External crates cannot usefully interact with this trait.
#[doc(hidden)]
pub trait ErasedHandler<C> {
    fn call(&self, cx: C, next: Next<C>) -> BoxFuture<C>;
}

/// A heap-allocated, type-erased handler shared across concurrent
/// invocations.
///
/// `#[doc(hidden)] pub` for the same reason as `ErasedHandler`.
/// `Arc` gives us cheap, thread-safe shared ownership (one atomic reference
/// count increment per invocation) without copying the handler.
#[doc(hidden)]
pub type BoxedHandler<C> = Arc<dyn ErasedHandler<C> + Send + Sync + 'static>;

// ── Next ─────────────────────────────────────────────────────────────────────

/// The rest of a handler chain, handed to each handler as its continuation.
///
/// `run` consumes the value; clone it first if a handler needs to invoke the
/// remainder more than once (retries, fan-out). The innermost continuation
/// is a no-op that returns the context unchanged.
pub struct Next<C> {
    inner: Arc<dyn Fn(C) -> BoxFuture<C> + Send + Sync + 'static>,
}

impl<C> Clone for Next<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: Send + 'static> Next<C> {
    pub(crate) fn wrap(f: impl Fn(C) -> BoxFuture<C> + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    /// The terminal continuation: returns the context untouched.
    pub(crate) fn terminal() -> Self {
        Self::wrap(|cx: C| -> BoxFuture<C> { Box::pin(std::future::ready(cx)) })
    }

    /// Invokes the remainder of the chain with `cx`.
    pub async fn run(self, cx: C) -> C {
        (self.inner)(cx).await
    }
}

// ── Public Handler trait ─────────────────────────────────────────────────────

/// Implemented for every valid handler over a context type `C`.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` (or closure returning a future) with the signature:
///
/// ```text
/// async fn name(cx: C, next: Next<C>) -> C
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it. This prevents accidental misuse and
/// keeps the API surface stable across versions.
pub trait Handler<C>: private::Sealed<C> + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler<C>;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed<C> {}
}

// ── Blanket implementations ──────────────────────────────────────────────────

/// Implement the sealing trait for any function with the right signature.
///
/// `Fn(C, Next<C>) -> Fut` covers:
///   - named `async fn` items
///   - closures returning `async move` blocks
///   - any struct that implements `Fn`
impl<C, F, Fut> private::Sealed<C> for F
where
    C: Send + 'static,
    F: Fn(C, Next<C>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = C> + Send + 'static,
{
}

/// Implement `Handler` for any function with the right signature.
impl<C, F, Fut> Handler<C> for F
where
    C: Send + 'static,
    F: Fn(C, Next<C>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = C> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler<C> {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ─────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<C, F, Fut> ErasedHandler<C> for FnHandler<F>
where
    C: Send + 'static,
    F: Fn(C, Next<C>) -> Fut + Send + Sync,
    Fut: Future<Output = C> + Send + 'static,
{
    fn call(&self, cx: C, next: Next<C>) -> BoxFuture<C> {
        // Call the wrapped function — this returns the concrete `Fut`. Box
        // it so the return type matches the trait signature.
        Box::pin((self.0)(cx, next))
    }
}

// ── handlers! ────────────────────────────────────────────────────────────────

/// Builds an ordered handler list for registration.
///
/// Registration methods take ordered sequences of handlers; this macro boxes
/// each expression through the [`Handler`] trait, preserving order:
///
/// ```rust
/// use wend::{handlers, Next, Router};
///
/// async fn log(cx: Vec<String>, next: Next<Vec<String>>) -> Vec<String> {
///     next.run(cx).await
/// }
/// async fn show(mut cx: Vec<String>, _next: Next<Vec<String>>) -> Vec<String> {
///     cx.push("show".to_owned());
///     cx
/// }
///
/// let mut router: Router<Vec<String>> = Router::new();
/// router.get("/users/:id", handlers![log, show]).unwrap();
/// ```
#[macro_export]
macro_rules! handlers {
    ($($handler:expr),+ $(,)?) => {
        vec![$($crate::Handler::into_boxed_handler($handler)),+]
    };
}
