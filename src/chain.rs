//! Handler chain composition.
//!
//! An ordered handler list `[h0, h1, …, hn]` composes into a single
//! [`Chain`] by right-to-left wrapping: the last handler receives the
//! terminal no-op continuation, and each preceding handler wraps the
//! already-composed remainder. The nesting is built **once, at registration
//! time** — invoking the chain afterwards costs only `Arc` clones, no
//! recomposition per request.
//!
//! The result has onion semantics: `h0`'s before-logic runs first, `hn`'s
//! last; after-logic unwinds in reverse; any handler may short-circuit by
//! returning without running its continuation.

use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler, Next};

/// A composed, ready-to-invoke handler chain.
///
/// Cloning is cheap (one `Arc` clone) — the chain built for a `GET`
/// registration is the very same chain stored under `HEAD`, and the same
/// chain a lookup hands back.
pub struct Chain<C> {
    entry: Next<C>,
}

impl<C> Clone for Chain<C> {
    fn clone(&self) -> Self {
        Self { entry: self.entry.clone() }
    }
}

impl<C: Send + 'static> Chain<C> {
    /// Composes `handlers` into one chain.
    ///
    /// Fails with [`Error::Validation`] if the sequence is empty — an empty
    /// chain has nothing to dispatch to and is rejected before it can be
    /// registered anywhere.
    pub(crate) fn new(handlers: Vec<BoxedHandler<C>>) -> Result<Self, Error> {
        if handlers.is_empty() {
            return Err(Error::Validation("handler chain is empty".to_owned()));
        }

        let mut next = Next::terminal();
        for handler in handlers.into_iter().rev() {
            let rest = next;
            next = Next::wrap(move |cx: C| -> BoxFuture<C> {
                handler.call(cx, rest.clone())
            });
        }

        Ok(Self { entry: next })
    }

    /// Runs the chain to completion, threading `cx` down and back up.
    ///
    /// Takes `&self` and performs no mutation, so a chain may be invoked
    /// from any number of tasks concurrently.
    pub async fn run(&self, cx: C) -> C {
        self.entry.clone().run(cx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
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
    async fn runs_handlers_in_onion_order() {
        let chain = Chain::new(handlers![onion("a"), onion("b"), terminal("c")]).unwrap();

        let trace = chain.run(Vec::new()).await;

        assert_eq!(trace, ["a:in", "b:in", "c", "b:out", "a:out"]);
    }

    #[tokio::test]
    async fn short_circuit_skips_downstream_but_unwinds_upstream() {
        let chain = Chain::new(handlers![onion("a"), terminal("stop"), onion("never")])
            .unwrap();

        let trace = chain.run(Vec::new()).await;

        // "never" is downstream of the short-circuit; "a" still unwinds.
        assert_eq!(trace, ["a:in", "stop", "a:out"]);
    }

    #[tokio::test]
    async fn chain_is_reusable_across_invocations() {
        let chain = Chain::new(handlers![terminal("h")]).unwrap();

        assert_eq!(chain.run(Vec::new()).await, ["h"]);
        assert_eq!(chain.run(Vec::new()).await, ["h"]);
    }

    #[test]
    fn empty_chain_is_rejected() {
        match Chain::<Cx>::new(Vec::new()) {
            Err(Error::Validation(_)) => {}
            other => panic!("expected Validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn last_continuation_is_a_no_op() {
        // A lone pass-through handler gets the terminal continuation, which
        // must hand the context back unchanged.
        let chain = Chain::new(handlers![onion("only")]).unwrap();

        let trace = chain.run(Vec::new()).await;

        assert_eq!(trace, ["only:in", "only:out"]);
    }
}
