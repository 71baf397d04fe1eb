//! Pattern storage: the matching collaborator behind the router.
//!
//! The router does not match paths itself. It hands composed chains to a
//! [`Storage`] implementation keyed by pattern, and at dispatch time asks it
//! to match a concrete path and extract parameters. Any exact-map, trie, or
//! regex matcher satisfying the three-operation contract is substitutable
//! without touching [`Router`](crate::Router) or [`Route`](crate::Route).
//!
//! [`TrieStorage`], the default, is a radix tree backed by [`matchit`] —
//! O(path-length) matching, no allocations on the hot path beyond the
//! extracted parameters.

use std::collections::HashMap;

use matchit::Router as Trie;

use crate::chain::Chain;
use crate::error::Error;
use crate::method::Method;

/// The per-pattern table: at most one composed chain per accepted method.
pub type MethodTable<C> = HashMap<Method, Chain<C>>;

/// Pattern-keyed chain storage plus concrete-path matching.
///
/// The contract the router relies on: a table `set` under a pattern is
/// returned by [`get`](Storage::get) for that exact pattern string, and by
/// [`match_path`](Storage::match_path) for any concrete path the pattern
/// covers, with declared parameters written into `params`.
pub trait Storage<C> {
    /// Returns the table stored under exactly `pattern`, if any. This is
    /// identity lookup on the pattern string — no matching is involved.
    fn get(&self, pattern: &str) -> Option<&MethodTable<C>>;

    /// Stores (or replaces) the table for `pattern`. Fails with
    /// [`Error::Validation`] if the pattern is one this matcher cannot
    /// index.
    fn set(&mut self, pattern: &str, table: MethodTable<C>) -> Result<(), Error>;

    /// Matches a concrete request path, writing extracted parameters into
    /// `params`. Returns `None` when no stored pattern covers `path`.
    fn match_path(
        &self,
        path: &str,
        params: &mut HashMap<String, String>,
    ) -> Option<&MethodTable<C>>;
}

// ── TrieStorage ──────────────────────────────────────────────────────────────

/// The default [`Storage`]: a radix tree over patterns.
///
/// Patterns use `:name` for a parameter segment and `*rest` for a trailing
/// catch-all (`{name}` / `{*rest}` spellings are accepted as-is). Tables are
/// kept in a side map keyed by the exact pattern string so `get`/`set` stay
/// identity operations while the trie answers `match_path`.
pub struct TrieStorage<C> {
    tables: HashMap<String, MethodTable<C>>,
    // Trie values are pattern strings pointing back into `tables`, so a
    // table can be replaced without rebuilding the tree.
    trie: Trie<String>,
}

impl<C> TrieStorage<C> {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            trie: Trie::new(),
        }
    }
}

impl<C> Default for TrieStorage<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Storage<C> for TrieStorage<C> {
    fn get(&self, pattern: &str) -> Option<&MethodTable<C>> {
        self.tables.get(pattern)
    }

    fn set(&mut self, pattern: &str, table: MethodTable<C>) -> Result<(), Error> {
        if !self.tables.contains_key(pattern) {
            self.trie
                .insert(to_trie_syntax(pattern), pattern.to_owned())
                .map_err(|e| Error::Validation(format!("invalid pattern `{pattern}`: {e}")))?;
        }
        self.tables.insert(pattern.to_owned(), table);
        Ok(())
    }

    fn match_path(
        &self,
        path: &str,
        params: &mut HashMap<String, String>,
    ) -> Option<&MethodTable<C>> {
        let matched = self.trie.at(path).ok()?;
        params.extend(
            matched
                .params
                .iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned())),
        );
        self.tables.get(matched.value)
    }
}

/// Rewrites `:name` and `*rest` segments into the trie's `{name}` /
/// `{*rest}` spelling. Segments already in brace form pass through.
fn to_trie_syntax(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| match segment.as_bytes().first() {
            Some(b':') => format!("{{{}}}", &segment[1..]),
            Some(b'*') => format!("{{*{}}}", &segment[1..]),
            _ => segment.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
