//! Unified error type.

use std::fmt;

use crate::method::Method;

/// The error type returned by wend's fallible operations.
///
/// Every variant is a configuration bug detected synchronously at
/// registration time — there is nothing to retry. Lookup never produces an
/// `Error`: an unmatched path and a matched-but-method-less pattern are both
/// ordinary [`Router::lookup`](crate::Router::lookup) outcomes, not failures.
#[derive(Debug)]
pub enum Error {
    /// A handler sequence was empty, no method was supplied, or a pattern
    /// was rejected by the storage collaborator.
    Validation(String),

    /// A method token outside the accepted set (see
    /// [`Method::ALL`](crate::Method::ALL)) was used. Carries the offending
    /// token, upper-cased.
    UnsupportedMethod(String),

    /// A second chain was registered for a (pattern, method) pair that
    /// already has one.
    Conflict {
        method: Method,
        pattern: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(reason) => write!(f, "validation: {reason}"),
            Self::UnsupportedMethod(token) => {
                write!(f, "unsupported method `{token}`")
            }
            Self::Conflict { method, pattern } => {
                write!(f, "duplicate registration for {method} {pattern}")
            }
        }
    }
}

impl std::error::Error for Error {}
