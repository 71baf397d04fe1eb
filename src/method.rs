//! HTTP method as a typed enum.
//!
//! Only the methods a route table can hold are representable: the accepted
//! set is `HEAD`, `GET`, `PATCH`, `POST`, `PUT`, `DELETE` and `OPTIONS`.
//! Anything else is rejected when parsed, before it can reach a route —
//! [`Method::from_str`](std::str::FromStr) is the single place an
//! unsupported token surfaces, as
//! [`Error::UnsupportedMethod`](crate::Error::UnsupportedMethod).

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// An accepted HTTP method.
///
/// The derived `Ord` follows declaration order, which is also the canonical
/// order used when reporting the allowed-method set of a matched pattern.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Method {
    Head,
    Get,
    Patch,
    Post,
    Put,
    Delete,
    Options,
}

impl Method {
    /// Every accepted method, in canonical order. This is the set the
    /// `all()` registration helpers expand to.
    pub const ALL: [Method; 7] = [
        Self::Head,
        Self::Get,
        Self::Patch,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Options,
    ];

    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delete  => "DELETE",
            Self::Get     => "GET",
            Self::Head    => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch   => "PATCH",
            Self::Post    => "POST",
            Self::Put     => "PUT",
        }
    }
}

/// Parses a method token, normalizing case (`"get"`, `"Get"` and `"GET"` all
/// parse to [`Method::Get`]). Tokens outside the accepted set fail with
/// [`Error::UnsupportedMethod`].
impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.to_ascii_uppercase();
        match token.as_str() {
            "DELETE"  => Ok(Self::Delete),
            "GET"     => Ok(Self::Get),
            "HEAD"    => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "PATCH"   => Ok(Self::Patch),
            "POST"    => Ok(Self::Post),
            "PUT"     => Ok(Self::Put),
            _         => Err(Error::UnsupportedMethod(token)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_case() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Delete".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn rejects_tokens_outside_the_accepted_set() {
        match "FOO".parse::<Method>() {
            Err(Error::UnsupportedMethod(token)) => assert_eq!(token, "FOO"),
            other => panic!("expected UnsupportedMethod, got {other:?}"),
        }
        assert!("TRACE".parse::<Method>().is_err());
        assert!("CONNECT".parse::<Method>().is_err());
    }

    #[test]
    fn canonical_order_matches_declaration() {
        let mut methods = vec![Method::Options, Method::Get, Method::Post, Method::Head];
        methods.sort();
        assert_eq!(
            methods,
            [Method::Head, Method::Get, Method::Post, Method::Options]
        );
    }
}
