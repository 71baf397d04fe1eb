//! URL path normalization and joining.
//!
//! Two conventions coexist and must not be mixed up:
//!
//! - a **standalone path** always starts with `/`, never ends with `/`
//!   unless it is exactly `/`, and the empty path is `/`;
//! - a **prefix** follows the same shape except that "no prefix" (the empty
//!   string, or a bare `/`) normalizes to `""` so it disappears in joins.
//!
//! Both functions are idempotent.

/// Canonicalizes a standalone path. `""`, `"/"` and `"///"` all become `/`;
/// `"foo"`, `"/foo"` and `"foo/"` all become `/foo`.
pub(crate) fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');

    if trimmed.is_empty() {
        return "/".to_owned();
    }

    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

/// Canonicalizes a prefix. Like [`normalize`], except emptiness is
/// preserved: `""` and `"/"` both become `""`.
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');

    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

/// Joins an already-normalized prefix and path without doubling a slash.
/// Joining onto the root path yields the prefix itself.
pub(crate) fn join(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_owned();
    }

    if path == "/" {
        return prefix.to_owned();
    }

    format!("{prefix}{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_canonicalizes_every_spelling() {
        assert_eq!(normalize("foo"), "/foo");
        assert_eq!(normalize("/foo"), "/foo");
        assert_eq!(normalize("foo/"), "/foo");
        assert_eq!(normalize("/foo/"), "/foo");
    }

    #[test]
    fn normalize_maps_empty_and_root_to_root() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("///"), "/");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in ["", "/", "foo/", "/a/b/c", "a/b/"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn prefix_empties_are_absorbed() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("/api/"), "/api");
    }

    #[test]
    fn join_never_doubles_a_slash() {
        assert_eq!(join("/api", "/users"), "/api/users");
        assert_eq!(join("", "/users"), "/users");
        assert_eq!(join("/api", "/"), "/api");
        assert_eq!(join("", "/"), "/");
    }
}
