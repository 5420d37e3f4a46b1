//! URL path normalization module
//!
//! Route mapping and dispatch must agree on path shape, so both go
//! through the same normalization: collapse every run of consecutive
//! `/` into a single one.

/// Collapse repeated separators: `//user///login` becomes `/user/login`.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut last_was_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !last_was_slash {
                normalized.push('/');
            }
            last_was_slash = true;
        } else {
            normalized.push(c);
            last_was_slash = false;
        }
    }
    normalized
}

/// Join a controller prefix and a method suffix into a normalized URL.
pub fn join_route(prefix: &str, suffix: &str) -> String {
    normalize_path(&format!("{prefix}/{suffix}"))
}

/// Strip a leading context-path prefix from a request path.
///
/// An empty context path leaves the path untouched.
pub fn strip_context<'a>(path: &'a str, context_path: &str) -> &'a str {
    if context_path.is_empty() {
        return path;
    }
    path.strip_prefix(context_path).unwrap_or(path)
}
