//! JSON Pointer (RFC 6901) paths for violation and error locations.

/// Append one reference token to a pointer, escaping `~` and `/`.
pub(crate) fn child(parent: &str, token: &str) -> String {
    let escaped = token.replace('~', "~0").replace('/', "~1");
    format!("{parent}/{escaped}")
}

/// Render a pointer for messages, naming the root explicitly.
pub(crate) fn display(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

/// Append an array index.
pub(crate) fn index(parent: &str, i: usize) -> String {
    format!("{parent}/{i}")
}
