//! Path normalisation.
//!
//! # Rules
//! - Runs of `/` collapse into a single `/`
//! - A leading `/` is always present
//! - A trailing `/` is removed, except for the root path
//!
//! The empty string sanitizes to `/`.

/// Normalise a path or template string.
///
/// ```
/// use waypoint::routing::sanitize;
///
/// assert_eq!(sanitize("users//a/b/"), "/users/a/b");
/// assert_eq!(sanitize(""), "/");
/// ```
pub fn sanitize(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 1);
    out.push('/');

    for c in value.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }

    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }

    out
}
