//! Path matching for the movie API
//!
//! Recognizes the collection path `/movies` and item paths `/movies/{id}`.
//! The id segment is returned unparsed so the dispatcher can distinguish a
//! malformed id (400) from an unknown path (404).

/// A matched movie endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `/movies`
    Collection,
    /// `/movies/{id}`, with the raw id segment.
    Item(&'a str),
}

/// Match a request path against the movie routes.
///
/// Trailing slashes are not normalized: `/movies/` does not match the
/// collection, and paths with extra segments match nothing.
pub fn match_path(path: &str) -> Option<Endpoint<'_>> {
    let rest = path.strip_prefix("/movies")?;
    if rest.is_empty() {
        return Some(Endpoint::Collection);
    }

    let id = rest.strip_prefix('/')?;
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(Endpoint::Item(id))
}
