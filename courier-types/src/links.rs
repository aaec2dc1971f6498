//! HATEOAS link discovery.

use crate::error::ClientError;
use crate::wire::Link;

/// Resolve a relation name to a URL within a set of discovered links.
///
/// Matching is by suffix: the first link whose `rel` **ends with** `rel_name`
/// wins, scanned in the order the server sent them. This is a deliberate
/// compatibility policy — callers ask for a short name like `"event"` while
/// the server's relation may be a fully-qualified identifier such as
/// `"http://example.com/swagger#/event"`.
///
/// # Errors
///
/// Returns [`ClientError::LinkNotFound`] when no relation matches.
pub fn find_by_rel<'a>(links: &'a [Link], rel_name: &str) -> Result<&'a str, ClientError> {
    links
        .iter()
        .find(|link| link.rel.ends_with(rel_name))
        .map(|link| link.href.as_str())
        .ok_or_else(|| ClientError::LinkNotFound(rel_name.to_string()))
}
