//! Live search over the component list.

use crate::component::Component;

/// Return the components whose name contains `query`, ignoring case.
///
/// Store order is preserved. The query is trimmed first; an empty query
/// matches nothing (listing everything is a separate action).
#[must_use]
pub fn filter(components: &[Component], query: &str) -> Vec<Component> {
    let query = normalize(query);
    if query.is_empty() {
        return Vec::new();
    }
    components
        .iter()
        .filter(|c| c.name_contains_upper(&query))
        .cloned()
        .collect()
}

/// Canonical form of a query: trimmed and upper-cased.
#[must_use]
pub fn normalize(query: &str) -> String {
    query.trim().to_uppercase()
}
