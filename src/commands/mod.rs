pub mod account;
pub mod coach;
pub mod habit;
pub mod metrics;
pub mod stats;
pub mod task;

use uuid::Uuid;

use crate::models::Item;
use crate::services::session::Session;

/// Resolves a CLI selector to an item id: an id prefix or the exact
/// label, case-insensitive. Newest match wins.
pub(crate) fn find_item<F>(session: &Session, selector: &str, filter: F) -> Option<Uuid>
where
    F: Fn(&Item) -> bool,
{
    let needle = selector.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    session
        .items()
        .iter()
        .filter(|item| filter(item))
        .find(|item| {
            item.id().to_string().starts_with(&needle)
                || item.label().to_lowercase() == needle
        })
        .map(|item| item.id())
}

pub(crate) fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}
