//! Media-list reconciliation for product updates
//!
//! The client sends `existingMediaIds`: the ids of previously attached
//! media entries it wants to keep. Entries not named there are removed and
//! their backing files scheduled for deletion; newly uploaded entries are
//! appended to the kept set.

use crate::db::models::MediaItem;

/// Partition an existing media list into kept and removed entries.
///
/// Returns `(kept, removed)` preserving the original order.
pub fn reconcile_media(
    existing: Vec<MediaItem>,
    keep_ids: &[String],
) -> (Vec<MediaItem>, Vec<MediaItem>) {
    existing
        .into_iter()
        .partition(|item| keep_ids.iter().any(|id| id == &item.id))
}
