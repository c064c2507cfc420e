use std::num::NonZeroU32;

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Position of one page inside a result set of `total_count` rows.
/// Every field is derived from `(offset, limit, total_count)` by [`paginate`].
pub struct PaginationState {
    /// Zero based index of the page that starts at `offset`
    pub current_page: u64,
    /// Index of the last page, `total_count / limit`
    pub last_page: u64,
    pub has_prev: bool,
    pub has_next: bool,
    /// True when there is neither a previous nor a next page
    pub single_page: bool,
    pub prev_offset: u64,
    /// Not capped at the end of the result set, a page past the end is simply empty
    pub next_offset: u64,
}

/// Computes paging metadata for a page of `limit` rows starting at `offset`.
///
/// `offset` does not have to be a multiple of `limit`, the page index is rounded down.
/// An empty result set never reports a previous or next page, callers should still
/// treat an empty item list as the "no results" signal.
pub fn paginate(offset: u64, limit: NonZeroU32, total_count: u64) -> PaginationState {
    let limit = u64::from(limit.get());
    let current_page = offset / limit;
    let last_page = total_count / limit;

    let (has_prev, has_next) = if total_count == 0 {
        (false, false)
    } else {
        (current_page > 0, current_page < last_page)
    };

    PaginationState {
        current_page,
        last_page,
        has_prev,
        has_next,
        single_page: !has_prev && !has_next,
        prev_offset: offset.saturating_sub(limit),
        next_offset: offset.saturating_add(limit),
    }
}
