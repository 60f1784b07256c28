//! Newest-first ranking and fixed-size pagination windows.
//!
//! Chain ids are monotonically assigned, so descending numeric magnitude is
//! newest-first. Discovery and feed callers must rank candidate ids with
//! [`newest_first`] before windowing, or the next-window cursor breaks.

/// Order ids by descending numeric magnitude (newest first).
///
/// Non-numeric ids sort last; the sort is stable so equal keys keep their
/// relative order.
pub fn newest_first(mut ids: Vec<String>) -> Vec<String> {
    ids.sort_by(|a, b| numeric(b).cmp(&numeric(a)));
    ids
}

/// One fixed-size slice of a ranked id list.
pub fn window(ids: &[String], size: usize, page: usize) -> &[String] {
    let start = page.saturating_mul(size).min(ids.len());
    let end = start.saturating_add(size).min(ids.len());
    &ids[start..end]
}

fn numeric(id: &str) -> u128 {
    id.parse().unwrap_or(0)
}
