use once_cell::sync::Lazy;
use regex::Regex;

use crate::text_processing::WS_CLASS;

/// Rough page count: number of `/Type /Page` leaf objects, at least 1.
///
/// The char after `/Page` must exist and must not be `s`, which keeps the
/// `/Type /Pages` tree node out of the count. That trailing char is
/// consumed by the match, so `/Type /Page/Type /Page ` counts once.
pub fn estimate_page_count(text: &str) -> usize {
    static PAGE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(&format!("/Type[{WS_CLASS}]*/Page[^s]")).unwrap());

    PAGE_RE.find_iter(text).count().max(1)
}
