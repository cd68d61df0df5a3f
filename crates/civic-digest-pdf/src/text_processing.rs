use once_cell::sync::Lazy;
use regex::Regex;

/// Whitespace as the scan patterns understand it, limited to the Latin-1
/// range: TAB, LF, VT, FF, CR, SPACE and NO-BREAK SPACE.
///
/// U+0085 (NEL) is deliberately absent; it is a control character here, not
/// a line break, and gets replaced during [`normalize`].
pub(crate) const WS_CLASS: &str = r"\t\n\x0B\x0C\r \xA0";

/// Decode bytes one-to-one into chars (ISO-8859-1).
///
/// Every byte maps to exactly one char, so structural ASCII tokens survive
/// no matter what binary data surrounds them.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Collapse whitespace runs, blank out non-printable characters, and trim.
///
/// The order matters: whitespace is collapsed first, then every char
/// outside 0x20..=0x7E becomes its own space.
pub fn normalize(text: &str) -> String {
    static WS_RUN_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(&format!("[{WS_CLASS}]+")).unwrap());
    static NON_PRINTABLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\x20-\x7E]").unwrap());

    let collapsed = WS_RUN_RE.replace_all(text, " ");
    let printable = NON_PRINTABLE_RE.replace_all(&collapsed, " ");
    printable.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_maps_every_byte() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let decoded = decode_latin1(&bytes);
        assert_eq!(decoded.chars().count(), 256);
        for (b, c) in bytes.iter().zip(decoded.chars()) {
            assert_eq!(*b as u32, c as u32);
        }
    }

    #[test]
    fn latin1_keeps_tokens_amid_invalid_utf8() {
        let decoded = decode_latin1(b"\xff\xfe(Hi)\xc3");
        assert!(decoded.contains("(Hi)"));
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("  a \t\n\r b  "), "a b");
    }

    #[test]
    fn normalize_treats_nbsp_as_whitespace() {
        assert_eq!(normalize("a\u{a0}\u{a0}b"), "a b");
    }

    #[test]
    fn normalize_replaces_each_non_printable_without_recollapsing() {
        assert_eq!(normalize("a\u{1}\u{2}b"), "a  b");
        assert_eq!(normalize("caf\u{e9}"), "caf");
    }

    #[test]
    fn normalize_nel_is_not_whitespace() {
        // NEL is replaced, but only after the collapse step ran.
        assert_eq!(normalize("a \u{85} b"), "a   b");
    }

    #[test]
    fn normalize_empty() {
        assert_eq!(normalize(" \n\t "), "");
        assert_eq!(normalize("\u{0}\u{7f}"), "");
    }
}
