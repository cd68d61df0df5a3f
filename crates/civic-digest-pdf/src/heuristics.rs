use once_cell::sync::Lazy;
use regex::Regex;

use crate::text_processing::WS_CLASS;

/// Delimiters of the literal operand forms used by text-showing operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `(Hello)`, the operand of `Tj` / `'` / `"`.
    Parenthesis,
    /// `[(Hel) -20 (lo)]`, the array operand of `TJ`.
    Bracket,
}

/// Find every non-nested `open ... close` span and keep its inner text when
/// it is longer than one char and contains an ASCII alphanumeric.
///
/// Nesting is not tracked: `(a(b)` yields `a(b`.
pub fn delimited_fragments(text: &str, delimiter: Delimiter) -> Vec<&str> {
    static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]*)\)").unwrap());
    static BRACKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]").unwrap());

    let re = match delimiter {
        Delimiter::Parenthesis => &*PAREN_RE,
        Delimiter::Bracket => &*BRACKET_RE,
    };

    re.captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|inner| is_meaningful(inner))
        .collect()
}

fn is_meaningful(fragment: &str) -> bool {
    fragment.chars().nth(1).is_some() && fragment.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Bodies of every `stream ... endstream` span, with surrounding whitespace
/// removed. Spans are matched lazily and never overlap.
pub fn stream_bodies(text: &str) -> Vec<&str> {
    static STREAM_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r"(?s)stream[{WS_CLASS}]*(.*?)[{WS_CLASS}]*endstream"
        ))
        .unwrap()
    });

    STREAM_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Runs that look like natural language: a letter followed by at least
/// three letters, digits, whitespace or common punctuation.
pub fn readable_runs(body: &str) -> Vec<&str> {
    static READABLE_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r#"[a-zA-Z][a-zA-Z0-9{WS_CLASS}.,!?;:'"()-]{{3,}}"#
        ))
        .unwrap()
    });

    READABLE_RE.find_iter(body).map(|m| m.as_str()).collect()
}

/// Readable runs from every stream body, in document order.
pub fn stream_fragments(text: &str) -> Vec<&str> {
    stream_bodies(text)
        .into_iter()
        .flat_map(readable_runs)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── delimited_fragments ──

    #[test]
    fn parenthesis_runs_are_kept() {
        let text = "BT /F1 12 Tf (Hello World) Tj (Second line) Tj ET";
        assert_eq!(
            delimited_fragments(text, Delimiter::Parenthesis),
            vec!["Hello World", "Second line"]
        );
    }

    #[test]
    fn short_and_symbol_only_runs_are_dropped() {
        let text = "() (a) (--) (\u{b7}\u{b7}) (ok)";
        assert_eq!(delimited_fragments(text, Delimiter::Parenthesis), vec!["ok"]);
    }

    #[test]
    fn two_chars_with_a_digit_is_enough() {
        assert_eq!(
            delimited_fragments("(7.)", Delimiter::Parenthesis),
            vec!["7."]
        );
    }

    #[test]
    fn parenthesis_does_not_nest() {
        assert_eq!(
            delimited_fragments("(outer (inner) tail)", Delimiter::Parenthesis),
            vec!["outer (inner"]
        );
    }

    #[test]
    fn parenthesis_spans_newlines() {
        assert_eq!(
            delimited_fragments("(line one\nline two)", Delimiter::Parenthesis),
            vec!["line one\nline two"]
        );
    }

    #[test]
    fn bracket_runs() {
        let text = "[(Ker) -20 (ned)] TJ /MediaBox [0 0 612 792] [ ]";
        assert_eq!(
            delimited_fragments(text, Delimiter::Bracket),
            vec!["(Ker) -20 (ned)", "0 0 612 792"]
        );
    }

    #[test]
    fn unclosed_delimiter_yields_nothing() {
        assert!(delimited_fragments("(never closed", Delimiter::Parenthesis).is_empty());
        assert!(delimited_fragments("[never closed", Delimiter::Bracket).is_empty());
    }

    // ── stream_bodies / readable_runs ──

    #[test]
    fn stream_body_is_trimmed() {
        let text = "obj\nstream\r\n  BT Hello ET  \nendstream\nendobj";
        assert_eq!(stream_bodies(text), vec!["BT Hello ET"]);
    }

    #[test]
    fn multiple_streams_do_not_merge() {
        let text = "stream one endstream junk stream two endstream";
        assert_eq!(stream_bodies(text), vec!["one", "two"]);
    }

    #[test]
    fn readable_runs_need_four_chars_starting_with_letter() {
        assert_eq!(readable_runs("\u{1}abc\u{2}"), Vec::<&str>::new());
        assert_eq!(readable_runs("\u{1}abcd\u{2}"), vec!["abcd"]);
        assert_eq!(readable_runs("1234 x"), Vec::<&str>::new());
    }

    #[test]
    fn readable_runs_absorb_punctuation_and_spaces() {
        let body = "\u{ff}\u{fe}Council meets (May 3), 2024!\u{0}\u{0}zz";
        assert_eq!(readable_runs(body), vec!["Council meets (May 3), 2024!"]);
    }

    #[test]
    fn stream_fragments_flatten_in_order() {
        let text = "stream\nFirst body\nendstream stream\n\u{90}Second\u{91}\nendstream";
        assert_eq!(stream_fragments(text), vec!["First body", "Second"]);
    }

    #[test]
    fn compressed_stream_yields_little() {
        let text = "stream\n\u{78}\u{9c}\u{ed}\u{9d}\u{1}\u{2}\u{3}\nendstream";
        assert!(stream_fragments(text).is_empty());
    }
}
