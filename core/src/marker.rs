//! The `<think>` / `</think>` tag vocabulary.
//!
//! Markers are matched exactly: case-sensitive, no inner whitespace, no
//! escaping. Because chunk boundaries are arbitrary, a marker may arrive in
//! pieces; [`Marker::partial_suffix_len`] tells the scanner how many trailing
//! bytes to hold back until the next chunk decides.

/// One of the two literal markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `<think>`
    Open,
    /// `</think>`
    Close,
}

impl Marker {
    /// Literal text of the opening marker.
    pub const OPEN: &'static str = "<think>";
    /// Literal text of the closing marker.
    pub const CLOSE: &'static str = "</think>";

    /// The literal text of this marker.
    #[inline]
    pub const fn literal(self) -> &'static str {
        match self {
            Marker::Open => Self::OPEN,
            Marker::Close => Self::CLOSE,
        }
    }

    /// Length of the literal in bytes.
    #[inline]
    pub const fn len(self) -> usize {
        self.literal().len()
    }

    /// Byte offset of the leftmost occurrence in `haystack`.
    #[inline]
    pub fn find(self, haystack: &str) -> Option<usize> {
        haystack.find(self.literal())
    }

    /// Length of the longest proper prefix of the marker that ends `haystack`.
    ///
    /// Returns 0 when the tail of `haystack` cannot start this marker. The
    /// markers are ASCII, so `haystack.len() - n` is always a char boundary.
    pub fn partial_suffix_len(self, haystack: &str) -> usize {
        let literal = self.literal();
        let max = (literal.len() - 1).min(haystack.len());
        (1..=max)
            .rev()
            .find(|&n| haystack.as_bytes().ends_with(&literal.as_bytes()[..n]))
            .unwrap_or(0)
    }
}

/// Removes markers the way the segmenter interprets them.
///
/// Scanning alternates between looking for `<think>` and `</think>`; any
/// marker met out of turn stays in the output as literal text. This is the
/// concatenated text of the segments a flushed stream produces, which makes
/// it the reference for totality checks.
pub fn strip_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut marker = Marker::Open;
    let mut rest = text;

    while let Some(i) = marker.find(rest) {
        out.push_str(&rest[..i]);
        rest = &rest[i + marker.len()..];
        marker = match marker {
            Marker::Open => Marker::Close,
            Marker::Close => Marker::Open,
        };
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_literals() {
        assert_eq!(Marker::Open.literal(), "<think>");
        assert_eq!(Marker::Close.literal(), "</think>");
        assert_eq!(Marker::Open.len(), 7);
        assert_eq!(Marker::Close.len(), 8);
    }

    #[test]
    fn test_find_is_case_sensitive() {
        assert_eq!(Marker::Open.find("a<think>b"), Some(1));
        assert_eq!(Marker::Open.find("a<THINK>b"), None);
        assert_eq!(Marker::Open.find("a< think>b"), None);
        assert_eq!(Marker::Close.find("x</think>"), Some(1));
    }

    #[test_case(Marker::Open, "hello", 0; "no overlap")]
    #[test_case(Marker::Open, "hello<", 1; "lone angle")]
    #[test_case(Marker::Open, "hello<thin", 5; "most of the tag")]
    #[test_case(Marker::Open, "<think", 6; "everything but the bracket")]
    #[test_case(Marker::Open, "<think>", 0; "complete tag is not partial")]
    #[test_case(Marker::Close, "done </", 2; "close prefix")]
    #[test_case(Marker::Close, "done <", 1; "close angle")]
    #[test_case(Marker::Close, "</think", 7; "close minus bracket")]
    #[test_case(Marker::Open, "", 0; "empty haystack")]
    #[test_case(Marker::Open, "日本<t", 2; "after multibyte")]
    fn test_partial_suffix_len(marker: Marker, haystack: &str, expected: usize) {
        assert_eq!(marker.partial_suffix_len(haystack), expected);
        assert!(haystack.is_char_boundary(haystack.len() - expected));
    }

    #[test_case("plain", "plain"; "no markers")]
    #[test_case("A<think>B</think>C", "ABC"; "balanced")]
    #[test_case("A</think>B", "A</think>B"; "stray close kept")]
    #[test_case("<think>a<think>b</think>", "a<think>b"; "nested open kept")]
    #[test_case("<think></think>", ""; "empty region")]
    #[test_case("A<think>B", "AB"; "unterminated")]
    fn test_strip_markers(input: &str, expected: &str) {
        assert_eq!(strip_markers(input), expected);
    }
}
