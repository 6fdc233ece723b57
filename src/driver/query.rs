//! Query text input transform.
//!
//! Line-oriented input devices often cannot type brackets or braces, so the
//! interactive front end accepts them as `/` escapes:
//!
//! | Input | Output |
//! |-------|--------|
//! | `/(`  | `[`    |
//! | `/)`  | `]`    |
//! | `/<`  | `{`    |
//! | `/>`  | `}`    |
//!
//! Any other escaped character is kept as is (so `//` yields `/`), and a
//! trailing lone `/` is dropped.

/// Escape introducer.
pub const ESCAPE: char = '/';

/// Replace `/` escapes with the characters they stand for.
pub fn unescape_query(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('(') => out.push('['),
            Some(')') => out.push(']'),
            Some('<') => out.push('{'),
            Some('>') => out.push('}'),
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_brackets() {
        assert_eq!(
            unescape_query("MATCH /(n/)-/[r/]-/(m/) RETURN n"),
            "MATCH [n]-[r]-[m] RETURN n"
        );
    }

    #[test]
    fn test_unescape_braces() {
        assert_eq!(
            unescape_query("CREATE (n:Person /<name: 'Ada'/>)"),
            "CREATE (n:Person {name: 'Ada'})"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        let query = "MATCH (n) RETURN count(n)";
        assert_eq!(unescape_query(query), query);
        assert_eq!(unescape_query(""), "");
    }

    #[test]
    fn test_escaped_slash_and_trailing() {
        assert_eq!(unescape_query("RETURN 6 // 2"), "RETURN 6 / 2");
        assert_eq!(unescape_query("RETURN 1/"), "RETURN 1");
        assert_eq!(unescape_query("/x"), "x");
    }

    #[test]
    fn test_non_ascii_passthrough() {
        assert_eq!(unescape_query("RETURN 'é/(ü/)'"), "RETURN 'é[ü]'");
    }
}
