//! Cheap checks for responses that can't be real git metadata.

use crate::consts;

/// `true` if `content` looks like an HTML page.
///
/// Misconfigured servers answer unknown paths with `200 OK` and a catch-all
/// page; no file under `.git` legitimately contains an `<html` tag.
pub fn is_html(content: &[u8]) -> bool {
    consts::HTML_REGEX.is_match(content)
}

/// `true` if `content` is empty or only whitespace.
pub fn is_empty(content: &[u8]) -> bool {
    content.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"<html><body>Not Found</body></html>", true)]
    #[case(b"<!DOCTYPE html>\n<title>404</title>", true)]
    #[case(b"\n\n  <HTML lang=\"en\">", true)]
    #[case(b"<!doctype   HTML>", true)]
    #[case(b"ref: refs/heads/main\n", false)]
    #[case(b"<p>not a full page</p>", false)]
    #[case(b"", false)]
    fn test_is_html(#[case] content: &[u8], #[case] expected: bool) {
        assert_eq!(is_html(content), expected);
    }

    #[rstest]
    #[case(b"", true)]
    #[case(b" \n\t\r\n", true)]
    #[case(b"\n0\n", false)]
    #[case(b"ref: refs/heads/main\n", false)]
    fn test_is_empty(#[case] content: &[u8], #[case] expected: bool) {
        assert_eq!(is_empty(content), expected);
    }
}
