//! Settings field validation

/// Message shown under an invalid marketmaker URL field.
pub const INVALID_URL_MESSAGE: &str = "Invalid URL";

/// Check a custom marketmaker URL.
///
/// Accepts the empty string (use the bundled marketmaker), or an `http://`
/// or `https://` URL followed by at least 4 more UTF-16 code units, none of
/// them a line break. Characters outside the BMP count as 2.
pub fn is_valid_marketmaker_url(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }

    let Some(rest) = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"))
    else {
        return false;
    };

    let mut units = 0;
    for c in rest.chars() {
        if is_line_terminator(c) {
            return false;
        }
        units += c.len_utf16();
        if units >= 4 {
            return true;
        }
    }
    false
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marketmaker_url_validation() {
        assert!(is_valid_marketmaker_url(""));
        assert!(is_valid_marketmaker_url("http://test"));
        assert!(is_valid_marketmaker_url("https://test"));
        assert!(is_valid_marketmaker_url("http://localhost:7783"));

        // Wrong or missing scheme
        assert!(!is_valid_marketmaker_url("ftp://test"));
        assert!(!is_valid_marketmaker_url("bad"));
        assert!(!is_valid_marketmaker_url("HTTP://test"));

        // Fewer than 4 characters after the scheme
        assert!(!is_valid_marketmaker_url("http://a"));
        assert!(!is_valid_marketmaker_url("http://abc"));
        assert!(!is_valid_marketmaker_url("https://"));
        assert!(is_valid_marketmaker_url("http://abcd"));

        assert!(!is_valid_marketmaker_url("http://ab\ncd"));
        assert!(is_valid_marketmaker_url("http://abcd\n"));

        // Astral characters are two code units each
        assert!(is_valid_marketmaker_url("http://😀😀"));
        assert!(is_valid_marketmaker_url("http://😀ab"));
        assert!(!is_valid_marketmaker_url("http://😀a"));
        assert!(!is_valid_marketmaker_url("http://ééé"));
    }
}
