/// Lowercase the text, fold curly apostrophes and collapse every run of
/// characters other than letters, digits and `'` into a single space.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        let ch = match ch {
            '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
            other => other,
        };

        if ch.is_alphanumeric() || ch == '\'' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_punctuation_and_case() {
        assert_eq!(normalize("  I  feel...SO   Tired!! "), "i feel so tired");
    }

    #[test]
    fn test_hyphen_becomes_space() {
        assert_eq!(normalize("self-harm"), "self harm");
    }

    #[test]
    fn test_curly_apostrophe_folded() {
        assert_eq!(normalize("I can\u{2019}t go on"), "i can't go on");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(" ?! "), "");
    }
}
