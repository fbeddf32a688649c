/// atext ASCII, dots allowed between atoms only.
pub(crate) fn is_dot_atom(s: &str) -> bool {
    if s.is_empty() || s.starts_with('.') || s.ends_with('.') || s.contains("..") {
        return false;
    }
    s.chars().all(|c| c == '.' || is_atext(c))
}

/// Quoted-string local part: `"..."` with printable ASCII inside,
/// `\` escaping the next character.
pub(crate) fn is_quoted_string(s: &str) -> bool {
    let Some(inner) = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return false;
    };

    let mut escaped = false;
    for c in inner.chars() {
        if !(c == ' ' || c.is_ascii_graphic()) {
            return false;
        }
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return false,
            _ => {}
        }
    }
    !escaped
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '/' | '=' | '?' | '^' | '_'
                | '`' | '{' | '|' | '}' | '~'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_atom_rejects_misplaced_dots() {
        assert!(!is_dot_atom(".abc"));
        assert!(!is_dot_atom("abc."));
        assert!(!is_dot_atom("a..b"));
        assert!(is_dot_atom("first.last+tag"));
    }

    #[test]
    fn dot_atom_rejects_specials() {
        assert!(!is_dot_atom("a b"));
        assert!(!is_dot_atom("a,b"));
        assert!(!is_dot_atom(""));
    }

    #[test]
    fn quoted_string_rules() {
        assert!(is_quoted_string("\"john doe\""));
        assert!(is_quoted_string("\"a\\\"b\""));
        assert!(!is_quoted_string("\"a\"b\""));
        assert!(!is_quoted_string("\"unterminated\\\""));
        assert!(!is_quoted_string("noquotes"));
    }
}
