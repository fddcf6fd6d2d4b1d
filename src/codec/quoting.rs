//! Minimal quoting for string values
//!
//! A value is written bare unless it:
//! - is empty
//! - has leading or trailing whitespace
//! - starts with `#`
//! - contains `:`, `"`, `\` or a control character
//!
//! Quoted values are wrapped in double quotes. Inside quotes the only escapes
//! are `\\`, `\"`, `\n`, `\r` and `\t`.

use crate::errors::{OrmError, OrmResult};

/// True if the value cannot be written bare
pub fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.starts_with('#')
        || value
            .chars()
            .any(|c| matches!(c, ':' | '"' | '\\') || c.is_control())
}

/// Returns the value as it should appear after `field: `
pub fn quote(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Reads a value as written after `field: `.
///
/// `raw` must already be trimmed. Bare values are returned as-is.
pub fn unquote(raw: &str, line: usize) -> OrmResult<String> {
    let Some(body) = raw.strip_prefix('"') else {
        return Ok(raw.to_string());
    };

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    loop {
        match chars.next() {
            None => return Err(OrmError::corrupted_at(line, "unterminated quoted value")),
            Some('"') => break,
            Some('\\') => match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some(other) => {
                    return Err(OrmError::corrupted_at(
                        line,
                        format!("unsupported escape '\\{}'", other),
                    ))
                }
                None => return Err(OrmError::corrupted_at(line, "unterminated quoted value")),
            },
            Some(c) => out.push(c),
        }
    }

    if !chars.as_str().trim().is_empty() {
        return Err(OrmError::corrupted_at(
            line,
            "unexpected text after closing quote",
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_stay_bare() {
        assert_eq!(quote("Andriy"), "Andriy");
        assert_eq!(quote("two words"), "two words");
        assert_eq!(quote("-12"), "-12");
        assert_eq!(quote("a#b"), "a#b");
    }

    #[test]
    fn test_ambiguous_values_are_quoted() {
        assert_eq!(quote(""), "\"\"");
        assert_eq!(quote(" padded"), "\" padded\"");
        assert_eq!(quote("trailing "), "\"trailing \"");
        assert_eq!(quote("#tag"), "\"#tag\"");
        assert_eq!(quote("key: value"), "\"key: value\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("C:\\dir"), "\"C:\\\\dir\"");
        assert_eq!(quote("line1\nline2"), "\"line1\\nline2\"");
    }

    #[test]
    fn test_unquote_reverses_quote() {
        for value in ["", " x", "a: b", "q\"q", "back\\slash", "tab\there", "cr\rlf\n"] {
            assert_eq!(unquote(&quote(value), 1).unwrap(), value);
        }
    }

    #[test]
    fn test_unquote_bare() {
        assert_eq!(unquote("Oksana", 1).unwrap(), "Oksana");
    }

    #[test]
    fn test_unquote_errors() {
        assert!(unquote("\"open", 3).is_err());
        assert!(unquote("\"bad \\x escape\"", 3).is_err());
        assert!(unquote("\"done\" extra", 3).is_err());
        assert!(unquote("\"ends with backslash\\", 3).is_err());
    }

    #[test]
    fn test_unquote_allows_trailing_space_after_quote() {
        assert_eq!(unquote("\"ok\"   ", 1).unwrap(), "ok");
    }
}
