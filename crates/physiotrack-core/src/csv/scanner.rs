//! Field scanner for a single CSV line.

/// Split one line into field values.
///
/// A field starting with `"` runs to the matching closing quote, with `""`
/// standing for a literal quote; anything else runs to the next comma.
/// Quoting is removed from the returned values. Returns a description of the
/// problem for malformed input.
pub fn scan_line(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut chars = line.char_indices().peekable();

    loop {
        let mut value = String::new();
        if matches!(chars.peek(), Some((_, '"'))) {
            let (start, _) = chars.next().unwrap_or((0, '"'));
            let mut closed = false;
            while let Some((_, c)) = chars.next() {
                if c == '"' {
                    if matches!(chars.peek(), Some((_, '"'))) {
                        chars.next();
                        value.push('"');
                    } else {
                        closed = true;
                        break;
                    }
                } else {
                    value.push(c);
                }
            }
            if !closed {
                return Err(format!("unterminated quoted field starting at column {}", start + 1));
            }
            match chars.peek() {
                None | Some((_, ',')) => {}
                Some((pos, c)) => {
                    return Err(format!("unexpected {:?} after closing quote at column {}", c, pos + 1));
                }
            }
        } else {
            while let Some(&(pos, c)) = chars.peek() {
                match c {
                    ',' => break,
                    '"' => return Err(format!("stray quote in unquoted field at column {}", pos + 1)),
                    _ => {
                        value.push(c);
                        chars.next();
                    }
                }
            }
        }

        fields.push(value);

        match chars.next() {
            Some((_, ',')) => continue,
            _ => break,
        }
    }

    Ok(fields)
}

/// Wrap a value in quotes, doubling any quotes inside it.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(line: &str) -> Vec<String> {
        scan_line(line).unwrap()
    }

    #[test]
    fn test_plain_fields() {
        assert_eq!(values("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(values("a,,c,"), vec!["a", "", "c", ""]);
        assert_eq!(values(""), vec![""]);
    }

    #[test]
    fn test_quoted_fields() {
        assert_eq!(values(r#"id,"x;y","[{""a"":1}]""#), vec!["id", "x;y", r#"[{"a":1}]"#]);
    }

    #[test]
    fn test_quoted_field_with_comma() {
        assert_eq!(values(r#""a,b",c"#), vec!["a,b", "c"]);
        assert_eq!(values(r#""""#), vec![""]);
    }

    #[test]
    fn test_malformed_lines() {
        assert!(scan_line(r#""open,b"#).is_err());
        assert!(scan_line(r#""a"b,c"#).is_err());
        assert!(scan_line(r#"a"b,c"#).is_err());
    }

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(values(&quote_field(r#"{"k":"v,w"}"#)), vec![r#"{"k":"v,w"}"#]);
    }
}
