use anyhow::{Error, Result};

/// Piece of a template: SQL text copied verbatim or the content of a `{...}` span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Expression(&'a str),
}

/// Splits a template into text and expression spans.
///
/// Nested braces and braces inside quoted strings belong to the span. A `}` outside of any span
/// is plain text.
pub fn segments(template: &str) -> Result<Vec<Segment<'_>>> {
    let mut result = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        if start > 0 {
            result.push(Segment::Text(&rest[..start]));
        }
        let body = &rest[start + 1..];
        let end = span_end(body).ok_or_else(|| {
            Error::msg(format!("Unbalanced braces in `{template}`"))
        })?;
        result.push(Segment::Expression(&body[..end]));
        rest = &body[end + 1..];
    }
    if !rest.is_empty() {
        result.push(Segment::Text(rest));
    }
    Ok(result)
}

/// Position of the `}` closing a span whose `{` was just consumed.
fn span_end(body: &str) -> Option<usize> {
    let mut depth = 1;
    let mut quote = None;
    for (i, c) in body.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(..) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        assert_eq!(
            segments("{#id}=? and {#name} like '%{x}%'").unwrap(),
            [
                Segment::Expression("#id"),
                Segment::Text("=? and "),
                Segment::Expression("#name"),
                Segment::Text(" like '%"),
                Segment::Expression("x"),
                Segment::Text("%'"),
            ]
        );
    }

    #[test]
    fn test_braces_in_strings() {
        assert_eq!(
            segments("a{'}' + \"{\"}b").unwrap(),
            [
                Segment::Text("a"),
                Segment::Expression("'}' + \"{\""),
                Segment::Text("b"),
            ]
        );
        assert_eq!(segments("x}y").unwrap(), [Segment::Text("x}y")]);
        assert!(segments("{#id").is_err());
        assert!(segments("{'}").is_err());
    }
}
