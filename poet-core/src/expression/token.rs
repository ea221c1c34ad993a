use crate::consume_while;
use anyhow::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier or keyword, `$` is part of identifiers (`addr$street`).
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    /// Punctuation and symbolic operators.
    Symbol(&'static str),
}

const SYMBOLS: [&str; 20] = [
    "==", "!=", "<=", ">=", "&&", "||", "<", ">", "!", "+", "-", "*", "/", "%", "(", ")", "?",
    ":", "#", ".",
];

fn is_ident_start(c: &char) -> bool {
    c.is_alphabetic() || *c == '_' || *c == '$'
}

fn is_ident_char(c: &char) -> bool {
    c.is_alphanumeric() || *c == '_' || *c == '$'
}

pub fn tokenize(expression: &str) -> Result<Vec<Token>> {
    let mut input = expression;
    let mut result = Vec::new();
    loop {
        input = input.trim_start();
        let Some(c) = input.chars().next() else {
            break;
        };
        if is_ident_start(&c) {
            result.push(Token::Ident(consume_while(&mut input, is_ident_char).into()));
        } else if c.is_ascii_digit() {
            result.push(number(&mut input)?);
        } else if c == '\'' || c == '"' {
            result.push(Token::Str(string(&mut input, c)?));
        } else if let Some(symbol) = SYMBOLS.iter().find(|v| input.starts_with(**v)) {
            input = &input[symbol.len()..];
            result.push(Token::Symbol(*symbol));
        } else {
            return Err(Error::msg(format!(
                "Unexpected character `{c}` in `{expression}`"
            )));
        }
    }
    Ok(result)
}

fn number(input: &mut &str) -> Result<Token> {
    let original = *input;
    let integer = consume_while(input, char::is_ascii_digit);
    let mut rest = input.chars();
    if rest.next() == Some('.') && rest.next().is_some_and(|v| v.is_ascii_digit()) {
        *input = &input[1..];
        let decimals = consume_while(input, char::is_ascii_digit);
        let len = integer.len() + 1 + decimals.len();
        let literal = &original[..len];
        return literal
            .parse::<f64>()
            .map(Token::Float)
            .map_err(|e| Error::new(e).context(format!("Invalid number `{literal}`")));
    }
    integer
        .parse::<i64>()
        .map(Token::Int)
        .map_err(|e| Error::new(e).context(format!("Invalid number `{integer}`")))
}

/// String delimited by `quote`, the quote itself is escaped by doubling it.
fn string(input: &mut &str, quote: char) -> Result<String> {
    let original = *input;
    let mut result = String::new();
    let mut chars = input.char_indices().skip(1).peekable();
    while let Some((i, c)) = chars.next() {
        if c != quote {
            result.push(c);
            continue;
        }
        if chars.peek().is_some_and(|(_, v)| *v == quote) {
            chars.next();
            result.push(quote);
            continue;
        }
        *input = &input[i + c.len_utf8()..];
        return Ok(result);
    }
    Err(Error::msg(format!("Unterminated string literal `{original}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("#addr$street == 'it''s' and n >= 1.5 || -2").unwrap(),
            [
                Token::Symbol("#"),
                Token::Ident("addr$street".into()),
                Token::Symbol("=="),
                Token::Str("it's".into()),
                Token::Ident("and".into()),
                Token::Ident("n".into()),
                Token::Symbol(">="),
                Token::Float(1.5),
                Token::Symbol("||"),
                Token::Symbol("-"),
                Token::Int(2),
            ]
        );
    }

    #[test]
    fn test_tokenize_errors() {
        assert!(tokenize("'open").is_err());
        assert!(tokenize("a ; b").is_err());
        assert!(tokenize("99999999999999999999").is_err());
    }

    #[test]
    fn test_member_access() {
        assert_eq!(
            tokenize("addr.city").unwrap(),
            [
                Token::Ident("addr".into()),
                Token::Symbol("."),
                Token::Ident("city".into()),
            ]
        );
        assert_eq!(tokenize("1.").unwrap(), [Token::Int(1), Token::Symbol(".")]);
    }
}
