//! Tokenizer for the predicate language

use super::errors::{ExprError, ExprResult};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    AndAnd,
    OrOr,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset in the source
    pub position: usize,
}

/// Splits predicate source into tokens, terminated by `Eof`.
pub(crate) fn tokenize(source: &str) -> ExprResult<Vec<Token>> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (position, c) = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let next = chars.get(i + 1).map(|(_, c)| *c);
        let (kind, width) = match (c, next) {
            ('(', _) => (TokenKind::LParen, 1),
            (')', _) => (TokenKind::RParen, 1),
            ('[', _) => (TokenKind::LBracket, 1),
            (']', _) => (TokenKind::RBracket, 1),
            (',', _) => (TokenKind::Comma, 1),
            ('+', _) => (TokenKind::Plus, 1),
            ('-', _) => (TokenKind::Minus, 1),
            ('*', _) => (TokenKind::Star, 1),
            ('/', _) => (TokenKind::Slash, 1),
            ('%', _) => (TokenKind::Percent, 1),
            ('=', Some('=')) => (TokenKind::EqEq, 2),
            ('!', Some('=')) => (TokenKind::NotEq, 2),
            ('!', _) => (TokenKind::Bang, 1),
            ('<', Some('=')) => (TokenKind::Le, 2),
            ('<', _) => (TokenKind::Lt, 1),
            ('>', Some('=')) => (TokenKind::Ge, 2),
            ('>', _) => (TokenKind::Gt, 1),
            ('&', Some('&')) => (TokenKind::AndAnd, 2),
            ('|', Some('|')) => (TokenKind::OrOr, 2),
            ('=', _) => return Err(ExprError::lex(position, "unexpected '=', use '=='")),
            ('\'' | '"', _) => {
                let (text, consumed) = lex_string(&chars, i)?;
                tokens.push(Token {
                    kind: TokenKind::Str(text),
                    position,
                });
                i += consumed;
                continue;
            }
            (c, _) if c.is_ascii_digit() => {
                let (kind, consumed) = lex_number(&chars, i)?;
                tokens.push(Token { kind, position });
                i += consumed;
                continue;
            }
            (c, _) if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].1.is_alphanumeric() || chars[i].1 == '_') {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().map(|(_, c)| *c).collect();
                tokens.push(Token {
                    kind: TokenKind::Ident(ident),
                    position,
                });
                continue;
            }
            (c, _) => {
                return Err(ExprError::lex(position, format!("unexpected character {:?}", c)));
            }
        };

        tokens.push(Token { kind, position });
        i += width;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        position: source.len(),
    });

    Ok(tokens)
}

/// Lexes a quoted string starting at `start`; returns text and chars consumed
fn lex_string(chars: &[(usize, char)], start: usize) -> ExprResult<(String, usize)> {
    let (position, quote) = chars[start];
    let mut text = String::new();
    let mut i = start + 1;

    while i < chars.len() {
        let c = chars[i].1;
        if c == quote {
            return Ok((text, i + 1 - start));
        }
        if c == '\\' {
            let escaped = chars
                .get(i + 1)
                .map(|(_, c)| *c)
                .ok_or_else(|| ExprError::lex(chars[i].0, "dangling escape"))?;
            text.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
            i += 2;
            continue;
        }
        text.push(c);
        i += 1;
    }

    Err(ExprError::lex(position, "unterminated string literal"))
}

fn lex_number(chars: &[(usize, char)], start: usize) -> ExprResult<(TokenKind, usize)> {
    let position = chars[start].0;
    let mut i = start;
    let mut is_float = false;

    while i < chars.len() && chars[i].1.is_ascii_digit() {
        i += 1;
    }
    if i + 1 < chars.len() && chars[i].1 == '.' && chars[i + 1].1.is_ascii_digit() {
        is_float = true;
        i += 1;
        while i < chars.len() && chars[i].1.is_ascii_digit() {
            i += 1;
        }
    }
    if i < chars.len() && matches!(chars[i].1, 'e' | 'E') {
        let mut j = i + 1;
        if j < chars.len() && matches!(chars[j].1, '+' | '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].1.is_ascii_digit() {
            is_float = true;
            i = j;
            while i < chars.len() && chars[i].1.is_ascii_digit() {
                i += 1;
            }
        }
    }

    let text: String = chars[start..i].iter().map(|(_, c)| *c).collect();
    let kind = if is_float {
        TokenKind::Float(
            text.parse()
                .map_err(|_| ExprError::lex(position, format!("invalid number {}", text)))?,
        )
    } else {
        TokenKind::Int(
            text.parse()
                .map_err(|_| ExprError::lex(position, format!("integer {} out of range", text)))?,
        )
    };

    Ok((kind, i - start))
}
