//! Recursive-descent parser for the predicate language
//!
//! Precedence, loosest first:
//! 1. `||`, `or`
//! 2. `&&`, `and`
//! 3. `==`, `!=`
//! 4. `<`, `<=`, `>`, `>=`, `in`, `contains`, `startsWith`, `endsWith`, `matches`
//! 5. `+`, `-`
//! 6. `*`, `/`, `%`
//! 7. unary `!`, `not`, `-`

use super::ast::{BinaryOp, Expr, Function, UnaryOp};
use super::errors::{ExprError, ExprResult};
use super::lexer::{tokenize, Token, TokenKind};
use crate::value::ScalarValue;

const KEYWORDS: &[&str] = &[
    "and", "or", "not", "in", "contains", "startsWith", "endsWith", "matches",
];

/// Parses predicate source into an expression tree.
pub fn parse(source: &str) -> ExprResult<Expr> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;

    let token = parser.peek();
    if token.kind != TokenKind::Eof {
        return Err(ExprError::parse(
            token.position,
            format!("unexpected trailing {}", describe(&token.kind)),
        ));
    }

    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize always terminates the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(name) if name == keyword)
    }

    fn expect(&mut self, kind: TokenKind) -> ExprResult<()> {
        let token = self.advance();
        if token.kind == kind {
            Ok(())
        } else {
            Err(ExprError::parse(
                token.position,
                format!("expected {}, found {}", describe(&kind), describe(&token.kind)),
            ))
        }
    }

    fn parse_or(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_and()?;
        while self.peek().kind == TokenKind::OrOr || self.peek_keyword("or") {
            self.advance();
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.peek().kind == TokenKind::AndAnd || self.peek_keyword("and") {
            self.advance();
            let right = self.parse_equality()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_relational()?;
            left = binary(op, left, right);
        }
    }

    fn parse_relational(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match relational(&self.peek().kind) {
                Some(Relational::Op(op)) => op,
                Some(Relational::In) => {
                    self.advance();
                    let items = self.parse_list()?;
                    left = Expr::In {
                        needle: Box::new(left),
                        items,
                    };
                    continue;
                }
                None => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
    }

    fn parse_list(&mut self) -> ExprResult<Vec<Expr>> {
        self.expect(TokenKind::LBracket)?;
        let mut items = Vec::new();
        if self.peek().kind == TokenKind::RBracket {
            self.advance();
            return Ok(items);
        }
        loop {
            items.push(self.parse_or()?);
            let token = self.advance();
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RBracket => return Ok(items),
                other => {
                    return Err(ExprError::parse(
                        token.position,
                        format!("expected ',' or ']', found {}", describe(&other)),
                    ))
                }
            }
        }
    }

    fn parse_additive(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> ExprResult<Expr> {
        let op = if self.peek().kind == TokenKind::Bang || self.peek_keyword("not") {
            UnaryOp::Not
        } else if self.peek().kind == TokenKind::Minus {
            UnaryOp::Neg
        } else {
            return self.parse_primary();
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> ExprResult<Expr> {
        let token = self.advance();
        match token.kind {
            TokenKind::Int(i) => Ok(Expr::Literal(ScalarValue::Integer(i))),
            TokenKind::Float(f) => Ok(Expr::Literal(ScalarValue::Float(f))),
            TokenKind::Str(s) => Ok(Expr::Literal(ScalarValue::String(s))),
            TokenKind::LParen => {
                let inner = self.parse_or()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => self.parse_ident(name, token.position),
            other => Err(ExprError::parse(
                token.position,
                format!("unexpected {}", describe(&other)),
            )),
        }
    }

    fn parse_ident(&mut self, name: String, position: usize) -> ExprResult<Expr> {
        match name.as_str() {
            "true" => return Ok(Expr::Literal(ScalarValue::Bool(true))),
            "false" => return Ok(Expr::Literal(ScalarValue::Bool(false))),
            "nil" | "null" => return Ok(Expr::Literal(ScalarValue::Null)),
            _ => {}
        }

        if KEYWORDS.contains(&name.as_str()) {
            return Err(ExprError::parse(
                position,
                format!("unexpected keyword {:?}", name),
            ));
        }
        if self.peek().kind == TokenKind::LParen {
            return self.parse_call(&name, position);
        }

        Ok(Expr::Name(name))
    }

    fn parse_call(&mut self, name: &str, position: usize) -> ExprResult<Expr> {
        let function = Function::from_name(name)
            .ok_or_else(|| ExprError::parse(position, format!("unknown function {:?}", name)))?;

        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.peek().kind != TokenKind::RParen {
            loop {
                args.push(self.parse_or()?);
                if self.peek().kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        Ok(Expr::Call { function, args })
    }
}

enum Relational {
    Op(BinaryOp),
    In,
}

fn relational(kind: &TokenKind) -> Option<Relational> {
    let op = match kind {
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Le => BinaryOp::Le,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::Ge => BinaryOp::Ge,
        TokenKind::Ident(name) => match name.as_str() {
            "contains" => BinaryOp::Contains,
            "startsWith" => BinaryOp::StartsWith,
            "endsWith" => BinaryOp::EndsWith,
            "matches" => BinaryOp::Matches,
            "in" => return Some(Relational::In),
            _ => return None,
        },
        _ => return None,
    };
    Some(Relational::Op(op))
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Int(i) => format!("number {}", i),
        TokenKind::Float(f) => format!("number {}", f),
        TokenKind::Str(s) => format!("string {:?}", s),
        TokenKind::Ident(name) => format!("name {:?}", name),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::LBracket => "'['".to_string(),
        TokenKind::RBracket => "']'".to_string(),
        TokenKind::Comma => "','".to_string(),
        TokenKind::Bang => "'!'".to_string(),
        TokenKind::EqEq => "'=='".to_string(),
        TokenKind::NotEq => "'!='".to_string(),
        TokenKind::Lt => "'<'".to_string(),
        TokenKind::Le => "'<='".to_string(),
        TokenKind::Gt => "'>'".to_string(),
        TokenKind::Ge => "'>='".to_string(),
        TokenKind::Plus => "'+'".to_string(),
        TokenKind::Minus => "'-'".to_string(),
        TokenKind::Star => "'*'".to_string(),
        TokenKind::Slash => "'/'".to_string(),
        TokenKind::Percent => "'%'".to_string(),
        TokenKind::AndAnd => "'&&'".to_string(),
        TokenKind::OrOr => "'||'".to_string(),
        TokenKind::Eof => "end of input".to_string(),
    }
}
