//! Shorthand clause parser.
//!
//! Accepts only the small grammar used by relation calls:
//!
//! ```text
//! where      := clause ("," clause)*
//! clause     := ident ("=" | IN) "?"
//! assignment := ident "=" "?" ("," ident "=" "?")*
//! order      := ident [ASC | DESC] ("," ident [ASC | DESC])*
//! ```
//!
//! Anything else is rejected with the byte offset where scanning stopped.

use super::expr::Expr;
use crate::error::{OrmError, OrmResult};
use crate::value::Arg;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Eq,
    Question,
    Comma,
    End,
}

impl Token<'_> {
    fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("'{}'", s),
            Token::Eq => "'='".to_string(),
            Token::Question => "'?'".to_string(),
            Token::Comma => "','".to_string(),
            Token::End => "end of input".to_string(),
        }
    }
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    peeked: Option<(usize, Token<'a>)>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            peeked: None,
        }
    }

    fn peek(&mut self) -> OrmResult<(usize, Token<'a>)> {
        if let Some(tok) = self.peeked {
            return Ok(tok);
        }
        let tok = self.scan()?;
        self.peeked = Some(tok);
        Ok(tok)
    }

    fn next(&mut self) -> OrmResult<(usize, Token<'a>)> {
        match self.peeked.take() {
            Some(tok) => Ok(tok),
            None => self.scan(),
        }
    }

    fn scan(&mut self) -> OrmResult<(usize, Token<'a>)> {
        let rest = &self.src[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();

        let start = self.pos;
        let Some(ch) = trimmed.chars().next() else {
            return Ok((start, Token::End));
        };

        let tok = match ch {
            '=' => Token::Eq,
            '?' => Token::Question,
            ',' => Token::Comma,
            c if is_ident_char(c) => {
                let len = trimmed
                    .find(|c: char| !is_ident_char(c))
                    .unwrap_or(trimmed.len());
                self.pos += len;
                return Ok((start, Token::Ident(&trimmed[..len])));
            }
            other => {
                return Err(OrmError::parse(
                    start,
                    format!("unexpected character '{}'", other),
                ));
            }
        };
        self.pos += ch.len_utf8();
        Ok((start, tok))
    }

    fn expect(&mut self, want: Token<'static>, what: &str) -> OrmResult<usize> {
        let (pos, tok) = self.next()?;
        if tok == want {
            Ok(pos)
        } else {
            Err(unexpected(pos, tok, what))
        }
    }

    fn ident(&mut self) -> OrmResult<(usize, &'a str)> {
        match self.next()? {
            (pos, Token::Ident(name)) => Ok((pos, name)),
            (pos, tok) => Err(unexpected(pos, tok, "a column name")),
        }
    }

    /// Consume a separating comma, or report whether input ended.
    fn comma_or_end(&mut self) -> OrmResult<bool> {
        match self.next()? {
            (_, Token::Comma) => Ok(true),
            (_, Token::End) => Ok(false),
            (pos, tok) => Err(unexpected(pos, tok, "',' or end of input")),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn unexpected(pos: usize, tok: Token<'_>, expected: &str) -> OrmError {
    OrmError::parse(pos, format!("expected {}, found {}", expected, tok.describe()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Eq,
    In,
}

struct Clause<'a> {
    field: &'a str,
    op: Op,
    /// Offset of the `?`
    pos: usize,
}

fn scan_clauses(query: &str, allow_in: bool) -> OrmResult<Vec<Clause<'_>>> {
    let mut sc = Scanner::new(query);
    let mut clauses = Vec::new();

    loop {
        let (_, field) = sc.ident()?;
        let op = match sc.next()? {
            (_, Token::Eq) => Op::Eq,
            (pos, Token::Ident(kw)) if kw.eq_ignore_ascii_case("IN") => {
                if !allow_in {
                    return Err(OrmError::parse(pos, "IN is not allowed in an assignment"));
                }
                Op::In
            }
            (pos, tok) => {
                let expected = if allow_in { "'=' or IN" } else { "'='" };
                return Err(unexpected(pos, tok, expected));
            }
        };
        let pos = sc.expect(Token::Question, "'?'")?;
        clauses.push(Clause { field, op, pos });

        if !sc.comma_or_end()? {
            return Ok(clauses);
        }
    }
}

fn bind_clauses(query: &str, clauses: Vec<Clause<'_>>, args: Vec<Arg>) -> OrmResult<Vec<Expr>> {
    if clauses.len() != args.len() {
        return Err(OrmError::parse(
            query.len(),
            format!("{} arguments passed, {} expected", args.len(), clauses.len()),
        ));
    }

    clauses
        .into_iter()
        .zip(args)
        .enumerate()
        .map(|(i, (clause, arg))| match (clause.op, arg) {
            (Op::Eq, Arg::Scalar(value)) => Ok(Expr::assign(clause.field, value)),
            (Op::In, Arg::List(values)) => Ok(Expr::in_list(clause.field, values)),
            (Op::Eq, Arg::List(_)) => Err(OrmError::parse(
                clause.pos,
                format!("expected argument {} to be a single value, got a list", i),
            )),
            (Op::In, Arg::Scalar(value)) => Err(OrmError::parse(
                clause.pos,
                format!("expected argument {} to be a list, got {}", i, value.type_name()),
            )),
        })
        .collect()
}

/// Parse `field = ?[, field = ?]*` into `Assignment` nodes.
pub fn parse_assignment(query: &str, args: Vec<Arg>) -> OrmResult<Vec<Expr>> {
    let clauses = scan_clauses(query, false)?;
    bind_clauses(query, clauses, args)
}

/// Parse `field (= | IN) ?[, ...]*` into `Assignment` / `In` nodes.
pub fn parse_where(query: &str, args: Vec<Arg>) -> OrmResult<Vec<Expr>> {
    let clauses = scan_clauses(query, true)?;
    bind_clauses(query, clauses, args)
}

/// Parse `field [ASC|DESC][, ...]*` into `Ascending` / `Descending` nodes.
pub fn parse_order(query: &str) -> OrmResult<Vec<Expr>> {
    let mut sc = Scanner::new(query);
    let mut orders = Vec::new();

    loop {
        let (_, field) = sc.ident()?;
        let order = match sc.peek()? {
            (_, Token::Ident(dir)) => {
                let (pos, _) = sc.next()?;
                if dir.eq_ignore_ascii_case("ASC") {
                    Expr::asc(field)
                } else if dir.eq_ignore_ascii_case("DESC") {
                    Expr::desc(field)
                } else {
                    return Err(OrmError::parse(
                        pos,
                        format!("unknown order direction '{}'", dir),
                    ));
                }
            }
            _ => Expr::asc(field),
        };
        orders.push(order);

        if !sc.comma_or_end()? {
            return Ok(orders);
        }
    }
}
