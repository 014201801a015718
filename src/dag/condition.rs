// src/dag/condition.rs

//! Compiler for prerequisite expressions such as `a & (b | c)`.
//!
//! The expression language is deliberately tiny:
//! - task names are references, true iff the task has succeeded
//! - `&` and `|` combine two sub-expressions
//! - parentheses group
//!
//! `&` binds tighter than `|`, as in ordinary boolean algebra, and both are
//! left-associative: `a | b & c` means `a | (b & c)`. Negation and any other
//! operator character are rejected with a [`ParseError`].
//!
//! Trees are at most [`MAX_DEPTH`] levels deep, counting both operators and
//! parentheses, since evaluation and drop recurse once per level.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::dag::TaskId;

/// One token per match: an operator, a task name, or any other
/// non-blank character (which is always an error).
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([()&|])|([\w\-+%@.:]+)|(\S)").expect("token regex is valid")
});

/// Deepest condition `compile` accepts.
pub const MAX_DEPTH: usize = 128;

/// Errors raised while compiling a prerequisite expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unsupported operator '{op}' at offset {offset} in condition \"{text}\"")]
    UnsupportedOperator {
        op: char,
        offset: usize,
        text: String,
    },

    #[error("empty condition")]
    Empty,

    #[error("unbalanced parentheses in condition \"{text}\"")]
    UnbalancedParens { text: String },

    #[error("missing operand at offset {offset} in condition \"{text}\"")]
    MissingOperand { offset: usize, text: String },

    #[error("missing operator before offset {offset} in condition \"{text}\"")]
    MissingOperator { offset: usize, text: String },

    #[error("condition nests deeper than {limit} levels: \"{text}\"")]
    TooDeep { limit: usize, text: String },
}

/// Boolean expression over "task has succeeded" predicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Ref(TaskId),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// Compile prerequisite text into a condition tree.
    pub fn compile(text: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut parser = Parser {
            text,
            tokens,
            pos: 0,
            nesting: 0,
        };
        let (condition, _) = parser.parse_or()?;

        // Only a stray `)` can stop `parse_or` early.
        if parser.pos < parser.tokens.len() {
            return Err(ParseError::UnbalancedParens {
                text: text.to_string(),
            });
        }

        Ok(condition)
    }

    pub fn task(name: impl Into<TaskId>) -> Self {
        Condition::Ref(name.into())
    }

    pub fn and(left: Condition, right: Condition) -> Self {
        Condition::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Condition, right: Condition) -> Self {
        Condition::Or(Box::new(left), Box::new(right))
    }

    /// Evaluate against the current set of succeeded tasks.
    pub fn evaluate(&self, succeeded: &BTreeSet<TaskId>) -> bool {
        match self {
            Condition::Ref(task) => succeeded.contains(task),
            Condition::And(left, right) => left.evaluate(succeeded) && right.evaluate(succeeded),
            Condition::Or(left, right) => left.evaluate(succeeded) || right.evaluate(succeeded),
        }
    }

    /// Every task named in this condition, in order of first appearance.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_refs(false, &mut |name, _| {
            if !out.contains(&name) {
                out.push(name);
            }
        });
        out
    }

    /// Tasks that appear beneath an `|`, i.e. whose success is not strictly
    /// required for the condition to hold.
    pub fn conditional_refs(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_refs(false, &mut |name, under_or| {
            if under_or {
                out.insert(name);
            }
        });
        out
    }

    fn collect_refs<'a>(&'a self, under_or: bool, visit: &mut impl FnMut(&'a str, bool)) {
        match self {
            Condition::Ref(task) => visit(task.as_str(), under_or),
            Condition::And(left, right) => {
                left.collect_refs(under_or, visit);
                right.collect_refs(under_or, visit);
            }
            Condition::Or(left, right) => {
                left.collect_refs(true, visit);
                right.collect_refs(true, visit);
            }
        }
    }
}

impl FromStr for Condition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::compile(s)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Ref(task) => f.write_str(task),
            Condition::And(left, right) => write!(f, "({left} & {right})"),
            Condition::Or(left, right) => write!(f, "({left} | {right})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind<'a> {
    LParen,
    RParen,
    And,
    Or,
    Name(&'a str),
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: TokenKind<'a>,
    offset: usize,
}

fn tokenize(text: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut tokens = Vec::new();

    for caps in TOKEN_RE.captures_iter(text) {
        if let Some(op) = caps.get(1) {
            let kind = match op.as_str() {
                "(" => TokenKind::LParen,
                ")" => TokenKind::RParen,
                "&" => TokenKind::And,
                _ => TokenKind::Or,
            };
            tokens.push(Token {
                kind,
                offset: op.start(),
            });
        } else if let Some(name) = caps.get(2) {
            tokens.push(Token {
                kind: TokenKind::Name(name.as_str()),
                offset: name.start(),
            });
        } else if let Some(other) = caps.get(3) {
            return Err(ParseError::UnsupportedOperator {
                op: other.as_str().chars().next().unwrap_or_default(),
                offset: other.start(),
                text: text.to_string(),
            });
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    /// Open parentheses around the current position.
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// `and_expr ('|' and_expr)*`, folded to the left.
    fn parse_or(&mut self) -> Result<(Condition, usize), ParseError> {
        let (mut acc, mut depth) = self.parse_and()?;

        while let Some(Token {
            kind: TokenKind::Or,
            ..
        }) = self.peek()
        {
            self.pos += 1;
            let (rhs, rhs_depth) = self.parse_and()?;
            depth = self.combined_depth(depth, rhs_depth)?;
            acc = Condition::or(acc, rhs);
        }

        Ok((acc, depth))
    }

    /// `operand ('&' operand)*`, folded to the left.
    fn parse_and(&mut self) -> Result<(Condition, usize), ParseError> {
        let (mut acc, mut depth) = self.parse_operand()?;

        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::And => {}
                TokenKind::Or | TokenKind::RParen => break,
                TokenKind::Name(_) | TokenKind::LParen => {
                    return Err(ParseError::MissingOperator {
                        offset: tok.offset,
                        text: self.text.to_string(),
                    });
                }
            }
            self.pos += 1;
            let (rhs, rhs_depth) = self.parse_operand()?;
            depth = self.combined_depth(depth, rhs_depth)?;
            acc = Condition::and(acc, rhs);
        }

        Ok((acc, depth))
    }

    fn parse_operand(&mut self) -> Result<(Condition, usize), ParseError> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Name(name),
                ..
            }) => Ok((Condition::task(name), 1)),
            Some(Token {
                kind: TokenKind::LParen,
                ..
            }) => {
                self.nesting += 1;
                if self.nesting > MAX_DEPTH {
                    return Err(self.too_deep());
                }
                let inner = self.parse_or()?;
                self.nesting -= 1;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    _ => Err(ParseError::UnbalancedParens {
                        text: self.text.to_string(),
                    }),
                }
            }
            Some(tok) => Err(ParseError::MissingOperand {
                offset: tok.offset,
                text: self.text.to_string(),
            }),
            None => Err(ParseError::MissingOperand {
                offset: self.text.len(),
                text: self.text.to_string(),
            }),
        }
    }

    fn combined_depth(&self, left: usize, right: usize) -> Result<usize, ParseError> {
        let depth = left.max(right) + 1;
        if depth > MAX_DEPTH {
            return Err(self.too_deep());
        }
        Ok(depth)
    }

    fn too_deep(&self) -> ParseError {
        ParseError::TooDeep {
            limit: MAX_DEPTH,
            text: self.text.to_string(),
        }
    }
}
