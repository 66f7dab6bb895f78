//! Recursive-descent parser over the lexed token stream.
//!
//! One token of lookahead, fail-fast: the first token that violates the
//! grammar aborts the parse with a positioned [`ParseError`]. There is
//! no recovery and no partial output.

use crate::ast::{Action, CheckBlock, CheckTarget, CompareOp, ConditionExpr, RuleDef, RuleFile, Window};
use crate::error::ParseError;
use crate::token::{Token, TokenKind};

/// Parses a complete token stream into a [`RuleFile`].
pub fn parse(tokens: Vec<Token>) -> Result<RuleFile, ParseError> {
    let mut p = Parser { tokens, pos: 0 };
    let mut checks = Vec::new();
    while p.peek().is_some() {
        checks.push(p.check_block()?);
    }
    Ok(RuleFile { checks })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Position just past the last consumed token, for end-of-input
    /// diagnostics.
    fn eof_error(&self, expected: impl Into<String>) -> ParseError {
        let (line, col) = self
            .tokens
            .last()
            .map(|t| (t.line, t.col + t.lexeme.chars().count() as u32))
            .unwrap_or((1, 1));
        ParseError {
            expected: expected.into(),
            found: "end of input".to_string(),
            line,
            col,
        }
    }

    fn error_at(tok: &Token, expected: impl Into<String>) -> ParseError {
        ParseError {
            expected: expected.into(),
            found: format!("'{}'", tok.lexeme),
            line: tok.line,
            col: tok.col,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.peek() {
            Some(tok) if tok.kind == kind => {
                let tok = tok.clone();
                self.pos += 1;
                Ok(tok)
            }
            Some(tok) => Err(Self::error_at(tok, kind.to_string())),
            None => Err(self.eof_error(kind.to_string())),
        }
    }

    fn check_block(&mut self) -> Result<CheckBlock, ParseError> {
        self.expect(TokenKind::Check)?;

        let target = match self.peek() {
            Some(tok) if tok.kind == TokenKind::Host => {
                self.advance();
                CheckTarget::Host
            }
            Some(tok) if tok.kind == TokenKind::Service => {
                self.advance();
                let name = self.expect(TokenKind::Ident)?;
                CheckTarget::Service(name.lexeme)
            }
            Some(tok) => return Err(Self::error_at(tok, "'host' or 'service'")),
            None => return Err(self.eof_error("'host' or 'service'")),
        };

        let init = if matches!(self.peek(), Some(t) if t.kind == TokenKind::With) {
            self.advance();
            self.expect(TokenKind::Init)?;
            Some(self.expect(TokenKind::Ident)?.lexeme)
        } else {
            None
        };

        let mut rules = Vec::new();
        while matches!(self.peek(), Some(t) if t.kind == TokenKind::If) {
            rules.push(self.rule()?);
        }

        Ok(CheckBlock { target, init, rules })
    }

    fn rule(&mut self) -> Result<RuleDef, ParseError> {
        self.expect(TokenKind::If)?;

        let mut condition = self.comparison()?;
        while matches!(self.peek(), Some(t) if t.kind == TokenKind::And) {
            self.advance();
            let rhs = self.comparison()?;
            condition = ConditionExpr::And(Box::new(condition), Box::new(rhs));
        }

        let window = self.window()?;

        self.expect(TokenKind::Then)?;
        let actions = self.actions()?;

        Ok(RuleDef {
            condition,
            window,
            actions,
        })
    }

    fn comparison(&mut self) -> Result<ConditionExpr, ParseError> {
        let metric = match self.peek() {
            Some(tok) if tok.kind == TokenKind::Path || tok.kind == TokenKind::Ident => {
                let lexeme = tok.lexeme.clone();
                self.pos += 1;
                lexeme
            }
            Some(tok) => return Err(Self::error_at(tok, "metric path")),
            None => return Err(self.eof_error("metric path")),
        };

        let op_tok = self.expect(TokenKind::Comparator)?;
        let op: CompareOp = op_tok
            .lexeme
            .parse()
            .map_err(|_| Self::error_at(&op_tok, "comparison operator"))?;

        let num = self.expect(TokenKind::Number)?;
        let threshold = parse_threshold(&num.lexeme)
            .ok_or_else(|| Self::error_at(&num, "numeric threshold"))?;

        Ok(ConditionExpr::Compare {
            metric,
            op,
            threshold,
        })
    }

    fn window(&mut self) -> Result<Window, ParseError> {
        if !matches!(self.peek(), Some(t) if t.kind == TokenKind::For) {
            return Ok(Window::Immediate);
        }
        self.advance();

        let num = self.expect(TokenKind::Number)?;
        let count: u64 = num
            .lexeme
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| Self::error_at(&num, "positive whole number"))?;

        match self.advance() {
            Some(tok) if tok.kind == TokenKind::Cycles => {
                let count = u32::try_from(count)
                    .map_err(|_| Self::error_at(&num, "cycle count that fits in 32 bits"))?;
                Ok(Window::Cycles(count))
            }
            Some(tok) if tok.kind == TokenKind::Seconds => Ok(Window::Seconds(count)),
            Some(tok) => {
                let tok = tok.clone();
                Err(Self::error_at(&tok, "'cycles' or 'seconds'"))
            }
            None => Err(self.eof_error("'cycles' or 'seconds'")),
        }
    }

    fn actions(&mut self) -> Result<Vec<Action>, ParseError> {
        let mut actions = vec![self.action()?];
        while matches!(self.peek(), Some(t) if t.kind == TokenKind::Comma) {
            self.advance();
            actions.push(self.action()?);
        }
        Ok(actions)
    }

    fn action(&mut self) -> Result<Action, ParseError> {
        let tok = self.expect(TokenKind::Ident).map_err(|mut e| {
            e.expected = "action name (alert, restart, reload)".to_string();
            e
        })?;
        tok.lexeme
            .parse()
            .map_err(|_| Self::error_at(&tok, "action name (alert, restart, reload)"))
    }
}

/// Parses a threshold lexeme: a decimal number with an optional
/// magnitude suffix `k`/`m`/`g`/`t` (powers of 1024) or a `%` sign
/// (annotation only, numerically ignored).
fn parse_threshold(lexeme: &str) -> Option<f64> {
    let (digits, multiplier) = match lexeme.chars().last() {
        Some('k') | Some('K') => (&lexeme[..lexeme.len() - 1], 1024.0),
        Some('m') | Some('M') => (&lexeme[..lexeme.len() - 1], 1024.0 * 1024.0),
        Some('g') | Some('G') => (&lexeme[..lexeme.len() - 1], 1024.0 * 1024.0 * 1024.0),
        Some('t') | Some('T') => (&lexeme[..lexeme.len() - 1], 1024.0f64.powi(4)),
        Some('%') => (&lexeme[..lexeme.len() - 1], 1.0),
        Some(c) if c.is_ascii_alphabetic() => return None,
        _ => (lexeme, 1.0),
    };
    digits.parse::<f64>().ok().map(|v| v * multiplier)
}
