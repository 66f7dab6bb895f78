use std::fmt;

/// Token kinds emitted by the lexer.
///
/// The DFA itself only distinguishes the structural kinds (`Ident`,
/// `Path`, `Number`, `Comparator`, `Comma`); keyword kinds are promoted
/// from accepted `Ident` lexemes through [`keyword_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Check,
    Service,
    Host,
    With,
    Init,
    If,
    And,
    For,
    Then,
    Cycles,
    Seconds,

    // Structural
    Ident,
    Path,
    Number,
    Comparator,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Check => "'check'",
            TokenKind::Service => "'service'",
            TokenKind::Host => "'host'",
            TokenKind::With => "'with'",
            TokenKind::Init => "'init'",
            TokenKind::If => "'if'",
            TokenKind::And => "'and'",
            TokenKind::For => "'for'",
            TokenKind::Then => "'then'",
            TokenKind::Cycles => "'cycles'",
            TokenKind::Seconds => "'seconds'",
            TokenKind::Ident => "identifier",
            TokenKind::Path => "metric path",
            TokenKind::Number => "number",
            TokenKind::Comparator => "comparison operator",
            TokenKind::Comma => "','",
        };
        f.write_str(s)
    }
}

/// Maps an accepted identifier lexeme to its keyword kind, if any.
pub fn keyword_kind(lexeme: &str) -> Option<TokenKind> {
    const KEYWORDS: &[(&str, TokenKind)] = &[
        ("check", TokenKind::Check),
        ("service", TokenKind::Service),
        ("host", TokenKind::Host),
        ("with", TokenKind::With),
        ("init", TokenKind::Init),
        ("if", TokenKind::If),
        ("and", TokenKind::And),
        ("for", TokenKind::For),
        ("then", TokenKind::Then),
        ("cycles", TokenKind::Cycles),
        ("cycle", TokenKind::Cycles),
        ("seconds", TokenKind::Seconds),
        ("second", TokenKind::Seconds),
    ];
    KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == lexeme)
        .map(|(_, kind)| *kind)
}

/// A lexed token with its source position (1-based line and column of
/// the first character).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.lexeme)
    }
}
