use thiserror::Error;

/// Lexical failure: the automaton reached a dead end without passing
/// through an accepting state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at line {line}, column {col}")]
    UnexpectedChar { ch: char, line: u32, col: u32 },

    /// End of input inside a token prefix that never became accepting
    /// (e.g. a bare `!` or a number ending in `.`).
    #[error("unexpected end of input at line {line}, column {col}")]
    UnexpectedEof { line: u32, col: u32 },
}

/// Grammar violation at a specific token. Parsing stops at the first
/// offending token; there is no recovery or partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} but found {found} at line {line}, column {col}")]
pub struct ParseError {
    pub expected: String,
    pub found: String,
    pub line: u32,
    pub col: u32,
}

/// Any load-time failure of a rule file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
