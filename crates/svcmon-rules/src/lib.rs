//! Rule definition language for svcmon.
//!
//! Rule files are plain text, one or more `check` blocks per file:
//!
//! ```text
//! # watch the cache daemon
//! check service memcached with init systemd
//!   if memory.rss > 100m for 2 cycles then restart, alert
//!   if cpu.user > 90% then alert
//!
//! check host
//!   if load.1 > 4 and swap > 50% for 30 seconds then alert
//! ```
//!
//! [`tokenize`](lexer::tokenize) runs a table-driven DFA (see
//! [`table`]) over the source with maximal munch; [`parser::parse`]
//! consumes the token stream by recursive descent with one token of
//! lookahead into a [`ast::RuleFile`]. Both fail fast with positioned
//! errors; a file that does not lex and parse cleanly contributes no
//! rules at all.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

mod table;

#[cfg(test)]
mod tests;

use ast::RuleFile;
use error::RuleError;

/// Lex and parse a complete rule file.
pub fn parse_str(source: &str) -> Result<RuleFile, RuleError> {
    let tokens = lexer::tokenize(source)?;
    Ok(parser::parse(tokens)?)
}
