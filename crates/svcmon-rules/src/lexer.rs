//! Maximal-munch scanner over the static DFA tables.

use crate::error::LexError;
use crate::table::{char_class, ACTIONS, DEAD, START, TRANSITIONS};
use crate::token::{keyword_kind, Token, TokenKind};

/// Tokenizes a complete rule source. Whitespace runs and comments are
/// matched by the automaton but discarded; they never appear in the
/// output. Fails on the first character for which no viable token
/// exists.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    // Rule files are small; materialize chars with their positions so
    // the scanner can rewind to the last accepting state cheaply.
    let mut chars: Vec<(char, u32, u32)> = Vec::with_capacity(source.len());
    let (mut line, mut col) = (1u32, 1u32);
    for c in source.chars() {
        chars.push((c, line, col));
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    let eof_pos = (line, col);

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        let mut state = START;
        let mut last_accept: Option<(usize, usize)> = None; // (end index, state)

        let mut j = i;
        while j < chars.len() {
            let next = TRANSITIONS[state][char_class(chars[j].0)];
            if next == DEAD {
                break;
            }
            state = next as usize;
            j += 1;
            if ACTIONS[state].is_accepting() {
                last_accept = Some((j, state));
            }
        }

        let Some((end, accept_state)) = last_accept else {
            // Dead end with nothing accepted: the offending position is
            // the character that had no transition, or end of input.
            return Err(match chars.get(j) {
                Some(&(ch, l, c)) => LexError::UnexpectedChar { ch, line: l, col: c },
                None => LexError::UnexpectedEof {
                    line: eof_pos.0,
                    col: eof_pos.1,
                },
            });
        };

        let row = &ACTIONS[accept_state];
        if row.ignore.is_none() {
            let lexeme: String = chars[start..end].iter().map(|&(c, _, _)| c).collect();
            let kind = match row.accept {
                Some(TokenKind::Ident) => keyword_kind(&lexeme).unwrap_or(TokenKind::Ident),
                Some(kind) => kind,
                // Unreachable: every non-ignore accepting row names a kind.
                None => TokenKind::Ident,
            };
            tokens.push(Token {
                kind,
                lexeme,
                line: chars[start].1,
                col: chars[start].2,
            });
        }
        i = end;
    }

    Ok(tokens)
}
