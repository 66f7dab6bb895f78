//! Static DFA tables for the rule lexer.
//!
//! The automaton is data, not code: [`TRANSITIONS`] maps
//! `(state, character class)` to the next state (`DEAD` when no
//! transition is defined) and [`ACTIONS`] records, per state, the token
//! kind accepted in that state or the ignore class for insignificant
//! text. The scanner in [`crate::lexer`] interprets these tables and
//! contains no per-token branching of its own.

use crate::token::TokenKind;

/// Character classes the automaton discriminates on.
///
/// Anything not listed (including all non-ASCII input) falls into
/// `Other`, which has no transitions outside comments.
#[derive(Debug, Clone, Copy)]
#[repr(usize)]
enum Class {
    Letter = 0,  // a-z A-Z _
    Digit = 1,   // 0-9
    Dot = 2,     // .
    Sep = 3,     // : /
    Lt = 4,      // <
    Gt = 5,      // >
    Eq = 6,      // =
    Bang = 7,    // !
    Comma = 8,   // ,
    Hash = 9,    // #
    Newline = 10, // \n
    Space = 11,  // space, tab, \r
    Dash = 12,   // -
    Percent = 13, // %
    Other = 14,
}

pub(crate) const NUM_CLASSES: usize = 15;
pub(crate) const NUM_STATES: usize = 20;

/// Sentinel for "no transition defined".
pub(crate) const DEAD: i8 = -1;

/// Start state of the automaton.
pub(crate) const START: usize = 0;

pub(crate) fn char_class(c: char) -> usize {
    let cls = match c {
        'a'..='z' | 'A'..='Z' | '_' => Class::Letter,
        '0'..='9' => Class::Digit,
        '.' => Class::Dot,
        ':' | '/' => Class::Sep,
        '<' => Class::Lt,
        '>' => Class::Gt,
        '=' => Class::Eq,
        '!' => Class::Bang,
        ',' => Class::Comma,
        '#' => Class::Hash,
        '\n' => Class::Newline,
        ' ' | '\t' | '\r' => Class::Space,
        '-' => Class::Dash,
        '%' => Class::Percent,
        _ => Class::Other,
    };
    cls as usize
}

/// Lexeme classes recognized but never emitted as tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IgnoreClass {
    Whitespace,
    Comment,
}

/// Per-state action: the token kind accepted in this state, or the
/// ignore class when the matched text is discarded. A state with
/// neither is non-accepting.
pub(crate) struct ActionRow {
    pub accept: Option<TokenKind>,
    pub ignore: Option<IgnoreClass>,
}

impl ActionRow {
    pub fn is_accepting(&self) -> bool {
        self.accept.is_some() || self.ignore.is_some()
    }
}

const fn row(accept: Option<TokenKind>, ignore: Option<IgnoreClass>) -> ActionRow {
    ActionRow { accept, ignore }
}

// State roles:
//   S0  start
//   S1  identifier            S2  path separator seen
//   S3  metric path           S4  integer part
//   S5  decimal point seen    S6  fraction part
//   S7  magnitude/% suffix    S8  leading '-'
//   S9  '<'    S10 '<='   S11 '>'   S12 '>='
//   S13 '='    S14 '=='   S15 '!'   S16 '!='
//   S17 ','    S18 whitespace run   S19 comment body
#[rustfmt::skip]
pub(crate) static TRANSITIONS: [[i8; NUM_CLASSES]; NUM_STATES] = [
    //        Let Dig Dot Sep  Lt  Gt  Eq Bng  Com Hsh  NL  Sp Dsh Pct Oth
    /* S0  */ [  1,  4, -1, -1,  9, 11, 13, 15, 17, 19, 18, 18,  8, -1, -1],
    /* S1  */ [  1,  1,  2,  2, -1, -1, -1, -1, -1, -1, -1, -1,  1, -1, -1],
    /* S2  */ [  3,  3,  2,  2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S3  */ [  3,  3,  2,  2, -1, -1, -1, -1, -1, -1, -1, -1,  3, -1, -1],
    /* S4  */ [  7,  4,  5, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,  7, -1],
    /* S5  */ [ -1,  6, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S6  */ [  7,  6, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,  7, -1],
    /* S7  */ [ -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S8  */ [ -1,  4, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S9  */ [ -1, -1, -1, -1, -1, -1, 10, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S10 */ [ -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S11 */ [ -1, -1, -1, -1, -1, -1, 12, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S12 */ [ -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S13 */ [ -1, -1, -1, -1, -1, -1, 14, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S14 */ [ -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S15 */ [ -1, -1, -1, -1, -1, -1, 16, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S16 */ [ -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S17 */ [ -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    /* S18 */ [ -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 18, 18, -1, -1, -1],
    /* S19 */ [ 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, -1, 19, 19, 19, 19],
];

#[rustfmt::skip]
pub(crate) static ACTIONS: [ActionRow; NUM_STATES] = [
    /* S0  */ row(None, None),
    /* S1  */ row(Some(TokenKind::Ident), None),
    /* S2  */ row(None, None),
    /* S3  */ row(Some(TokenKind::Path), None),
    /* S4  */ row(Some(TokenKind::Number), None),
    /* S5  */ row(None, None),
    /* S6  */ row(Some(TokenKind::Number), None),
    /* S7  */ row(Some(TokenKind::Number), None),
    /* S8  */ row(None, None),
    /* S9  */ row(Some(TokenKind::Comparator), None),
    /* S10 */ row(Some(TokenKind::Comparator), None),
    /* S11 */ row(Some(TokenKind::Comparator), None),
    /* S12 */ row(Some(TokenKind::Comparator), None),
    /* S13 */ row(None, None),
    /* S14 */ row(Some(TokenKind::Comparator), None),
    /* S15 */ row(None, None),
    /* S16 */ row(Some(TokenKind::Comparator), None),
    /* S17 */ row(Some(TokenKind::Comma), None),
    /* S18 */ row(None, Some(IgnoreClass::Whitespace)),
    /* S19 */ row(None, Some(IgnoreClass::Comment)),
];
