use crate::ast::{Action, CheckTarget, CompareOp, ConditionExpr, Window};
use crate::error::{LexError, RuleError};
use crate::lexer::tokenize;
use crate::parse_str;
use crate::token::TokenKind;

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src).unwrap().iter().map(|t| t.kind).collect()
}

#[test]
fn tokenizes_a_rule_line() {
    let toks = tokenize("if cpu.user > 90% for 3 cycles then alert").unwrap();
    let kinds: Vec<TokenKind> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::If,
            TokenKind::Path,
            TokenKind::Comparator,
            TokenKind::Number,
            TokenKind::For,
            TokenKind::Number,
            TokenKind::Cycles,
            TokenKind::Then,
            TokenKind::Ident,
        ]
    );
    assert_eq!(toks[1].lexeme, "cpu.user");
    assert_eq!(toks[3].lexeme, "90%");
}

#[test]
fn whitespace_and_comments_never_surface() {
    let sparse = "check host if swap > 50 then alert";
    let dense = "check host\n  # swap is tight on this box\n  if swap>50 then alert\n";
    assert_eq!(kinds(sparse), kinds(dense));

    for tok in tokenize(dense).unwrap() {
        assert!(!tok.lexeme.trim().is_empty());
        assert!(!tok.lexeme.starts_with('#'));
    }
}

#[test]
fn maximal_munch_prefers_longer_comparators() {
    let toks = tokenize("a >= 1").unwrap();
    assert_eq!(toks[1].kind, TokenKind::Comparator);
    assert_eq!(toks[1].lexeme, ">=");
}

#[test]
fn positions_are_one_based_line_and_column() {
    let toks = tokenize("check host\n  if swap > 1 then alert").unwrap();
    assert_eq!((toks[0].line, toks[0].col), (1, 1));
    assert_eq!((toks[1].line, toks[1].col), (1, 7));
    assert_eq!((toks[2].line, toks[2].col), (2, 3)); // 'if'
}

#[test]
fn lex_error_reports_offending_character() {
    let err = tokenize("if swap > $1 then alert").unwrap_err();
    assert_eq!(
        err,
        LexError::UnexpectedChar {
            ch: '$',
            line: 1,
            col: 11
        }
    );
}

#[test]
fn lex_error_on_truncated_token_at_eof() {
    // '!' alone never reaches an accepting state.
    let err = tokenize("if swap !").unwrap_err();
    assert!(matches!(err, LexError::UnexpectedEof { .. }));
}

#[test]
fn metric_paths_accept_colon_and_slash_separators() {
    let toks = tokenize("memory:rss disk./var").unwrap();
    assert_eq!(toks[0].kind, TokenKind::Path);
    assert_eq!(toks[0].lexeme, "memory:rss");
    assert_eq!(toks[1].kind, TokenKind::Path);
    assert_eq!(toks[1].lexeme, "disk./var");
}

#[test]
fn parses_one_rule_per_declaration_in_source_order() {
    let src = "\
# production cache
check service memcached with init systemd
  if memory.rss > 100m for 2 cycles then restart, alert
  if cpu.user > 90% then alert

check host
  if load.1 > 4 and swap > 50% for 30 seconds then alert
";
    let file = parse_str(src).unwrap();
    assert_eq!(file.checks.len(), 2);

    let svc = &file.checks[0];
    assert_eq!(svc.target, CheckTarget::Service("memcached".to_string()));
    assert_eq!(svc.init.as_deref(), Some("systemd"));
    assert_eq!(svc.rules.len(), 2);
    assert_eq!(svc.rules[0].window, Window::Cycles(2));
    assert_eq!(svc.rules[0].actions, vec![Action::Restart, Action::Alert]);
    match &svc.rules[0].condition {
        ConditionExpr::Compare { metric, op, threshold } => {
            assert_eq!(metric, "memory.rss");
            assert_eq!(*op, CompareOp::GreaterThan);
            assert_eq!(*threshold, 100.0 * 1024.0 * 1024.0);
        }
        other => panic!("expected comparison, got {other:?}"),
    }
    assert_eq!(svc.rules[1].window, Window::Immediate);

    let host = &file.checks[1];
    assert_eq!(host.target, CheckTarget::Host);
    assert_eq!(host.init, None);
    assert_eq!(host.rules.len(), 1);
    assert_eq!(host.rules[0].window, Window::Seconds(30));
    match &host.rules[0].condition {
        ConditionExpr::And(lhs, rhs) => {
            assert_eq!(lhs.first_metric(), "load.1");
            match rhs.as_ref() {
                ConditionExpr::Compare { metric, .. } => assert_eq!(metric, "swap"),
                other => panic!("expected comparison, got {other:?}"),
            }
        }
        other => panic!("expected conjunction, got {other:?}"),
    }
}

#[test]
fn unknown_action_fails_at_load_time() {
    let err = parse_str("check host\n  if swap > 50 then page_everyone\n").unwrap_err();
    match err {
        RuleError::Parse(e) => {
            assert!(e.expected.contains("action name"));
            assert_eq!(e.found, "'page_everyone'");
            assert_eq!(e.line, 2);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn empty_condition_is_a_parse_error() {
    let err = parse_str("check host\n  if then alert\n").unwrap_err();
    match err {
        RuleError::Parse(e) => {
            assert_eq!(e.expected, "metric path");
            assert_eq!(e.found, "'then'");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn zero_length_window_is_rejected() {
    let err = parse_str("check host\n  if swap > 50 for 0 cycles then alert\n").unwrap_err();
    assert!(matches!(err, RuleError::Parse(_)));
}

#[test]
fn truncated_file_reports_end_of_input() {
    let err = parse_str("check service memcached\n  if swap > 50 then").unwrap_err();
    match err {
        RuleError::Parse(e) => assert_eq!(e.found, "end of input"),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn negative_and_fractional_thresholds_parse() {
    let file = parse_str("check host if load.1 >= -1.5 then alert").unwrap();
    match &file.checks[0].rules[0].condition {
        ConditionExpr::Compare { op, threshold, .. } => {
            assert_eq!(*op, CompareOp::GreaterEqual);
            assert_eq!(*threshold, -1.5);
        }
        other => panic!("expected comparison, got {other:?}"),
    }
}

#[test]
fn dashed_names_lex_as_single_tokens() {
    // systemd unit names commonly contain dashes.
    let toks = tokenize("ssh-agent dbus-org.freedesktop.timesync1").unwrap();
    assert_eq!(toks[0].kind, TokenKind::Ident);
    assert_eq!(toks[0].lexeme, "ssh-agent");
    assert_eq!(toks[1].kind, TokenKind::Path);
    assert_eq!(toks[1].lexeme, "dbus-org.freedesktop.timesync1");

    let file = parse_str(
        "check service ssh-agent with init systemd\n  if memory.rss > 10m then alert\n",
    )
    .unwrap();
    assert_eq!(
        file.checks[0].target,
        CheckTarget::Service("ssh-agent".to_string())
    );
}

#[test]
fn cycle_count_beyond_u32_is_rejected() {
    let err = parse_str("check host\n  if swap > 50 for 5000000000 cycles then alert\n")
        .unwrap_err();
    match err {
        RuleError::Parse(e) => {
            assert!(e.expected.contains("cycle count"));
            assert_eq!(e.found, "'5000000000'");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn comment_at_end_of_file_without_newline() {
    let toks = tokenize("check host # trailing comment").unwrap();
    let kinds: Vec<TokenKind> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Check, TokenKind::Host]);
}
