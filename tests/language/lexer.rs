//! Integration tests for the token reader
//!
//! Tests tokenization of Yack dialog source.

use yack_language::{TokenKind, TokenReader};

/// Significant tokens as (kind, text) pairs, trivia and `End` dropped.
fn significant(source: &str) -> Vec<(TokenKind, &str)> {
    TokenReader::tokenize_all(source)
        .into_iter()
        .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::End)
        .map(|t| (t.kind, t.text(source)))
        .collect()
}

// =============================================================================
// Statement Forms
// =============================================================================

#[test]
fn tokenize_label() {
    assert_eq!(
        significant(":start"),
        vec![(TokenKind::Colon, ":"), (TokenKind::Identifier, "start")]
    );
}

#[test]
fn tokenize_say() {
    assert_eq!(
        significant("guybrush: \"How appropriate.\" [once]"),
        vec![
            (TokenKind::Identifier, "guybrush"),
            (TokenKind::Colon, ":"),
            (TokenKind::String, "\"How appropriate.\""),
            (TokenKind::Condition, "[once]"),
        ]
    );
}

#[test]
fn tokenize_choices() {
    assert_eq!(
        significant("1 \"Grog?\" -> grog\n2: $30021 -> bye"),
        vec![
            (TokenKind::Number, "1"),
            (TokenKind::String, "\"Grog?\""),
            (TokenKind::Goto, "->"),
            (TokenKind::Identifier, "grog"),
            (TokenKind::Number, "2"),
            (TokenKind::Colon, ":"),
            (TokenKind::Dollar, "$30021"),
            (TokenKind::Goto, "->"),
            (TokenKind::Identifier, "bye"),
        ]
    );
}

#[test]
fn tokenize_numbers() {
    assert_eq!(
        significant("pause 0.5 limit -3 1."),
        vec![
            (TokenKind::Identifier, "pause"),
            (TokenKind::Number, "0.5"),
            (TokenKind::Identifier, "limit"),
            (TokenKind::Number, "-3"),
            (TokenKind::Number, "1"),
        ]
    );
}

// =============================================================================
// Code and WaitWhile
// =============================================================================

#[test]
fn code_runs_to_end_of_line() {
    assert_eq!(
        significant("!g.x = max(1, 2)\nshutup"),
        vec![
            (TokenKind::Code, "!g.x = max(1, 2)"),
            (TokenKind::Identifier, "shutup"),
        ]
    );
}

#[test]
fn code_stops_before_condition() {
    assert_eq!(
        significant("!g.seen = YES [once]"),
        vec![
            (TokenKind::Code, "!g.seen = YES "),
            (TokenKind::Condition, "[once]"),
        ]
    );
}

#[test]
fn code_split_heuristic_misfires_on_index() {
    // A subscript after a space looks like a condition.
    assert_eq!(
        significant("!x = t [1]"),
        vec![(TokenKind::Code, "!x = t "), (TokenKind::Condition, "[1]")]
    );
    // A space after the bracket keeps it in the code.
    assert_eq!(
        significant("!x = [ 1 ]"),
        vec![(TokenKind::Code, "!x = [ 1 ]")]
    );
}

#[test]
fn waitwhile_captures_code() {
    assert_eq!(
        significant("waitwhile g.busy == YES [once]"),
        vec![
            (TokenKind::WaitWhile, "waitwhile g.busy == YES "),
            (TokenKind::Condition, "[once]"),
        ]
    );
}

// =============================================================================
// Trivia and Recovery
// =============================================================================

#[test]
fn comments_and_whitespace_are_trivia() {
    let source = "# intro\r\n; more\n  \t:start";
    let kinds: Vec<_> = TokenReader::tokenize_all(source)
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Comment,
            TokenKind::NewLine,
            TokenKind::Comment,
            TokenKind::NewLine,
            TokenKind::Whitespace,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::End,
        ]
    );
}

#[test]
fn unknown_characters_become_none_tokens() {
    let tokens = TokenReader::tokenize_all("@é");
    assert_eq!(tokens[0].kind, TokenKind::None);
    assert_eq!(tokens[0].text("@é"), "@");
    assert_eq!(tokens[1].kind, TokenKind::None);
    assert_eq!(tokens[1].text("@é"), "é");
    assert_eq!(tokens[2].kind, TokenKind::End);
}

#[test]
fn tokens_reproduce_source() {
    let source = ":start\nguybrush: \"Hi\" [once]\n!g.x = 1 [g.y]\n1 \"a\" -> b # note\n";
    let rebuilt: String = TokenReader::tokenize_all(source)
        .iter()
        .map(|t| t.text(source))
        .collect();
    assert_eq!(rebuilt, source);
}

#[test]
fn line_numbers_are_one_based() {
    let source = ":start\n\nguybrush: \"Hi\"\n";
    let reader = TokenReader::new(source);
    let tokens = TokenReader::tokenize_all(source);
    let say = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Identifier && t.text(source) == "guybrush")
        .unwrap();
    assert_eq!(reader.line_of(0), 1);
    assert_eq!(reader.line_of(say.start()), 3);
    assert_eq!(reader.column_of(say.start()), 1);
    assert_eq!(reader.line_text(say.start()), "guybrush: \"Hi\"");
}
