//! Table layout in both schemas.

use pandoc_tree::{Token, TokenKind};
use serde_json::{Value, json};

use crate::helpers::*;

fn cell(open: TokenKind, close: TokenKind, content: &str, style: Option<&str>) -> Vec<Token> {
    let mut open = Token::new(open, 3);
    if let Some(style) = style {
        open = open.with_attr("style", style);
    }
    vec![open, inline(4, vec![text(content)]), Token::new(close, 3)]
}

fn table(head: &[(&str, Option<&str>)], rows: &[&[&str]]) -> Vec<Token> {
    let mut tokens = vec![
        Token::new(TokenKind::TableOpen, 0),
        Token::new(TokenKind::TheadOpen, 1),
        Token::new(TokenKind::TrOpen, 2),
    ];
    for (content, style) in head {
        tokens.extend(cell(TokenKind::ThOpen, TokenKind::ThClose, content, *style));
    }
    tokens.push(Token::new(TokenKind::TrClose, 2));
    tokens.push(Token::new(TokenKind::TheadClose, 1));
    tokens.push(Token::new(TokenKind::TbodyOpen, 1));
    for row in rows {
        tokens.push(Token::new(TokenKind::TrOpen, 2));
        for content in *row {
            tokens.extend(cell(TokenKind::TdOpen, TokenKind::TdClose, content, None));
        }
        tokens.push(Token::new(TokenKind::TrClose, 2));
    }
    tokens.push(Token::new(TokenKind::TbodyClose, 1));
    tokens.push(Token::new(TokenKind::TableClose, 0));
    tokens
}

fn legacy_table(tokens: &[Token]) -> Value {
    let value = pandoc_tree::render_value(tokens, &legacy_config()).unwrap();
    value[1][0].clone()
}

fn plain(content: &str) -> Value {
    json!([{"t": "Plain", "c": [{"t": "Str", "c": content}]}])
}

#[test]
fn legacy_three_columns() {
    let tokens = table(
        &[
            ("a", Some("text-align:right")),
            ("b", None),
            ("c", Some("text-align:center")),
        ],
        &[&["1", "2", "3"]],
    );
    similar_asserts::assert_eq!(
        legacy_table(&tokens),
        json!({"t": "Table", "c": [
            [],
            [
                {"t": "AlignRight", "c": []},
                {"t": "AlignDefault", "c": []},
                {"t": "AlignCenter", "c": []}
            ],
            [0.0, 0.0, 0.0],
            [plain("a"), plain("b"), plain("c")],
            [[plain("1"), plain("2"), plain("3")]]
        ]})
    );
}

#[test]
fn legacy_widths_are_floats() {
    let tokens = table(&[("a", None), ("b", None)], &[&["1", "2"]]);
    let text = pandoc_tree::render(&tokens, &legacy_config()).unwrap();
    assert!(text.contains(r#"[0.0,0.0]"#), "{}", text);
}

#[test]
fn current_two_by_two() {
    let tokens = table(&[("a", None), ("b", None)], &[&["1", "2"]]);
    let cell = |content: &str| json!([["", [], []], {"t": "AlignDefault"}, 1, 1, plain(content)]);
    similar_asserts::assert_eq!(
        current_blocks(&tokens),
        json!([{"t": "Table", "c": [
            ["", [], []],
            [null, []],
            [
                [{"t": "AlignDefault"}, {"t": "ColWidthDefault"}],
                [{"t": "AlignDefault"}, {"t": "ColWidthDefault"}]
            ],
            [["", [], []], [[["", [], []], [cell("a"), cell("b")]]]],
            [[["", [], []], 0, [], [[["", [], []], [cell("1"), cell("2")]]]]],
            [["", [], []], []]
        ]}])
    );
}

#[test]
fn every_row_matches_column_count() {
    let tokens = table(
        &[("a", None), ("b", None), ("c", None)],
        &[&["1", "2", "3"], &["4"], &["5", "6", "7", "8"]],
    );

    let legacy = legacy_table(&tokens);
    let columns = legacy["c"][1].as_array().unwrap().len();
    assert_eq!(columns, 3);
    assert_eq!(legacy["c"][2].as_array().unwrap().len(), columns);
    assert_eq!(legacy["c"][3].as_array().unwrap().len(), columns);
    for row in legacy["c"][4].as_array().unwrap() {
        assert_eq!(row.as_array().unwrap().len(), columns);
    }
    assert_eq!(legacy["c"][4][1][1], json!([{"t": "Plain", "c": []}]));

    let current = &current_blocks(&tokens)[0];
    assert_eq!(current["c"][2].as_array().unwrap().len(), columns);
    for row in current["c"][4][0][3].as_array().unwrap() {
        assert_eq!(row[1].as_array().unwrap().len(), columns);
    }
}

#[test]
fn current_alignment_is_carried_by_colspecs() {
    let tokens = table(&[("a", Some("text-align:left"))], &[]);
    let current = &current_blocks(&tokens)[0];
    assert_eq!(
        current["c"][2],
        json!([[{"t": "AlignLeft"}, {"t": "ColWidthDefault"}]])
    );
    assert_eq!(current["c"][3][1][0][1][0][1], json!({"t": "AlignDefault"}));
    assert_eq!(current["c"][4][0][3], json!([]));
}

#[test]
fn table_cells_hold_inline_markup() {
    let mut tokens = table(&[("h", None)], &[&["x"]]);
    let body = tokens
        .iter()
        .rposition(|t| t.kind == TokenKind::Inline)
        .unwrap();
    tokens[body] = inline(
        4,
        vec![
            Token::new(TokenKind::StrongOpen, 0),
            Token::new(TokenKind::Text, 1).with_content("bold"),
            Token::new(TokenKind::StrongClose, 0),
        ],
    );
    assert_eq!(
        legacy_table(&tokens)["c"][4][0][0],
        json!([{"t": "Plain", "c": [{"t": "Strong", "c": [{"t": "Str", "c": "bold"}]}]}])
    );
}
