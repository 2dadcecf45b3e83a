//! Current object schema (pandoc-api-version 1.23).

use pandoc_tree::{Token, TokenKind};
use serde_json::json;

use crate::helpers::*;

#[test]
fn envelope_shape() {
    let value = render_current(&heading("h1", "", vec![text("abc")]));
    assert_eq!(value["pandoc-api-version"], json!([1, 23]));
    assert_eq!(value["meta"], json!({}));
    similar_asserts::assert_eq!(
        value["blocks"],
        json!([{"t": "Header", "c": [1, ["", [], []], [{"t": "Str", "c": "abc"}]]}])
    );
}

#[test]
fn envelope_key_order() {
    let text = pandoc_tree::render(&[], &current_config()).unwrap();
    insta::assert_snapshot!(text, @r#"{"pandoc-api-version":[1,23],"meta":{},"blocks":[]}"#);
}

#[test]
fn zero_payload_constructors_omit_content() {
    let tokens = paragraph(
        0,
        vec![
            text("a b"),
            Token::new(TokenKind::Softbreak, 0),
            text("c"),
            Token::new(TokenKind::Hardbreak, 0),
        ],
    );
    let mut blocks = current_blocks(&tokens);
    blocks
        .as_array_mut()
        .unwrap()
        .push(current_blocks(&[Token::new(TokenKind::Hr, 0)])[0].clone());
    similar_asserts::assert_eq!(
        blocks,
        json!([
            {"t": "Para", "c": [
                {"t": "Str", "c": "a"},
                {"t": "Space"},
                {"t": "Str", "c": "b"},
                {"t": "SoftBreak"},
                {"t": "Str", "c": "c"},
                {"t": "LineBreak"}
            ]},
            {"t": "HorizontalRule"}
        ])
    );
}

#[test]
fn list_number_style_constants() {
    let tokens = list(
        Token::new(TokenKind::OrderedListOpen, 0).with_attr("start", "5"),
        TokenKind::OrderedListClose,
        &["a"],
    );
    similar_asserts::assert_eq!(
        current_blocks(&tokens),
        json!([{"t": "OrderedList", "c": [
            [5, {"t": "Decimal"}, {"t": "Period"}],
            [[{"t": "Plain", "c": [{"t": "Str", "c": "a"}]}]]
        ]}])
    );
}

#[test]
fn block_image_becomes_figure() {
    let image = Token::new(TokenKind::Image, 0)
        .with_attr("src", "http://123")
        .with_attr("title", "alt")
        .with_children(vec![text("abc")]);
    similar_asserts::assert_eq!(
        current_blocks(&paragraph(0, vec![image])),
        json!([{"t": "Figure", "c": [
            ["", [], []],
            [null, [{"t": "Plain", "c": [{"t": "Str", "c": "abc"}]}]],
            [{"t": "Plain", "c": [
                {"t": "Image", "c": [["", [], []], [{"t": "Str", "c": "abc"}], ["http://123", "alt"]]}
            ]}]
        ]}])
    );
}

#[test]
fn inline_image_is_not_a_figure() {
    let image = Token::new(TokenKind::Image, 0)
        .with_attr("src", "y")
        .with_children(vec![text("x")]);
    let blocks = current_blocks(&paragraph(0, vec![text("see "), image]));
    assert_eq!(blocks[0]["t"], "Para");
    assert_eq!(
        blocks[0]["c"][2],
        json!({"t": "Image", "c": [["", [], []], [{"t": "Str", "c": "x"}], ["y", ""]]})
    );
}

#[test]
fn tight_image_stays_plain() {
    let image = Token::new(TokenKind::Image, 0)
        .with_attr("src", "y")
        .with_children(vec![text("x")]);
    let mut tokens = vec![
        Token::new(TokenKind::BulletListOpen, 0),
        Token::new(TokenKind::ListItemOpen, 1),
    ];
    tokens.extend(tight_paragraph(2, vec![image]));
    tokens.push(Token::new(TokenKind::ListItemClose, 1));
    tokens.push(Token::new(TokenKind::BulletListClose, 0));
    let blocks = current_blocks(&tokens);
    assert_eq!(blocks[0]["c"][0][0]["t"], "Plain");
    assert_eq!(blocks[0]["c"][0][0]["c"][0]["t"], "Image");
}

#[test]
fn code_block_language_class() {
    let tokens = vec![
        Token::new(TokenKind::Fence, 0)
            .with_info("python")
            .with_content("print(1)\n"),
    ];
    similar_asserts::assert_eq!(
        current_blocks(&tokens),
        json!([{"t": "CodeBlock", "c": [["", ["python"], []], "print(1)"]}])
    );
}

#[test]
fn math_constants_omit_content() {
    let tokens = paragraph(0, vec![Token::new(TokenKind::InlineMath, 0).with_content("x")]);
    similar_asserts::assert_eq!(
        current_blocks(&tokens),
        json!([{"t": "Para", "c": [{"t": "Math", "c": [{"t": "InlineMath"}, "x"]}]}])
    );
}
