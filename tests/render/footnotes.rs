//! Footnote back-patching across both schemas.

use pandoc_tree::ast::{Node, NoteContent};
use pandoc_tree::{Token, TokenKind};
use serde_json::json;

use crate::helpers::*;

fn reference(id: u32) -> Token {
    Token::new(TokenKind::FootnoteRef, 0).with_meta_id(id.to_string())
}

/// A `footnote_block` with one reference-style definition per id.
fn definitions(bodies: &[(u32, &str)]) -> Vec<Token> {
    definitions_with(
        bodies
            .iter()
            .map(|(id, body)| (*id, vec![text(body)]))
            .collect(),
    )
}

fn notes(nodes: &[Node]) -> Vec<&pandoc_tree::ast::Note> {
    nodes
        .iter()
        .filter_map(|node| match node {
            Node::Note(note) => Some(note),
            _ => None,
        })
        .collect()
}

#[test]
fn reference_is_replaced_by_definition() {
    let mut tokens = paragraph(0, vec![text("Abc."), reference(0)]);
    tokens.extend(definitions(&[(0, "xyz.")]));
    insta::assert_snapshot!(
        render_legacy(&tokens),
        @r#"[{"unMeta":{}},[{"t":"Para","c":[{"t":"Str","c":"Abc."},{"t":"Note","c":[{"t":"Para","c":[{"t":"Str","c":"xyz."}]}]}]}]]"#
    );
}

#[test]
fn inline_footnote() {
    let mut tokens = paragraph(0, vec![text("Abc."), reference(0)]);
    tokens.extend([
        Token::new(TokenKind::FootnoteBlockOpen, 0),
        Token::new(TokenKind::FootnoteOpen, 0).with_meta_id("0"),
        Token::new(TokenKind::ParagraphOpen, 0),
        inline(0, vec![text("xyz")]),
        Token::new(TokenKind::FootnoteAnchor, 0).with_meta_id("0"),
        Token::new(TokenKind::ParagraphClose, 0),
        Token::new(TokenKind::FootnoteClose, 0),
        Token::new(TokenKind::FootnoteBlockClose, 0),
    ]);
    assert_eq!(
        render_legacy(&tokens),
        r#"[{"unMeta":{}},[{"t":"Para","c":[{"t":"Str","c":"Abc."},{"t":"Note","c":[{"t":"Para","c":[{"t":"Str","c":"xyz"}]}]}]}]]"#
    );
}

#[test]
fn repeated_references_share_one_note() {
    let mut tokens = paragraph(
        0,
        vec![text("a"), reference(0), text(" b"), reference(0)],
    );
    tokens.extend(definitions(&[(0, "shared")]));

    let document = pandoc_tree::convert(&tokens, &legacy_config()).unwrap();
    let Node::Para(content) = &document.blocks[0] else {
        panic!("expected a paragraph, got {:?}", document.blocks[0]);
    };
    let found = notes(content);
    assert_eq!(found.len(), 2);
    assert!(found[0].same_note(found[1]));
    assert_eq!(
        *found[0].content(),
        NoteContent::Resolved(vec![Node::Para(vec![Node::str("shared")])])
    );

    let blocks = current_blocks(&tokens);
    assert_eq!(blocks[0]["c"][1], blocks[0]["c"][4]);
    assert_eq!(
        blocks[0]["c"][1],
        json!({"t": "Note", "c": [{"t": "Para", "c": [{"t": "Str", "c": "shared"}]}]})
    );
}

#[test]
fn definitions_resolve_by_id_not_order() {
    let mut tokens = paragraph(0, vec![text("x"), reference(0), reference(1)]);
    tokens.extend(definitions(&[(1, "second"), (0, "first")]));
    let blocks = current_blocks(&tokens);
    assert_eq!(blocks[0]["c"][1]["c"][0]["c"][0]["c"], "first");
    assert_eq!(blocks[0]["c"][2]["c"][0]["c"][0]["c"], "second");
}

#[test]
fn unresolved_reference_keeps_raw_id() {
    let tokens = paragraph(0, vec![text("x"), reference(7)]);
    assert_eq!(
        render_legacy(&tokens),
        r#"[{"unMeta":{}},[{"t":"Para","c":[{"t":"Str","c":"x"},{"t":"Note","c":"7"}]}]]"#
    );
    assert_eq!(
        current_blocks(&tokens)[0]["c"][1],
        json!({"t": "Note", "c": "7"})
    );
}

#[test]
fn first_definition_wins() {
    let mut tokens = paragraph(0, vec![reference(0)]);
    tokens.extend(definitions(&[(0, "first"), (0, "again")]));
    let blocks = current_blocks(&tokens);
    assert_eq!(blocks[0]["c"][0]["c"][0]["c"][0]["c"], "first");
}

#[test]
fn footnote_body_with_several_blocks() {
    let mut tokens = paragraph(0, vec![reference(0)]);
    tokens.push(Token::new(TokenKind::FootnoteBlockOpen, 0));
    tokens.push(Token::new(TokenKind::FootnoteOpen, 0).with_meta_id("0"));
    tokens.extend(paragraph(1, vec![text("one")]));
    tokens.push(Token::new(TokenKind::CodeBlock, 1).with_content("two\n"));
    tokens.push(Token::new(TokenKind::FootnoteClose, 0));
    tokens.push(Token::new(TokenKind::FootnoteBlockClose, 0));
    similar_asserts::assert_eq!(
        current_blocks(&tokens),
        json!([{"t": "Para", "c": [{"t": "Note", "c": [
            {"t": "Para", "c": [{"t": "Str", "c": "one"}]},
            {"t": "CodeBlock", "c": [["", [], []], "two"]}
        ]}]}])
    );
}

/// A `footnote_block` whose bodies are given as inline children.
fn definitions_with(bodies: Vec<(u32, Vec<Token>)>) -> Vec<Token> {
    let mut tokens = vec![Token::new(TokenKind::FootnoteBlockOpen, 0)];
    for (id, children) in bodies {
        tokens.push(Token::new(TokenKind::FootnoteOpen, 0).with_meta_id(id.to_string()));
        tokens.extend(paragraph(1, children));
        tokens.push(Token::new(TokenKind::FootnoteAnchor, 0).with_meta_id(id.to_string()));
        tokens.push(Token::new(TokenKind::FootnoteClose, 0));
    }
    tokens.push(Token::new(TokenKind::FootnoteBlockClose, 0));
    tokens
}

#[test]
fn footnote_body_references_a_later_footnote() {
    let mut tokens = paragraph(0, vec![text("Abc."), reference(0)]);
    tokens.extend(definitions_with(vec![
        (0, vec![text("see "), reference(1)]),
        (1, vec![text("inner")]),
    ]));
    similar_asserts::assert_eq!(
        current_blocks(&tokens),
        json!([{"t": "Para", "c": [
            {"t": "Str", "c": "Abc."},
            {"t": "Note", "c": [{"t": "Para", "c": [
                {"t": "Str", "c": "see"},
                {"t": "Space"},
                {"t": "Note", "c": [{"t": "Para", "c": [{"t": "Str", "c": "inner"}]}]}
            ]}]}
        ]}])
    );
}

#[test]
fn self_referencing_footnote_keeps_inner_id() {
    let mut tokens = paragraph(0, vec![text("Abc."), reference(0)]);
    tokens.extend(definitions_with(vec![(0, vec![text("see "), reference(0)])]));

    assert_eq!(
        render_legacy(&tokens),
        r#"[{"unMeta":{}},[{"t":"Para","c":[{"t":"Str","c":"Abc."},{"t":"Note","c":[{"t":"Para","c":[{"t":"Str","c":"see"},{"t":"Space","c":[]},{"t":"Note","c":"0"}]}]}]}]]"#
    );
    similar_asserts::assert_eq!(
        current_blocks(&tokens)[0]["c"][1],
        json!({"t": "Note", "c": [{"t": "Para", "c": [
            {"t": "Str", "c": "see"},
            {"t": "Space"},
            {"t": "Note", "c": "0"}
        ]}]})
    );

    let tree = format!("{:?}", pandoc_tree::convert(&tokens, &legacy_config()).unwrap());
    assert!(tree.contains("Pending(\"0\")"), "{}", tree);
}

#[test]
fn mutually_referencing_footnotes_terminate() {
    let mut tokens = paragraph(0, vec![text("Abc."), reference(0)]);
    tokens.extend(definitions_with(vec![
        (0, vec![text("one "), reference(1)]),
        (1, vec![text("two "), reference(0)]),
    ]));

    let inner = json!({"t": "Note", "c": [{"t": "Para", "c": [
        {"t": "Str", "c": "two"},
        {"t": "Space"},
        {"t": "Note", "c": "0"}
    ]}]});
    similar_asserts::assert_eq!(
        current_blocks(&tokens)[0]["c"][1],
        json!({"t": "Note", "c": [{"t": "Para", "c": [
            {"t": "Str", "c": "one"},
            {"t": "Space"},
            inner
        ]}]})
    );
    assert!(
        render_legacy(&tokens).contains(
            r#"{"t":"Str","c":"two"},{"t":"Space","c":[]},{"t":"Note","c":"0"}"#
        )
    );

    let document = pandoc_tree::convert(&tokens, &legacy_config()).unwrap();
    assert_eq!(document.clone(), document);
}
