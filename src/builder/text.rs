//! Text sanitizing and whitespace splitting for leaf content.

use crate::ast::Node;

fn is_stripped(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{7F}' | '\u{FFFD}'
    )
}

/// Remove unprintable control characters, then all trailing newlines.
///
/// Tab, line feed and carriage return are kept by the first step.
pub fn sanitize(text: &str) -> String {
    let mut out: String = text.chars().filter(|&c| !is_stripped(c)).collect();
    let kept = out.trim_end_matches('\n').len();
    out.truncate(kept);
    out
}

/// Split on runs of whitespace. A leading or trailing run yields an empty
/// fragment at that end, so `" a"` gives `["", "a"]`.
fn split_whitespace_runs(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(char::is_whitespace) {
        fragments.push(&rest[..start]);
        rest = rest[start..].trim_start_matches(char::is_whitespace);
    }
    fragments.push(rest);
    fragments
}

/// Append raw text to `nodes` as alternating `Str`/`Space` nodes.
///
/// The first fragment is glued onto a directly preceding `Str`, which
/// rejoins words the tokenizer split across tokens (abbreviations, for one).
pub fn push_text(nodes: &mut Vec<Node>, raw: &str) {
    let text = sanitize(raw);
    for (i, fragment) in split_whitespace_runs(&text).into_iter().enumerate() {
        if i == 0 {
            if let Some(Node::Str(previous)) = nodes.last_mut() {
                previous.push_str(fragment);
                continue;
            }
        } else {
            nodes.push(Node::Space);
        }
        if !fragment.is_empty() {
            nodes.push(Node::str(fragment));
        }
    }
}
