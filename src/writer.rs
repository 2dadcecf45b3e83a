//! Pandoc JSON encoders.
//!
//! The same [`Document`] is encoded for two incompatible schemas:
//!
//! - [`SchemaVersion::Legacy`]: the pre-1.18 array envelope
//!   `[{"unMeta":{}}, blocks]` where every constructor carries a `c` field.
//! - [`SchemaVersion::Current`]: the versioned object envelope
//!   `{"pandoc-api-version":[1,23],"meta":{},"blocks":[...]}` where
//!   zero-payload constructors omit `c`, block images become figures and
//!   tables use the head/body/foot layout.
//!
//! Node shapes that both schemas share live in the provided methods of
//! [`Encoder`]; each schema overrides what differs.

use std::io;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::ast::{Attr, DefinitionItem, Document, MathType, Node, NoteContent, Table, Target};

pub mod current;
pub mod legacy;

/// API version written into the current envelope.
pub const API_VERSION: [u32; 2] = [1, 23];

/// Output schema selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaVersion {
    #[default]
    Legacy,
    Current,
}

impl SchemaVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::Legacy => "legacy",
            SchemaVersion::Current => "current",
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{"t": tag, "c": content}` with `t` first.
pub(crate) fn tagged(tag: &str, content: Value) -> Value {
    json!({ "t": tag, "c": content })
}

pub(crate) fn attr(attr: &Attr) -> Value {
    let attributes: Vec<Value> = attr
        .attributes
        .iter()
        .map(|(key, value)| json!([key, value]))
        .collect();
    json!([attr.id, attr.classes, attributes])
}

/// One schema's encoding rules.
pub trait Encoder {
    /// A constructor without fields, e.g. `Space` or `AlignLeft`.
    fn constant(&self, tag: &str) -> Value;

    fn image(&self, attr: &Attr, alt: &[Node], target: &Target) -> Value;

    fn table(&self, table: &Table) -> Value;

    fn document(&self, document: &Document) -> Value;

    fn para(&self, content: &[Node]) -> Value {
        tagged("Para", self.nodes(content))
    }

    fn nodes(&self, nodes: &[Node]) -> Value {
        Value::Array(nodes.iter().map(|node| self.node(node)).collect())
    }

    fn node(&self, node: &Node) -> Value {
        match node {
            Node::Header(level, header_attr, content) => tagged(
                node.tag(),
                json!([level, attr(header_attr), self.nodes(content)]),
            ),
            Node::Para(content) => self.para(content),
            Node::Plain(content)
            | Node::BlockQuote(content)
            | Node::Emph(content)
            | Node::Strong(content)
            | Node::Strikeout(content)
            | Node::Superscript(content)
            | Node::Subscript(content) => tagged(node.tag(), self.nodes(content)),
            Node::BulletList(items) => tagged(node.tag(), self.items(items)),
            Node::OrderedList(list, items) => tagged(
                node.tag(),
                json!([
                    [list.start, self.constant("Decimal"), self.constant("Period")],
                    self.items(items)
                ]),
            ),
            Node::Table(table) => self.table(table),
            Node::DefinitionList(items) => tagged(node.tag(), self.definitions(items)),
            Node::Link(link_attr, content, target) => tagged(
                node.tag(),
                json!([
                    attr(link_attr),
                    self.nodes(content),
                    [target.url, target.title]
                ]),
            ),
            Node::Image(image_attr, alt, target) => self.image(image_attr, alt, target),
            Node::Note(note) => match &*note.content() {
                // An undefined footnote keeps its raw id as payload.
                NoteContent::Pending(id) => tagged(node.tag(), Value::String(id.clone())),
                NoteContent::Resolved(blocks) => tagged(node.tag(), self.nodes(blocks)),
            },
            Node::Math(kind, text) => {
                let kind = match kind {
                    MathType::Inline => "InlineMath",
                    MathType::Display => "DisplayMath",
                };
                tagged(node.tag(), json!([self.constant(kind), text]))
            }
            Node::Code(code_attr, text) | Node::CodeBlock(code_attr, text) => {
                tagged(node.tag(), json!([attr(code_attr), text]))
            }
            Node::RawInline(format, text) | Node::RawBlock(format, text) => {
                tagged(node.tag(), json!([format, text]))
            }
            Node::Str(text) => tagged(node.tag(), Value::String(text.clone())),
            Node::Space | Node::SoftBreak | Node::LineBreak | Node::HorizontalRule => {
                self.constant(node.tag())
            }
        }
    }

    fn items(&self, items: &[Vec<Node>]) -> Value {
        Value::Array(items.iter().map(|item| self.nodes(item)).collect())
    }

    fn definitions(&self, items: &[DefinitionItem]) -> Value {
        Value::Array(
            items
                .iter()
                .map(|item| json!([self.nodes(&item.term), self.items(&item.definitions)]))
                .collect(),
        )
    }
}

fn encoder(schema: SchemaVersion) -> &'static dyn Encoder {
    match schema {
        SchemaVersion::Legacy => &legacy::Legacy,
        SchemaVersion::Current => &current::Current,
    }
}

/// Encode a document as a JSON value.
pub fn to_value(document: &Document, schema: SchemaVersion) -> Value {
    encoder(schema).document(document)
}

pub fn to_string(
    document: &Document,
    schema: SchemaVersion,
    pretty: bool,
) -> serde_json::Result<String> {
    let value = to_value(document, schema);
    if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
}

pub fn to_writer<W: io::Write>(
    writer: W,
    document: &Document,
    schema: SchemaVersion,
    pretty: bool,
) -> serde_json::Result<()> {
    let value = to_value(document, schema);
    if pretty {
        serde_json::to_writer_pretty(writer, &value)
    } else {
        serde_json::to_writer(writer, &value)
    }
}
