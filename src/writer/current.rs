//! Object envelope of pandoc-types 1.23.

use serde_json::{Value, json};

use super::{API_VERSION, Encoder, attr, tagged};
use crate::ast::{Attr, Cell, Document, Node, Table, Target};

/// Encoder for [`super::SchemaVersion::Current`].
pub struct Current;

impl Current {
    /// A paragraph holding nothing but an image is an implicit figure.
    /// The alt text doubles as the caption.
    ///
    /// Unlike pandoc's `implicit_figures`, which needs non-empty alt text,
    /// an image with empty alt is promoted too and gets an empty caption.
    fn figure(&self, image_attr: &Attr, alt: &[Node], target: &Target) -> Value {
        let caption = if alt.is_empty() {
            json!([])
        } else {
            json!([tagged("Plain", self.nodes(alt))])
        };
        tagged(
            "Figure",
            json!([
                attr(&Attr::default()),
                [null, caption],
                [tagged("Plain", json!([self.image(image_attr, alt, target)]))]
            ]),
        )
    }

    fn row(&self, cells: &[Cell]) -> Value {
        let cells: Vec<Value> = cells
            .iter()
            .map(|cell| {
                json!([
                    attr(&Attr::default()),
                    self.constant("AlignDefault"),
                    1,
                    1,
                    self.nodes(cell)
                ])
            })
            .collect();
        json!([attr(&Attr::default()), cells])
    }
}

impl Encoder for Current {
    fn constant(&self, tag: &str) -> Value {
        json!({ "t": tag })
    }

    fn image(&self, image_attr: &Attr, alt: &[Node], target: &Target) -> Value {
        tagged(
            "Image",
            json!([attr(image_attr), self.nodes(alt), [target.url, target.title]]),
        )
    }

    fn para(&self, content: &[Node]) -> Value {
        match content {
            [Node::Image(image_attr, alt, target)] => self.figure(image_attr, alt, target),
            _ => tagged("Para", self.nodes(content)),
        }
    }

    /// `[attr, caption, colspecs, head, bodies, foot]` with a single body.
    fn table(&self, table: &Table) -> Value {
        let empty = attr(&Attr::default());
        let colspecs: Vec<Value> = table
            .alignments
            .iter()
            .map(|alignment| {
                json!([
                    self.constant(alignment.tag()),
                    self.constant("ColWidthDefault")
                ])
            })
            .collect();
        let rows: Vec<Value> = table.rows.iter().map(|row| self.row(row)).collect();
        tagged(
            "Table",
            json!([
                empty,
                [null, []],
                colspecs,
                [empty, [self.row(&table.header)]],
                [[empty, 0, [], rows]],
                [empty, []]
            ]),
        )
    }

    fn document(&self, document: &Document) -> Value {
        json!({
            "pandoc-api-version": API_VERSION,
            "meta": {},
            "blocks": self.nodes(&document.blocks),
        })
    }
}
