//! Array envelope of pandoc-types before 1.17.

use serde_json::{Value, json};

use super::{Encoder, attr, tagged};
use crate::ast::{Attr, Document, Node, Table, Target};

/// Encoder for [`super::SchemaVersion::Legacy`].
pub struct Legacy;

impl Encoder for Legacy {
    fn constant(&self, tag: &str) -> Value {
        tagged(tag, json!([]))
    }

    /// The title carries pandoc's `fig:` marker for implicit figures.
    fn image(&self, image_attr: &Attr, alt: &[Node], target: &Target) -> Value {
        tagged(
            "Image",
            json!([
                attr(image_attr),
                self.nodes(alt),
                [target.url, format!("fig:{}", target.title)]
            ]),
        )
    }

    /// `[caption, alignments, widths, header, rows]`, widths all zero.
    fn table(&self, table: &Table) -> Value {
        let alignments: Vec<Value> = table
            .alignments
            .iter()
            .map(|alignment| self.constant(alignment.tag()))
            .collect();
        let widths = vec![0.0; table.column_count()];
        let rows: Vec<Value> = table.rows.iter().map(|row| self.items(row)).collect();
        tagged(
            "Table",
            json!([[], alignments, widths, self.items(&table.header), rows]),
        )
    }

    fn document(&self, document: &Document) -> Value {
        json!([{ "unMeta": {} }, self.nodes(&document.blocks)])
    }
}
