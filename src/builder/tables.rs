//! Table reconstruction.
//!
//! markdown-it emits tables as `thead`/`tbody` groups of `tr` rows holding
//! `th`/`td` cells, each cell wrapping an `inline` token. Column alignment
//! lives on the header cells as `style="text-align:..."`.

use super::{BuildError, Cursor, TreeBuilder};
use crate::ast::{Alignment, Cell, Node, Table};
use crate::token::TokenKind;

impl TreeBuilder {
    /// Build the table whose `table_open` was just consumed, through `table_close`.
    pub(super) fn build_table(&mut self, cursor: &mut Cursor<'_>) -> Result<Table, BuildError> {
        let mut table = Table::default();
        self.build_table_head(cursor, &mut table)?;
        self.build_table_body(cursor, &mut table)?;

        let columns = table.column_count();
        for (index, row) in table.rows.iter_mut().enumerate() {
            if row.len() != columns {
                log::debug!(
                    "Table row {} has {} cells, normalizing to {}",
                    index,
                    row.len(),
                    columns
                );
                row.resize_with(columns, empty_cell);
            }
        }
        log::debug!(
            "Reconstructed table: {} columns, {} body rows",
            columns,
            table.rows.len()
        );
        Ok(table)
    }

    fn build_table_head(
        &mut self,
        cursor: &mut Cursor<'_>,
        table: &mut Table,
    ) -> Result<(), BuildError> {
        loop {
            let position = cursor.position();
            let token = cursor.advance(TokenKind::TheadClose)?;
            match token.kind {
                TokenKind::TheadClose => return Ok(()),
                TokenKind::ThOpen => {
                    table
                        .alignments
                        .push(Alignment::from_style(token.attr("style")));
                    table.header.push(self.build_cell(cursor, TokenKind::ThClose)?);
                }
                TokenKind::TheadOpen | TokenKind::TrOpen | TokenKind::TrClose => {}
                found => {
                    return Err(BuildError::UnexpectedToken {
                        expected: TokenKind::ThOpen,
                        found,
                        position,
                    });
                }
            }
        }
    }

    /// Rows up to `table_close`. The `tbody` wrapper is optional.
    fn build_table_body(
        &mut self,
        cursor: &mut Cursor<'_>,
        table: &mut Table,
    ) -> Result<(), BuildError> {
        let mut row: Option<Vec<Cell>> = None;
        loop {
            let position = cursor.position();
            let token = cursor.advance(TokenKind::TableClose)?;
            match (token.kind, row.as_mut()) {
                (TokenKind::TableClose, None) => return Ok(()),
                (TokenKind::TbodyOpen | TokenKind::TbodyClose, None) => {}
                (TokenKind::TrOpen, None) => row = Some(Vec::new()),
                (TokenKind::TdOpen, Some(cells)) => {
                    cells.push(self.build_cell(cursor, TokenKind::TdClose)?);
                }
                (TokenKind::TrClose, Some(_)) => {
                    table.rows.extend(row.take());
                }
                (found, current) => {
                    let expected = if current.is_some() {
                        TokenKind::TdOpen
                    } else {
                        TokenKind::TrOpen
                    };
                    return Err(BuildError::UnexpectedToken {
                        expected,
                        found,
                        position,
                    });
                }
            }
        }
    }

    fn build_cell(&mut self, cursor: &mut Cursor<'_>, close: TokenKind) -> Result<Cell, BuildError> {
        Ok(vec![Node::Plain(self.build_scope(cursor, close)?)])
    }
}

fn empty_cell() -> Cell {
    vec![Node::Plain(Vec::new())]
}
