//! Definition list reconstruction (markdown-it-deflist).

use super::{BuildError, Cursor, TreeBuilder};
use crate::ast::DefinitionItem;
use crate::token::TokenKind;

impl TreeBuilder {
    /// Group `dt`/`dd` runs into items until `dl_close`.
    ///
    /// Every `dd` attaches to the closest preceding `dt`.
    pub(super) fn build_definition_list(
        &mut self,
        cursor: &mut Cursor<'_>,
    ) -> Result<Vec<DefinitionItem>, BuildError> {
        let mut items: Vec<DefinitionItem> = Vec::new();
        loop {
            let position = cursor.position();
            let token = cursor.advance(TokenKind::DlClose)?;
            match token.kind {
                TokenKind::DlClose => break,
                TokenKind::DtOpen => {
                    let term = self.build_scope(cursor, TokenKind::DtClose)?;
                    items.push(DefinitionItem {
                        term,
                        definitions: Vec::new(),
                    });
                }
                TokenKind::DdOpen => {
                    let definition = self.build_scope(cursor, TokenKind::DdClose)?;
                    let Some(item) = items.last_mut() else {
                        return Err(BuildError::UnexpectedToken {
                            expected: TokenKind::DtOpen,
                            found: token.kind,
                            position,
                        });
                    };
                    item.definitions.push(definition);
                }
                found => {
                    return Err(BuildError::UnexpectedToken {
                        expected: TokenKind::DtOpen,
                        found,
                        position,
                    });
                }
            }
        }
        log::debug!("Reconstructed definition list with {} terms", items.len());
        Ok(items)
    }
}
