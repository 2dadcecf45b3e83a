//! Level-scoped tree builder.
//!
//! markdown-it hands us a flat token stream where nesting is implied by
//! `open`/`close` pairs and each token's `level`. The builder walks that
//! stream with a single cursor and rebuilds the tree by recursion: every
//! container open token starts a sub-scope that runs until the matching
//! close token at the same level.
//!
//! # Stopping rule
//!
//! A scope consumes tokens while `token.level >= min_level`, except a token
//! at exactly `min_level` whose type is the scope's close type. Matching on
//! the type as well as the level matters: sibling opens of another type at
//! the same level must not end the scope.
//!
//! `min_level` for a container is the level of the first token after its
//! open token, not `open.level + 1`. Inline footnote bodies are generated at
//! level 0 by markdown-it-footnote and only terminate correctly this way.

use crate::ast::{Attr, Document, ListAttributes, MathType, Node, Target};
use crate::config::Config;
use crate::token::{Token, TokenKind};

mod definition_lists;
pub mod footnotes;
mod tables;
pub mod text;

use footnotes::FootnoteRegistry;
use text::{push_text, sanitize};

/// Structural violations of the token stream contract.
///
/// These mean the tokenizer produced something the builder cannot nest
/// (unbalanced pairs, truncated input). Conversion stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Input ended while `expected` was still open.
    UnexpectedEnd {
        expected: TokenKind,
        position: usize,
    },
    /// A token of the wrong type where `expected` was required.
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        position: usize,
    },
    /// A `heading_open` whose tag is not `h1`..`h6`.
    InvalidHeading { tag: String, position: usize },
    /// A footnote token without `meta.id`.
    MissingFootnoteId { kind: TokenKind, position: usize },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEnd { expected, position } => {
                write!(
                    f,
                    "unexpected end of tokens at {}: expected {}",
                    position, expected
                )
            }
            Self::UnexpectedToken {
                expected,
                found,
                position,
            } => write!(
                f,
                "unexpected token {} at {}: expected {}",
                found, position, expected
            ),
            Self::InvalidHeading { tag, position } => {
                write!(f, "invalid heading tag {:?} at {}", tag, position)
            }
            Self::MissingFootnoteId { kind, position } => {
                write!(f, "{} at {} has no footnote id", kind, position)
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Position in one token sequence.
///
/// `footnote_anchor` tokens are dropped up front; they only carry the
/// back-reference arrow of rendered HTML.
pub struct Cursor<'t> {
    tokens: Vec<&'t Token>,
    position: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens: tokens
                .iter()
                .filter(|token| token.kind != TokenKind::FootnoteAnchor)
                .collect(),
            position: 0,
        }
    }

    /// Index of the next token to be consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.position).copied()
    }

    /// Consume the next token; `expected` names what the caller is waiting for.
    fn advance(&mut self, expected: TokenKind) -> Result<&'t Token, BuildError> {
        let token = self.peek().ok_or(BuildError::UnexpectedEnd {
            expected,
            position: self.position,
        })?;
        self.position += 1;
        Ok(token)
    }

    /// Consume a close token of the given kind.
    fn expect(&mut self, kind: TokenKind) -> Result<(), BuildError> {
        let position = self.position;
        let token = self.advance(kind)?;
        if token.kind != kind {
            return Err(BuildError::UnexpectedToken {
                expected: kind,
                found: token.kind,
                position,
            });
        }
        Ok(())
    }

    /// Level of the next token, the lower bound of a container's scope.
    fn scope_level(&self, close: TokenKind) -> Result<usize, BuildError> {
        self.peek()
            .map(|token| token.level)
            .ok_or(BuildError::UnexpectedEnd {
                expected: close,
                position: self.position,
            })
    }

    fn in_scope(&self, min_level: usize, stop: Option<TokenKind>) -> bool {
        match self.peek() {
            Some(token) => {
                token.level >= min_level
                    && !(token.level == min_level && Some(token.kind) == stop)
            }
            None => false,
        }
    }
}

/// Converts token sequences into nodes for one conversion pass.
pub struct TreeBuilder {
    breaks: bool,
    footnotes: FootnoteRegistry,
}

impl TreeBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            breaks: config.breaks,
            footnotes: FootnoteRegistry::new(),
        }
    }

    pub fn footnotes(&self) -> &FootnoteRegistry {
        &self.footnotes
    }

    /// Build a whole top-level token sequence.
    pub fn build_document(&mut self, tokens: &[Token]) -> Result<Document, BuildError> {
        let blocks = self.build_sequence(tokens)?;
        for id in self.footnotes.unresolved() {
            log::debug!("Footnote {:?} was referenced but never defined", id);
        }
        Ok(Document { blocks })
    }

    /// Build an independent sequence, such as the children of an `inline` token.
    pub fn build_sequence(&mut self, tokens: &[Token]) -> Result<Vec<Node>, BuildError> {
        // Level 0 with no stop type takes every token.
        let mut cursor = Cursor::new(tokens);
        self.build_level(&mut cursor, 0, None)
    }

    /// Consume tokens while they belong to the scope `(min_level, stop)`.
    ///
    /// Returns with the cursor on the stop token (or at the end of input);
    /// the caller consumes the close token itself.
    pub fn build_level(
        &mut self,
        cursor: &mut Cursor<'_>,
        min_level: usize,
        stop: Option<TokenKind>,
    ) -> Result<Vec<Node>, BuildError> {
        let mut nodes = Vec::new();
        while cursor.in_scope(min_level, stop) {
            let position = cursor.position();
            let token = cursor.advance(TokenKind::Other)?;
            log::trace!("token {} {} (level {})", position, token.kind, token.level);
            if let Some(node) = self.build_token(cursor, token, position, &mut nodes)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    /// Build the content of a container and consume its close token.
    fn build_scope(
        &mut self,
        cursor: &mut Cursor<'_>,
        close: TokenKind,
    ) -> Result<Vec<Node>, BuildError> {
        let level = cursor.scope_level(close)?;
        let nodes = self.build_level(cursor, level, Some(close))?;
        cursor.expect(close)?;
        Ok(nodes)
    }

    fn build_list_items(
        &mut self,
        cursor: &mut Cursor<'_>,
        close: TokenKind,
    ) -> Result<Vec<Vec<Node>>, BuildError> {
        let level = cursor.scope_level(close)?;
        let mut items = Vec::new();
        while cursor.in_scope(level, Some(close)) {
            let position = cursor.position();
            let token = cursor.advance(close)?;
            if token.kind != TokenKind::ListItemOpen {
                return Err(BuildError::UnexpectedToken {
                    expected: TokenKind::ListItemOpen,
                    found: token.kind,
                    position,
                });
            }
            items.push(self.build_scope(cursor, TokenKind::ListItemClose)?);
        }
        cursor.expect(close)?;
        Ok(items)
    }

    /// Dispatch one consumed token. Nodes that splice into the current
    /// sequence (text, breaks, `inline` children) are pushed onto `nodes`
    /// directly; a single produced node is returned.
    fn build_token(
        &mut self,
        cursor: &mut Cursor<'_>,
        token: &Token,
        position: usize,
        nodes: &mut Vec<Node>,
    ) -> Result<Option<Node>, BuildError> {
        let node = match token.kind {
            TokenKind::HeadingOpen => {
                let level = heading_level(token, position)?;
                let content = self.build_scope(cursor, TokenKind::HeadingClose)?;
                Node::Header(level, heading_attr(token), content)
            }
            TokenKind::ParagraphOpen => {
                let content = self.build_scope(cursor, TokenKind::ParagraphClose)?;
                if token.hidden {
                    Node::Plain(content)
                } else {
                    Node::Para(content)
                }
            }
            TokenKind::BlockquoteOpen => {
                Node::BlockQuote(self.build_scope(cursor, TokenKind::BlockquoteClose)?)
            }
            TokenKind::EmOpen => Node::Emph(self.build_scope(cursor, TokenKind::EmClose)?),
            TokenKind::StrongOpen => {
                Node::Strong(self.build_scope(cursor, TokenKind::StrongClose)?)
            }
            TokenKind::SOpen => Node::Strikeout(self.build_scope(cursor, TokenKind::SClose)?),
            TokenKind::SupOpen => {
                Node::Superscript(self.build_scope(cursor, TokenKind::SupClose)?)
            }
            TokenKind::SubOpen => Node::Subscript(self.build_scope(cursor, TokenKind::SubClose)?),
            TokenKind::BulletListOpen => {
                Node::BulletList(self.build_list_items(cursor, TokenKind::BulletListClose)?)
            }
            TokenKind::OrderedListOpen => {
                let start = token.attr("start").trim().parse().unwrap_or(1);
                let items = self.build_list_items(cursor, TokenKind::OrderedListClose)?;
                Node::OrderedList(ListAttributes { start }, items)
            }
            TokenKind::ListItemOpen => {
                return Err(BuildError::UnexpectedToken {
                    expected: TokenKind::BulletListOpen,
                    found: token.kind,
                    position,
                });
            }
            TokenKind::TableOpen => Node::Table(self.build_table(cursor)?),
            TokenKind::DlOpen => Node::DefinitionList(self.build_definition_list(cursor)?),
            TokenKind::LinkOpen => {
                let content = self.build_scope(cursor, TokenKind::LinkClose)?;
                let target = Target {
                    url: token.attr("href").to_string(),
                    title: token.attr("title").to_string(),
                };
                Node::Link(Attr::default(), content, target)
            }
            TokenKind::Image => {
                let src = token.attr("src");
                if src.is_empty() {
                    log::debug!("Dropping image without src at {}", position);
                    return Ok(None);
                }
                let alt = self.build_sequence(&token.children)?;
                let target = Target {
                    url: src.to_string(),
                    title: token.attr("title").to_string(),
                };
                Node::Image(Attr::default(), alt, target)
            }
            TokenKind::FootnoteRef => {
                let id = footnote_id(token, position)?;
                Node::Note(self.footnotes.register(id))
            }
            TokenKind::FootnoteOpen => {
                let id = footnote_id(token, position)?;
                let body = self.build_scope(cursor, TokenKind::FootnoteClose)?;
                self.footnotes.resolve(id, body);
                return Ok(None);
            }
            TokenKind::Inline => {
                let children = self.build_sequence(&token.children)?;
                nodes.extend(children);
                return Ok(None);
            }
            TokenKind::InlineMath => Node::Math(MathType::Inline, sanitize(&token.content)),
            TokenKind::DisplayMath | TokenKind::Math => {
                Node::Math(MathType::Display, sanitize(&token.content))
            }
            TokenKind::CodeInline => Node::Code(Attr::default(), sanitize(&token.content)),
            TokenKind::Fence | TokenKind::CodeBlock => {
                let info = token.info.trim();
                let attr = if info.is_empty() {
                    Attr::default()
                } else {
                    Attr::with_class(info)
                };
                Node::CodeBlock(attr, sanitize(&token.content))
            }
            TokenKind::HtmlBlock => Node::RawBlock("html".to_string(), sanitize(&token.content)),
            TokenKind::HtmlInline => {
                Node::RawInline("html".to_string(), sanitize(&token.content))
            }
            TokenKind::Softbreak => {
                if self.breaks {
                    Node::LineBreak
                } else {
                    Node::SoftBreak
                }
            }
            TokenKind::Hardbreak => Node::LineBreak,
            TokenKind::Hr => Node::HorizontalRule,
            _ => {
                if !token.content.is_empty() {
                    push_text(nodes, &token.content);
                }
                return Ok(None);
            }
        };
        Ok(Some(node))
    }
}

fn heading_level(token: &Token, position: usize) -> Result<u8, BuildError> {
    token
        .tag
        .strip_prefix('h')
        .and_then(|digits| digits.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
        .ok_or_else(|| BuildError::InvalidHeading {
            tag: token.tag.clone(),
            position,
        })
}

fn heading_attr(token: &Token) -> Attr {
    Attr {
        id: token.attr("id").to_string(),
        classes: token
            .attr("class")
            .split_whitespace()
            .map(str::to_string)
            .collect(),
        attributes: Vec::new(),
    }
}

fn footnote_id(token: &Token, position: usize) -> Result<&str, BuildError> {
    token.meta_id().ok_or(BuildError::MissingFootnoteId {
        kind: token.kind,
        position,
    })
}

/// Convert a complete token stream into a document.
pub fn build(tokens: &[Token], config: &Config) -> Result<Document, BuildError> {
    TreeBuilder::new(config).build_document(tokens)
}
