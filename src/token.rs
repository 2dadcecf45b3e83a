//! The markdown-it token stream, as consumed by the tree builder.
//!
//! Tokens are deserialized from the JSON form of `md.parse(src, env)`.
//! Only the fields the builder reads are kept; `map`, `nesting`, `markup`
//! and `block` are ignored.

use serde::{Deserialize, Deserializer};

/// Token types understood by the builder.
///
/// Types added by tokenizer plugins that are not listed here deserialize
/// as [`TokenKind::Other`] and go through the plain text policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    HeadingOpen,
    HeadingClose,
    ParagraphOpen,
    ParagraphClose,
    BlockquoteOpen,
    BlockquoteClose,
    EmOpen,
    EmClose,
    StrongOpen,
    StrongClose,
    SOpen,
    SClose,
    SupOpen,
    SupClose,
    SubOpen,
    SubClose,
    BulletListOpen,
    BulletListClose,
    OrderedListOpen,
    OrderedListClose,
    ListItemOpen,
    ListItemClose,

    // Tables
    TableOpen,
    TableClose,
    TheadOpen,
    TheadClose,
    TbodyOpen,
    TbodyClose,
    TrOpen,
    TrClose,
    ThOpen,
    ThClose,
    TdOpen,
    TdClose,

    // Definition lists
    DlOpen,
    DlClose,
    DtOpen,
    DtClose,
    DdOpen,
    DdClose,

    LinkOpen,
    LinkClose,
    Image,

    // Footnotes
    FootnoteRef,
    FootnoteOpen,
    FootnoteClose,
    FootnoteBlockOpen,
    FootnoteBlockClose,
    FootnoteAnchor,

    Inline,
    InlineMath,
    DisplayMath,
    Math,
    CodeInline,
    Fence,
    CodeBlock,
    HtmlBlock,
    HtmlInline,
    Softbreak,
    Hardbreak,
    Hr,
    Text,
    AbbrOpen,
    AbbrClose,

    #[default]
    #[serde(other)]
    Other,
}

impl TokenKind {
    /// The markdown-it type string, used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::HeadingOpen => "heading_open",
            TokenKind::HeadingClose => "heading_close",
            TokenKind::ParagraphOpen => "paragraph_open",
            TokenKind::ParagraphClose => "paragraph_close",
            TokenKind::BlockquoteOpen => "blockquote_open",
            TokenKind::BlockquoteClose => "blockquote_close",
            TokenKind::EmOpen => "em_open",
            TokenKind::EmClose => "em_close",
            TokenKind::StrongOpen => "strong_open",
            TokenKind::StrongClose => "strong_close",
            TokenKind::SOpen => "s_open",
            TokenKind::SClose => "s_close",
            TokenKind::SupOpen => "sup_open",
            TokenKind::SupClose => "sup_close",
            TokenKind::SubOpen => "sub_open",
            TokenKind::SubClose => "sub_close",
            TokenKind::BulletListOpen => "bullet_list_open",
            TokenKind::BulletListClose => "bullet_list_close",
            TokenKind::OrderedListOpen => "ordered_list_open",
            TokenKind::OrderedListClose => "ordered_list_close",
            TokenKind::ListItemOpen => "list_item_open",
            TokenKind::ListItemClose => "list_item_close",
            TokenKind::TableOpen => "table_open",
            TokenKind::TableClose => "table_close",
            TokenKind::TheadOpen => "thead_open",
            TokenKind::TheadClose => "thead_close",
            TokenKind::TbodyOpen => "tbody_open",
            TokenKind::TbodyClose => "tbody_close",
            TokenKind::TrOpen => "tr_open",
            TokenKind::TrClose => "tr_close",
            TokenKind::ThOpen => "th_open",
            TokenKind::ThClose => "th_close",
            TokenKind::TdOpen => "td_open",
            TokenKind::TdClose => "td_close",
            TokenKind::DlOpen => "dl_open",
            TokenKind::DlClose => "dl_close",
            TokenKind::DtOpen => "dt_open",
            TokenKind::DtClose => "dt_close",
            TokenKind::DdOpen => "dd_open",
            TokenKind::DdClose => "dd_close",
            TokenKind::LinkOpen => "link_open",
            TokenKind::LinkClose => "link_close",
            TokenKind::Image => "image",
            TokenKind::FootnoteRef => "footnote_ref",
            TokenKind::FootnoteOpen => "footnote_open",
            TokenKind::FootnoteClose => "footnote_close",
            TokenKind::FootnoteBlockOpen => "footnote_block_open",
            TokenKind::FootnoteBlockClose => "footnote_block_close",
            TokenKind::FootnoteAnchor => "footnote_anchor",
            TokenKind::Inline => "inline",
            TokenKind::InlineMath => "inline_math",
            TokenKind::DisplayMath => "display_math",
            TokenKind::Math => "math",
            TokenKind::CodeInline => "code_inline",
            TokenKind::Fence => "fence",
            TokenKind::CodeBlock => "code_block",
            TokenKind::HtmlBlock => "html_block",
            TokenKind::HtmlInline => "html_inline",
            TokenKind::Softbreak => "softbreak",
            TokenKind::Hardbreak => "hardbreak",
            TokenKind::Hr => "hr",
            TokenKind::Text => "text",
            TokenKind::AbbrOpen => "abbr_open",
            TokenKind::AbbrClose => "abbr_close",
            TokenKind::Other => "other",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Footnote metadata carried by `footnote_ref` and `footnote_open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    pub id: String,
}

/// One token of the flat markdown-it stream.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(default)]
    pub level: usize,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tag: String,
    #[serde(default, deserialize_with = "attribute_list")]
    pub attrs: Vec<(String, String)>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub info: String,
    #[serde(default, deserialize_with = "child_tokens")]
    pub children: Vec<Token>,
    #[serde(default, deserialize_with = "footnote_meta")]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub hidden: bool,
}

impl Token {
    pub fn new(kind: TokenKind, level: usize) -> Self {
        Self {
            kind,
            level,
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_children(mut self, children: Vec<Token>) -> Self {
        self.children = children;
        self
    }

    pub fn with_meta_id(mut self, id: impl Into<String>) -> Self {
        self.meta = Some(Meta { id: id.into() });
        self
    }

    pub fn with_hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Value of the first attribute called `name`, or `""` when absent.
    pub fn attr(&self, name: &str) -> &str {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Footnote identifier from `meta.id`, if any.
    pub fn meta_id(&self) -> Option<&str> {
        self.meta.as_ref().map(|meta| meta.id.as_str())
    }
}

/// Parse a full token stream from its JSON form.
pub fn tokens_from_json(json: &str) -> serde_json::Result<Vec<Token>> {
    serde_json::from_str(json)
}

/// A JSON scalar that markdown-it or one of its plugins may store where a
/// string is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn attribute_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<(String, String)>, D::Error> {
    let attrs = Option::<Vec<(String, Scalar)>>::deserialize(deserializer)?;
    Ok(attrs
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| (name, value.into_string()))
        .collect())
}

fn child_tokens<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Token>, D::Error> {
    Ok(Option::<Vec<Token>>::deserialize(deserializer)?.unwrap_or_default())
}

fn footnote_meta<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Meta>, D::Error> {
    let meta = Option::<serde_json::Value>::deserialize(deserializer)?;
    let id = meta.as_ref().and_then(|meta| meta.get("id")).and_then(|id| match id {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    Ok(id.map(|id| Meta { id }))
}
