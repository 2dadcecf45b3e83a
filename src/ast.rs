//! In-memory Pandoc document tree produced by the builder.
//!
//! The tree is schema-agnostic: the same [`Document`] is encoded by either
//! writer in [`crate::writer`].

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

/// Identifier, classes and key/value pairs attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attr {
    pub id: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

impl Attr {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_class(class: impl Into<String>) -> Self {
        Self {
            classes: vec![class.into()],
            ..Self::default()
        }
    }
}

/// Link or image destination.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Target {
    pub url: String,
    pub title: String,
}

/// Ordered list numbering. Style and delimiter are always decimal/period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListAttributes {
    pub start: i64,
}

impl Default for ListAttributes {
    fn default() -> Self {
        Self { start: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathType {
    Inline,
    Display,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Default,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Alignment from a cell's `style` attribute (`text-align:center` etc).
    pub fn from_style(style: &str) -> Self {
        match style.trim() {
            "text-align:center" => Alignment::Center,
            "text-align:left" => Alignment::Left,
            "text-align:right" => Alignment::Right,
            _ => Alignment::Default,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Alignment::Default => "AlignDefault",
            Alignment::Left => "AlignLeft",
            Alignment::Center => "AlignCenter",
            Alignment::Right => "AlignRight",
        }
    }
}

/// A table cell: a block sequence, always a single `Plain` when built from tokens.
pub type Cell = Vec<Node>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// One entry per column, taken from the header cells.
    pub alignments: Vec<Alignment>,
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.alignments.len()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefinitionItem {
    pub term: Vec<Node>,
    /// Each definition is a block sequence.
    pub definitions: Vec<Vec<Node>>,
}

/// Payload of a footnote.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteContent {
    /// Referenced, not yet defined. Holds the raw footnote id.
    Pending(String),
    /// Body blocks of the definition.
    Resolved(Vec<Node>),
}

/// Shared, patchable footnote payload.
///
/// Every reference to the same footnote id holds a handle to the same cell,
/// so resolving the definition updates all of them at once.
#[derive(Debug, Clone)]
pub struct Note(Rc<RefCell<NoteContent>>);

impl Note {
    pub fn pending(id: impl Into<String>) -> Self {
        Note(Rc::new(RefCell::new(NoteContent::Pending(id.into()))))
    }

    pub fn content(&self) -> Ref<'_, NoteContent> {
        self.0.borrow()
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.0.borrow(), NoteContent::Resolved(_))
    }

    /// Whether both handles point at the same cell.
    pub fn same_note(&self, other: &Note) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<NoteContent>> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn from_cell(cell: Rc<RefCell<NoteContent>>) -> Self {
        Note(cell)
    }

    pub(crate) fn as_ptr(&self) -> *const RefCell<NoteContent> {
        Rc::as_ptr(&self.0)
    }

    pub(crate) fn set_content(&self, content: NoteContent) {
        *self.0.borrow_mut() = content;
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.same_note(other) || *self.0.borrow() == *other.0.borrow()
    }
}

/// One element of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Level, attributes, inline content.
    Header(u8, Attr, Vec<Node>),
    Para(Vec<Node>),
    Plain(Vec<Node>),
    BlockQuote(Vec<Node>),
    Emph(Vec<Node>),
    Strong(Vec<Node>),
    Strikeout(Vec<Node>),
    Superscript(Vec<Node>),
    Subscript(Vec<Node>),
    /// Items, each a block sequence.
    BulletList(Vec<Vec<Node>>),
    OrderedList(ListAttributes, Vec<Vec<Node>>),
    Table(Table),
    DefinitionList(Vec<DefinitionItem>),
    Link(Attr, Vec<Node>, Target),
    /// Attributes, alt text, source.
    Image(Attr, Vec<Node>, Target),
    Note(Note),
    Math(MathType, String),
    Code(Attr, String),
    CodeBlock(Attr, String),
    /// Format, raw text.
    RawInline(String, String),
    RawBlock(String, String),
    Str(String),
    Space,
    SoftBreak,
    LineBreak,
    HorizontalRule,
}

impl Node {
    /// Constructor name used as the `t` discriminator.
    pub fn tag(&self) -> &'static str {
        match self {
            Node::Header(..) => "Header",
            Node::Para(_) => "Para",
            Node::Plain(_) => "Plain",
            Node::BlockQuote(_) => "BlockQuote",
            Node::Emph(_) => "Emph",
            Node::Strong(_) => "Strong",
            Node::Strikeout(_) => "Strikeout",
            Node::Superscript(_) => "Superscript",
            Node::Subscript(_) => "Subscript",
            Node::BulletList(_) => "BulletList",
            Node::OrderedList(..) => "OrderedList",
            Node::Table(_) => "Table",
            Node::DefinitionList(_) => "DefinitionList",
            Node::Link(..) => "Link",
            Node::Image(..) => "Image",
            Node::Note(_) => "Note",
            Node::Math(..) => "Math",
            Node::Code(..) => "Code",
            Node::CodeBlock(..) => "CodeBlock",
            Node::RawInline(..) => "RawInline",
            Node::RawBlock(..) => "RawBlock",
            Node::Str(_) => "Str",
            Node::Space => "Space",
            Node::SoftBreak => "SoftBreak",
            Node::LineBreak => "LineBreak",
            Node::HorizontalRule => "HorizontalRule",
        }
    }

    pub fn str(text: impl Into<String>) -> Self {
        Node::Str(text.into())
    }

    /// Child sequences held directly by this node. Note bodies live behind
    /// their shared cell and are not included.
    pub fn child_lists(&self) -> Vec<&Vec<Node>> {
        match self {
            Node::Header(_, _, content)
            | Node::Para(content)
            | Node::Plain(content)
            | Node::BlockQuote(content)
            | Node::Emph(content)
            | Node::Strong(content)
            | Node::Strikeout(content)
            | Node::Superscript(content)
            | Node::Subscript(content)
            | Node::Link(_, content, _)
            | Node::Image(_, content, _) => vec![content],
            Node::BulletList(items) | Node::OrderedList(_, items) => items.iter().collect(),
            Node::Table(table) => table.header.iter().chain(table.rows.iter().flatten()).collect(),
            Node::DefinitionList(items) => items
                .iter()
                .flat_map(|item| std::iter::once(&item.term).chain(&item.definitions))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn child_lists_mut(&mut self) -> Vec<&mut Vec<Node>> {
        match self {
            Node::Header(_, _, content)
            | Node::Para(content)
            | Node::Plain(content)
            | Node::BlockQuote(content)
            | Node::Emph(content)
            | Node::Strong(content)
            | Node::Strikeout(content)
            | Node::Superscript(content)
            | Node::Subscript(content)
            | Node::Link(_, content, _)
            | Node::Image(_, content, _) => vec![content],
            Node::BulletList(items) | Node::OrderedList(_, items) => items.iter_mut().collect(),
            Node::Table(table) => table
                .header
                .iter_mut()
                .chain(table.rows.iter_mut().flatten())
                .collect(),
            Node::DefinitionList(items) => items
                .iter_mut()
                .flat_map(|item| std::iter::once(&mut item.term).chain(&mut item.definitions))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// The converted document. Metadata is always empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Node>,
}
