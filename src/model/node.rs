//! Document tree node types.

use super::reference::VerseRange;

/// Kind of a content sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    /// The book's running text.
    Main,
    /// A footnote (`\f`, `\fe`).
    Footnote,
    /// A cross-reference note (`\x`).
    Xref,
}

impl SequenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SequenceKind::Main => "main",
            SequenceKind::Footnote => "footnote",
            SequenceKind::Xref => "xref",
        }
    }

    /// Whether this is a note sequence grafted into a block.
    pub fn is_note(self) -> bool {
        matches!(self, SequenceKind::Footnote | SequenceKind::Xref)
    }
}

/// An ordered list of blocks.
///
/// Note sequences also carry the caller given in the source (`+`, `-`, or a
/// literal character).
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub kind: SequenceKind,
    pub caller: Option<String>,
    pub blocks: Vec<Block>,
}

impl Sequence {
    pub fn new(kind: SequenceKind) -> Self {
        Self {
            kind,
            caller: None,
            blocks: Vec::new(),
        }
    }

    /// Create a note sequence with the given caller.
    pub fn note(kind: SequenceKind, caller: impl Into<String>) -> Self {
        Self {
            kind,
            caller: Some(caller.into()),
            blocks: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }
}

/// Structural category of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Scripture paragraphs and poetry lines (`\p`, `\m`, `\q1`, ...).
    Paragraph,
    /// Section headings (`\s1`, `\ms`, `\r`, `\d`, ...).
    Heading,
    /// Book titles (`\mt1`, ...).
    Title,
    /// Introduction material (`\ip`, `\is`, `\imt`, ...).
    Introduction,
    /// The single block inside a note sequence.
    Note,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading => "heading",
            BlockKind::Title => "title",
            BlockKind::Introduction => "introduction",
            BlockKind::Note => "note",
        }
    }
}

/// A block of content: a paragraph, heading, title or note body.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    /// Source marker name (`p`, `q1`, `s1`, `mt1`, `f`, ...).
    pub style: String,
    pub content: Vec<Item>,
}

impl Block {
    pub fn new(kind: BlockKind, style: impl Into<String>) -> Self {
        Self {
            kind,
            style: style.into(),
            content: Vec::new(),
        }
    }

    /// Create a scripture paragraph block.
    pub fn paragraph(style: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, style)
    }

    /// Append an item, returning the block for chaining.
    pub fn with(mut self, item: Item) -> Self {
        self.content.push(item);
        self
    }

    pub fn push(&mut self, item: Item) {
        self.content.push(item);
    }
}

/// A structural boundary that carries no body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Chapter { number: u32 },
    Verses { range: VerseRange },
}

/// Inline markup wrapping other items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wrapper {
    /// Character markup such as `add`, `nd`, `wj`, or note parts like `ft`.
    Char { style: String },
    /// A `\w` word with its attributes (`lemma`, `strong`, ...).
    Word { attributes: Vec<(String, String)> },
}

impl Wrapper {
    pub fn style(&self) -> &str {
        match self {
            Wrapper::Char { style } => style,
            Wrapper::Word { .. } => "w",
        }
    }
}

/// An item inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Mark(Mark),
    Text(String),
    Wrapper { wrapper: Wrapper, content: Vec<Item> },
    Graft(Sequence),
}

impl Item {
    pub fn chapter(number: u32) -> Self {
        Item::Mark(Mark::Chapter { number })
    }

    pub fn verse(number: u32) -> Self {
        Item::Mark(Mark::Verses {
            range: VerseRange::single(number),
        })
    }

    pub fn verses(range: VerseRange) -> Self {
        Item::Mark(Mark::Verses { range })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Item::Text(text.into())
    }

    /// Character markup around the given content.
    pub fn char(style: impl Into<String>, content: Vec<Item>) -> Self {
        Item::Wrapper {
            wrapper: Wrapper::Char {
                style: style.into(),
            },
            content,
        }
    }

    /// A `\w` word wrapper around a single text run.
    pub fn word(text: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Item::Wrapper {
            wrapper: Wrapper::Word { attributes },
            content: vec![Item::Text(text.into())],
        }
    }

    pub fn graft(sequence: Sequence) -> Self {
        Item::Graft(sequence)
    }
}
