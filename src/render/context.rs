//! The per-event traversal view handed to actions.

use crate::model::{Block, BlockKind, Element, Event, EventType, Position, Sequence, SequenceKind};

/// An open sequence and, while inside one of its blocks, that block.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'d> {
    pub sequence: &'d Sequence,
    pub block: Option<&'d Block>,
}

impl<'d> Frame<'d> {
    pub fn new(sequence: &'d Sequence) -> Self {
        Self {
            sequence,
            block: None,
        }
    }
}

/// Read-only view of the event being dispatched and where it sits.
///
/// Rebuilt by the renderer for every event.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    event: &'a Event<'a>,
    frames: &'a [Frame<'a>],
}

impl<'a> Context<'a> {
    /// `frames` lists the open sequences, outermost first.
    pub fn new(event: &'a Event<'a>, frames: &'a [Frame<'a>]) -> Self {
        Self { event, frames }
    }

    pub fn event(&self) -> &'a Event<'a> {
        self.event
    }

    pub fn event_type(&self) -> EventType {
        self.event.kind
    }

    pub fn element(&self) -> Element<'a> {
        self.event.element
    }

    pub fn position(&self) -> Position {
        self.event.position
    }

    /// Open sequences, innermost first.
    pub fn sequences(&self) -> impl Iterator<Item = &'a Frame<'a>> + 'a {
        self.frames.iter().rev()
    }

    /// The innermost open sequence.
    pub fn sequence(&self) -> Option<&'a Sequence> {
        self.frames.last().map(|frame| frame.sequence)
    }

    pub fn sequence_kind(&self) -> Option<SequenceKind> {
        self.sequence().map(|sequence| sequence.kind)
    }

    /// Number of open sequences (1 in the main text, 2 inside a note).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The innermost open block, if the event is inside one.
    pub fn block(&self) -> Option<&'a Block> {
        self.frames.last().and_then(|frame| frame.block)
    }

    /// Whether the event belongs to the first block of its sequence.
    pub fn is_first_block(&self) -> bool {
        self.event.position.block == Some(0)
    }

    /// Whether the event is inside a scripture paragraph of the main text
    /// (not a heading, title, introduction or note).
    pub fn in_scripture_paragraph(&self) -> bool {
        self.sequence_kind() == Some(SequenceKind::Main)
            && self.block().map(|block| block.kind) == Some(BlockKind::Paragraph)
    }
}
