//! Linear event stream derived from a document tree.
//!
//! A document is rendered by walking its tree once, depth-first, and turning
//! every node boundary into an [`Event`]. Events borrow the nodes they come
//! from; nothing is copied out of the tree.

use std::fmt;

use super::node::{Block, Item, Mark, Sequence, Wrapper};
use super::reference::VerseRange;
use super::Document;

/// The type of an event, used as the dispatch key for actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    StartDocument,
    EndDocument,
    StartSequence,
    EndSequence,
    StartParagraph,
    EndParagraph,
    StartWrapper,
    EndWrapper,
    Mark,
    Text,
}

impl EventType {
    pub const ALL: [EventType; 10] = [
        EventType::StartDocument,
        EventType::EndDocument,
        EventType::StartSequence,
        EventType::EndSequence,
        EventType::StartParagraph,
        EventType::EndParagraph,
        EventType::StartWrapper,
        EventType::EndWrapper,
        EventType::Mark,
        EventType::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::StartDocument => "startDocument",
            EventType::EndDocument => "endDocument",
            EventType::StartSequence => "startSequence",
            EventType::EndSequence => "endSequence",
            EventType::StartParagraph => "startParagraph",
            EventType::EndParagraph => "endParagraph",
            EventType::StartWrapper => "startWrapper",
            EventType::EndWrapper => "endWrapper",
            EventType::Mark => "mark",
            EventType::Text => "text",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tree node an event originates from.
#[derive(Debug, Clone, Copy)]
pub enum Element<'d> {
    Document(&'d Document),
    Sequence(&'d Sequence),
    Block(&'d Block),
    Wrapper(&'d Wrapper),
    Chapter(u32),
    Verses(VerseRange),
    Text(&'d str),
}

impl<'d> Element<'d> {
    /// The element's sub-type name: `chapter`, `verses`, `text`, a block or
    /// wrapper style, or a sequence kind.
    pub fn sub_type(&self) -> &'d str {
        match *self {
            Element::Document(_) => "document",
            Element::Sequence(sequence) => sequence.kind.as_str(),
            Element::Block(block) => &block.style,
            Element::Wrapper(wrapper) => wrapper.style(),
            Element::Chapter(_) => "chapter",
            Element::Verses(_) => "verses",
            Element::Text(_) => "text",
        }
    }

    pub fn text(&self) -> Option<&'d str> {
        match *self {
            Element::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn chapter(&self) -> Option<u32> {
        match *self {
            Element::Chapter(number) => Some(number),
            _ => None,
        }
    }

    pub fn verses(&self) -> Option<VerseRange> {
        match *self {
            Element::Verses(range) => Some(range),
            _ => None,
        }
    }

    pub fn block(&self) -> Option<&'d Block> {
        match *self {
            Element::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn sequence(&self) -> Option<&'d Sequence> {
        match *self {
            Element::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn wrapper(&self) -> Option<&'d Wrapper> {
        match *self {
            Element::Wrapper(wrapper) => Some(wrapper),
            _ => None,
        }
    }
}

/// Where an event sits inside its innermost sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Index of the enclosing block within its sequence.
    pub block: Option<usize>,
    /// Index of the item within its parent's content list.
    pub item: Option<usize>,
}

/// One step of the linear traversal.
#[derive(Debug, Clone, Copy)]
pub struct Event<'d> {
    pub kind: EventType,
    pub element: Element<'d>,
    pub position: Position,
}

impl<'d> Event<'d> {
    pub fn new(kind: EventType, element: Element<'d>, position: Position) -> Self {
        Self {
            kind,
            element,
            position,
        }
    }
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element {
            Element::Chapter(number) => write!(f, "{}(chapter={number})", self.kind),
            Element::Verses(range) => write!(f, "{}(verses={range})", self.kind),
            Element::Text(text) => write!(f, "{}({text:?})", self.kind),
            element => write!(f, "{}({})", self.kind, element.sub_type()),
        }
    }
}

pub(super) fn linearize(document: &Document) -> Vec<Event<'_>> {
    let mut events = Vec::new();
    walk_sequence(&document.main, Position::default(), &mut events);
    events
}

fn walk_sequence<'d>(sequence: &'d Sequence, position: Position, out: &mut Vec<Event<'d>>) {
    out.push(Event::new(
        EventType::StartSequence,
        Element::Sequence(sequence),
        position,
    ));

    for (index, block) in sequence.blocks.iter().enumerate() {
        let block_position = Position {
            block: Some(index),
            item: None,
        };
        out.push(Event::new(
            EventType::StartParagraph,
            Element::Block(block),
            block_position,
        ));
        walk_items(&block.content, index, out);
        out.push(Event::new(
            EventType::EndParagraph,
            Element::Block(block),
            block_position,
        ));
    }

    out.push(Event::new(
        EventType::EndSequence,
        Element::Sequence(sequence),
        position,
    ));
}

fn walk_items<'d>(items: &'d [Item], block: usize, out: &mut Vec<Event<'d>>) {
    for (index, item) in items.iter().enumerate() {
        let position = Position {
            block: Some(block),
            item: Some(index),
        };
        match item {
            Item::Mark(Mark::Chapter { number }) => {
                out.push(Event::new(EventType::Mark, Element::Chapter(*number), position));
            }
            Item::Mark(Mark::Verses { range }) => {
                out.push(Event::new(EventType::Mark, Element::Verses(*range), position));
            }
            Item::Text(text) => {
                out.push(Event::new(EventType::Text, Element::Text(text), position));
            }
            Item::Wrapper { wrapper, content } => {
                out.push(Event::new(
                    EventType::StartWrapper,
                    Element::Wrapper(wrapper),
                    position,
                ));
                walk_items(content, block, out);
                out.push(Event::new(
                    EventType::EndWrapper,
                    Element::Wrapper(wrapper),
                    position,
                ));
            }
            Item::Graft(sequence) => walk_sequence(sequence, position, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocId, Metadata, SequenceKind};

    fn kinds(document: &Document) -> Vec<EventType> {
        document.events().iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_empty_document_has_main_sequence_bounds() {
        let doc = Document::new(DocId::new("d"), Metadata::default());
        assert_eq!(
            kinds(&doc),
            vec![EventType::StartSequence, EventType::EndSequence]
        );
    }

    #[test]
    fn test_linearize_paragraph_in_order() {
        let doc = Document::new(DocId::new("d"), Metadata::default()).with_block(
            Block::paragraph("p")
                .with(Item::chapter(2))
                .with(Item::verse(3))
                .with(Item::text("In")),
        );
        let events = doc.events();

        assert_eq!(
            events.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![
                EventType::StartSequence,
                EventType::StartParagraph,
                EventType::Mark,
                EventType::Mark,
                EventType::Text,
                EventType::EndParagraph,
                EventType::EndSequence,
            ]
        );
        assert_eq!(events[2].element.chapter(), Some(2));
        assert_eq!(events[3].element.verses(), Some(VerseRange::single(3)));
        assert_eq!(events[4].element.text(), Some("In"));
        assert_eq!(
            events[4].position,
            Position {
                block: Some(0),
                item: Some(2)
            }
        );
    }

    #[test]
    fn test_linearize_wrappers_and_grafts() {
        let note = Sequence::note(SequenceKind::Footnote, "+").with_block(
            Block::new(crate::model::BlockKind::Note, "f").with(Item::text("note")),
        );
        let doc = Document::new(DocId::new("d"), Metadata::default()).with_block(
            Block::paragraph("p")
                .with(Item::char("nd", vec![Item::text("LORD")]))
                .with(Item::graft(note)),
        );

        let sub_types: Vec<_> = doc.events().iter().map(|e| e.element.sub_type()).collect();
        assert_eq!(
            sub_types,
            vec![
                "main", "p", "nd", "text", "nd", "footnote", "f", "text", "f", "footnote", "p",
                "main"
            ]
        );
    }

    #[test]
    fn test_event_display_names_element() {
        let doc = Document::new(DocId::new("d"), Metadata::default())
            .with_block(Block::paragraph("p").with(Item::chapter(2)).with(Item::text("x")));
        let events = doc.events();
        assert_eq!(events[1].to_string(), "startParagraph(p)");
        assert_eq!(events[2].to_string(), "mark(chapter=2)");
        assert_eq!(events[3].to_string(), "text(\"x\")");
    }
}
