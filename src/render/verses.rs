//! Verse-indexed plain text.
//!
//! Collects the text of every verse into a record keyed by its
//! `chapter:verses` reference, in document order. Only scripture paragraphs
//! of the main text contribute; headings, titles, introductions and notes
//! are ignored.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Element, EventType};

use super::action::{ActionSet, Snapshot};

/// The text runs of one verse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerseRecord {
    pub cv: String,
    pub text: Vec<String>,
}

impl VerseRecord {
    pub fn new(cv: impl Into<String>) -> Self {
        Self {
            cv: cv.into(),
            text: Vec::new(),
        }
    }
}

/// Output of [`verse_actions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerseOutput {
    pub verses: Vec<VerseRecord>,
}

impl VerseOutput {
    /// One `"{cv} => {text}"` line per verse.
    pub fn lines(&self) -> Vec<String> {
        self.verses
            .iter()
            .map(|record| format!("{} => {}", record.cv, record.text.concat()))
            .collect()
    }
}

/// Build the verse-indexed text action set.
pub fn verse_actions() -> ActionSet<VerseOutput> {
    let mut actions = ActionSet::<VerseOutput>::new();
    actions.register(
        EventType::StartDocument,
        |_| true,
        |s| {
            s.workspace.chapter = None;
            s.workspace.verses = None;
            s.output.verses.clear();
            Ok(())
        },
        "Set up workspace and output",
    );
    actions.register(EventType::Mark, |_| true, update_cv, "Update CV state");
    actions.register(
        EventType::Text,
        |s| s.context.in_scripture_paragraph(),
        append_text,
        "Add text to current verse record",
    );
    actions
}

fn update_cv(s: &mut Snapshot<'_, VerseOutput>) -> Result<()> {
    let event = s.context.event();
    match event.element {
        Element::Chapter(number) => {
            s.workspace.chapter = Some(number);
            s.workspace.verses = None;
        }
        Element::Verses(range) => {
            let chapter = s
                .workspace
                .chapter
                .ok_or_else(|| Error::render(event, "verse mark before chapter context"))?;
            s.workspace.verses = Some(range);
            s.output
                .verses
                .push(VerseRecord::new(format!("{chapter}:{range}")));
        }
        _ => {}
    }
    Ok(())
}

fn append_text(s: &mut Snapshot<'_, VerseOutput>) -> Result<()> {
    let event = s.context.event();
    if s.workspace.verses.is_none() {
        return Err(Error::render(event, "text before verse context"));
    }
    let record = s
        .output
        .verses
        .last_mut()
        .ok_or_else(|| Error::render(event, "text before verse context"))?;
    record
        .text
        .push(event.element.text().unwrap_or_default().to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::Library;
    use crate::model::{Block, DocId, Document, Item, Metadata};
    use crate::render::{RenderConfig, Renderer};

    fn render(document: Document) -> (Result<()>, VerseOutput) {
        let mut library = Library::new();
        let id = library.insert(document);
        let mut output = VerseOutput::default();
        let result =
            Renderer::new(&library, verse_actions()).render_document(&id, &RenderConfig::default(), &mut output);
        (result, output)
    }

    fn doc(block: Block) -> Document {
        Document::new(DocId::new("doc"), Metadata::default()).with_block(block)
    }

    #[test]
    fn test_verse_before_chapter_fails() {
        let (result, output) = render(doc(Block::paragraph("p").with(Item::verse(1))));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("verse mark before chapter context"));
        assert!(output.verses.is_empty());
    }

    #[test]
    fn test_headings_do_not_need_verse_context() {
        let document = Document::new(DocId::new("doc"), Metadata::default())
            .with_block(Block::paragraph("p").with(Item::chapter(1)))
            .with_block(Block::new(crate::model::BlockKind::Heading, "s1").with(Item::text("Creation")))
            .with_block(Block::paragraph("p").with(Item::verse(1)).with(Item::text("In")));
        let (result, output) = render(document);

        result.unwrap();
        assert_eq!(output.lines(), vec!["1:1 => In"]);
    }

    #[test]
    fn test_verse_range_key() {
        let range = crate::model::VerseRange::new(4, 5).unwrap();
        let (result, output) = render(doc(Block::paragraph("p")
            .with(Item::chapter(3))
            .with(Item::verses(range))
            .with(Item::text("x"))));

        result.unwrap();
        assert_eq!(output.verses[0].cv, "3:4-5");
    }

    #[test]
    fn test_start_document_resets_output() {
        let mut library = Library::new();
        let id = library.insert(doc(Block::paragraph("p")
            .with(Item::chapter(1))
            .with(Item::verse(1))
            .with(Item::text("a"))));
        let renderer = Renderer::new(&library, verse_actions());

        let mut output = VerseOutput::default();
        renderer.render_document(&id, &RenderConfig::default(), &mut output).unwrap();
        renderer.render_document(&id, &RenderConfig::default(), &mut output).unwrap();

        assert_eq!(output.lines(), vec!["1:1 => a"]);
    }
}
