//! Structural rendering to HTML.
//!
//! Walks the event stream and emits one HTML fragment per block into
//! [`HtmlOutput::paras`]. Which markup categories appear is controlled by
//! [`RenderConfig`](super::RenderConfig); the tags themselves come from a
//! [`Markup`] implementation so callers can swap in their own.
//!
//! # Example
//!
//! ```
//! use versa::import::Library;
//! use versa::model::{Block, DocId, Document, Item, Metadata};
//! use versa::render::{RenderConfig, Renderer};
//! use versa::render::html::{HtmlOutput, html_actions};
//!
//! let mut library = Library::new();
//! let id = library.insert(
//!     Document::new(DocId::new("gen"), Metadata::new("eng", "web")).with_block(
//!         Block::paragraph("p")
//!             .with(Item::chapter(1))
//!             .with(Item::verse(1))
//!             .with(Item::text("In the beginning")),
//!     ),
//! );
//!
//! let mut output = HtmlOutput::default();
//! Renderer::new(&library, html_actions())
//!     .render_document(&id, &RenderConfig::default(), &mut output)
//!     .unwrap();
//!
//! assert_eq!(
//!     output.paras,
//!     vec![r#"<p class="usfm_p"><span class="chapter">1</span><span class="verses">1</span>In the beginning</p>"#]
//! );
//! ```

use std::fmt::Write;
use std::rc::Rc;

use quick_xml::escape::escape;

use crate::error::{Error, Result};
use crate::model::{Block, BlockKind, Element, EventType, SequenceKind, VerseRange, Wrapper};

use super::action::{ActionSet, Snapshot};
use super::config::RenderConfig;

/// Produces the markup for each structural category.
pub trait Markup {
    /// Wrap a rendered block. `show_style` mirrors `showParaStyles`.
    fn block(&self, block: &Block, content: &str, show_style: bool) -> String;

    /// Wrap character markup such as `nd` or `add`.
    fn char_span(&self, style: &str, content: &str) -> String;

    /// Wrap a `\w` word with its attributes.
    fn word(&self, attributes: &[(String, String)], content: &str) -> String;

    fn chapter_label(&self, number: u32) -> String;

    fn verses_label(&self, verses: VerseRange) -> String;

    /// Render a footnote or cross-reference body.
    fn note(&self, kind: SequenceKind, caller: Option<&str>, content: &str) -> String;

    /// Escape a text run.
    fn text(&self, text: &str) -> String {
        escape(text).into_owned()
    }
}

/// Default HTML markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMarkup;

impl HtmlMarkup {
    /// Map a block kind to an HTML tag name.
    fn block_tag(kind: BlockKind) -> &'static str {
        match kind {
            BlockKind::Paragraph | BlockKind::Introduction => "p",
            BlockKind::Heading => "h3",
            BlockKind::Title => "h1",
            BlockKind::Note => "span",
        }
    }
}

impl Markup for HtmlMarkup {
    fn block(&self, block: &Block, content: &str, show_style: bool) -> String {
        let tag = Self::block_tag(block.kind);
        if show_style {
            format!(
                "<{tag} class=\"usfm_{}\">{content}</{tag}>",
                escape(block.style.as_str())
            )
        } else {
            format!("<{tag}>{content}</{tag}>")
        }
    }

    fn char_span(&self, style: &str, content: &str) -> String {
        format!("<span class=\"usfm_{}\">{content}</span>", escape(style))
    }

    fn word(&self, attributes: &[(String, String)], content: &str) -> String {
        let mut attrs = String::new();
        for (key, value) in attributes {
            write!(attrs, " data-{}=\"{}\"", escape(key.as_str()), escape(value.as_str())).ok();
        }
        format!("<span class=\"usfm_w\"{attrs}>{content}</span>")
    }

    fn chapter_label(&self, number: u32) -> String {
        format!("<span class=\"chapter\">{number}</span>")
    }

    fn verses_label(&self, verses: VerseRange) -> String {
        format!("<span class=\"verses\">{verses}</span>")
    }

    fn note(&self, kind: SequenceKind, caller: Option<&str>, content: &str) -> String {
        let caller = caller
            .map(|c| format!(" data-caller=\"{}\"", escape(c)))
            .unwrap_or_default();
        format!("<span class=\"{}\"{caller}>{content}</span>", kind.as_str())
    }
}

/// Output of the structural action set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlOutput {
    /// One rendered fragment per visible block of the main text.
    pub paras: Vec<String>,
}

impl HtmlOutput {
    /// All fragments, one per line.
    pub fn html(&self) -> String {
        self.paras.join("\n")
    }
}

/// Workspace state of the structural action set: one buffer per open
/// block, wrapper or note, innermost last.
#[derive(Debug, Default)]
pub struct HtmlState {
    buffers: Vec<String>,
}

impl HtmlState {
    fn open(&mut self) {
        self.buffers.push(String::new());
    }

    fn close(&mut self, event: impl std::fmt::Display) -> Result<String> {
        self.buffers
            .pop()
            .ok_or_else(|| Error::render(event, "no open markup to close"))
    }

    fn append(&mut self, event: impl std::fmt::Display, content: &str) -> Result<()> {
        self.buffers
            .last_mut()
            .ok_or_else(|| Error::render(event, "content outside any block"))?
            .push_str(content);
        Ok(())
    }
}

type HtmlSnapshot<'a> = Snapshot<'a, HtmlOutput, HtmlState>;

/// The structural action set with the default [`HtmlMarkup`].
pub fn html_actions() -> ActionSet<HtmlOutput, HtmlState> {
    structural_actions(HtmlMarkup)
}

/// Build the structural action set around a custom [`Markup`].
pub fn structural_actions<M: Markup + 'static>(markup: M) -> ActionSet<HtmlOutput, HtmlState> {
    let markup = Rc::new(markup);
    let mut actions = ActionSet::<HtmlOutput, HtmlState>::new();

    actions.register(
        EventType::StartDocument,
        |_| true,
        |s| {
            s.workspace.chapter = None;
            s.workspace.verses = None;
            s.workspace.state = HtmlState::default();
            s.output.paras.clear();
            Ok(())
        },
        "Set up workspace and output",
    );

    let m = Rc::clone(&markup);
    actions.register(
        EventType::Mark,
        |_| true,
        move |s| {
            let event = s.context.event();
            match event.element {
                Element::Chapter(number) => {
                    s.workspace.chapter = Some(number);
                    s.workspace.verses = None;
                    if s.config.show_chapter_labels {
                        s.workspace.state.append(event, &m.chapter_label(number))?;
                    }
                }
                Element::Verses(verses) => {
                    s.workspace.verses = Some(verses);
                    if s.config.show_verses_labels {
                        s.workspace.state.append(event, &m.verses_label(verses))?;
                    }
                }
                _ => {}
            }
            Ok(())
        },
        "Update CV state and emit labels",
    );

    actions.register(
        EventType::StartParagraph,
        |_| true,
        |s| {
            s.workspace.state.open();
            Ok(())
        },
        "Open block buffer",
    );

    let m = Rc::clone(&markup);
    actions.register(
        EventType::EndParagraph,
        |_| true,
        move |s| close_block(s, m.as_ref()),
        "Close block and emit it",
    );

    let m = Rc::clone(&markup);
    actions.register(
        EventType::Text,
        |_| true,
        move |s| {
            let event = s.context.event();
            let text = m.text(event.element.text().unwrap_or_default());
            s.workspace.state.append(event, &text)
        },
        "Append escaped text",
    );

    actions.register(
        EventType::StartWrapper,
        |_| true,
        |s| {
            s.workspace.state.open();
            Ok(())
        },
        "Open wrapper buffer",
    );

    let m = Rc::clone(&markup);
    actions.register(
        EventType::EndWrapper,
        |_| true,
        move |s| {
            let event = s.context.event();
            let content = s.workspace.state.close(event)?;
            let rendered = match event.element {
                Element::Wrapper(Wrapper::Char { style }) if s.config.show_character_markup => {
                    m.char_span(style, &content)
                }
                Element::Wrapper(Wrapper::Word { attributes }) if s.config.show_word_atts => {
                    m.word(attributes, &content)
                }
                _ => content,
            };
            s.workspace.state.append(event, &rendered)
        },
        "Close wrapper and emit it",
    );

    actions.register(
        EventType::StartSequence,
        |s| is_note(s),
        |s| {
            s.workspace.state.open();
            Ok(())
        },
        "Open note buffer",
    );

    let m = Rc::clone(&markup);
    actions.register(
        EventType::EndSequence,
        |s| is_note(s),
        move |s| {
            let event = s.context.event();
            let content = s.workspace.state.close(event)?;
            let Some(sequence) = event.element.sequence() else {
                return Ok(());
            };
            if s.config
                .shows_note(sequence.kind, s.workspace.chapter, s.workspace.verses)
            {
                let note = m.note(sequence.kind, sequence.caller.as_deref(), &content);
                s.workspace.state.append(event, &note)?;
            }
            Ok(())
        },
        "Close note and emit it when selected",
    );

    actions
}

fn is_note(s: &HtmlSnapshot<'_>) -> bool {
    s.context
        .element()
        .sequence()
        .is_some_and(|sequence| sequence.kind.is_note())
}

fn block_visible(block: &Block, config: &RenderConfig) -> bool {
    match block.kind {
        BlockKind::Paragraph | BlockKind::Note => true,
        BlockKind::Heading => config.show_headings,
        BlockKind::Title => config.show_titles,
        BlockKind::Introduction => config.show_introductions,
    }
}

fn close_block(s: &mut HtmlSnapshot<'_>, markup: &dyn Markup) -> Result<()> {
    let event = s.context.event();
    let content = s.workspace.state.close(event)?;
    let Some(block) = event.element.block() else {
        return Ok(());
    };

    // Note bodies flow into the enclosing note buffer unwrapped.
    if block.kind == BlockKind::Note {
        return s.workspace.state.append(event, &content);
    }
    if !block_visible(block, s.config) {
        return Ok(());
    }

    let rendered = markup.block(block, &content, s.config.show_para_styles);
    if s.context.sequence_kind() == Some(SequenceKind::Main) {
        s.output.paras.push(rendered);
        Ok(())
    } else {
        s.workspace.state.append(event, &rendered)
    }
}
