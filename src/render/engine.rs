//! The render driver.

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::import::DocumentProvider;
use crate::model::{DocId, Element, Event, EventType, Position};

use super::action::{ActionSet, Snapshot, Workspace};
use super::config::RenderConfig;
use super::context::{Context, Frame};

/// Renders documents from a provider with a fixed action set.
///
/// A renderer is reusable: every [`render_document`](Self::render_document)
/// call runs a fresh session with its own [`Workspace`].
pub struct Renderer<'p, P: ?Sized, O, S = ()> {
    provider: &'p P,
    actions: ActionSet<O, S>,
}

impl<'p, P, O, S> Renderer<'p, P, O, S>
where
    P: DocumentProvider + ?Sized,
    S: Default,
{
    pub fn new(provider: &'p P, actions: ActionSet<O, S>) -> Self {
        Self { provider, actions }
    }

    pub fn actions(&self) -> &ActionSet<O, S> {
        &self.actions
    }

    /// Render one document into `output`.
    ///
    /// Dispatches a synthetic `StartDocument` event, every tree event in
    /// document order, then a synthetic `EndDocument` event. The first
    /// failing effect aborts the session and its error is returned.
    pub fn render_document(&self, doc_id: &DocId, config: &RenderConfig, output: &mut O) -> Result<()> {
        let document = self
            .provider
            .document(doc_id)
            .ok_or_else(|| Error::DocumentNotFound(doc_id.clone()))?;
        let events = document.events();
        debug!("render {doc_id}: {} events", events.len());

        let mut session = Session {
            actions: &self.actions,
            config,
            workspace: Workspace::default(),
            output,
            frames: Vec::new(),
        };

        let element = Element::Document(document);
        session.dispatch(&Event::new(EventType::StartDocument, element, Position::default()))?;
        for event in &events {
            session.step(event)?;
        }
        session.dispatch(&Event::new(EventType::EndDocument, element, Position::default()))?;

        debug!("render {doc_id}: done");
        Ok(())
    }
}

/// State of one render pass.
struct Session<'r, 'd, O, S> {
    actions: &'r ActionSet<O, S>,
    config: &'r RenderConfig,
    workspace: Workspace<S>,
    output: &'r mut O,
    frames: Vec<Frame<'d>>,
}

impl<'d, O, S> Session<'_, 'd, O, S> {
    /// Track open sequences/blocks around dispatching a tree event.
    fn step(&mut self, event: &Event<'d>) -> Result<()> {
        match event.kind {
            EventType::StartSequence => {
                if let Some(sequence) = event.element.sequence() {
                    self.frames.push(Frame::new(sequence));
                }
            }
            EventType::StartParagraph => {
                if let (Some(frame), Some(block)) = (self.frames.last_mut(), event.element.block()) {
                    frame.block = Some(block);
                }
            }
            _ => {}
        }

        self.dispatch(event)?;

        match event.kind {
            EventType::EndParagraph => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.block = None;
                }
            }
            EventType::EndSequence => {
                self.frames.pop();
            }
            _ => {}
        }
        Ok(())
    }

    fn dispatch(&mut self, event: &Event<'_>) -> Result<()> {
        let actions = self.actions.actions_for(event.kind);
        if actions.is_empty() {
            return Ok(());
        }

        let context = Context::new(event, &self.frames);
        for action in actions {
            let mut snapshot = Snapshot {
                context: &context,
                workspace: &mut self.workspace,
                output: &mut *self.output,
                config: self.config,
            };
            if action.test(&snapshot) {
                trace!("{event}: {}", action.description());
                action.apply(&mut snapshot)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::Library;
    use crate::model::{Block, Document, Item, Metadata, SequenceKind};
    use crate::render::Action;

    fn library_with(document: Document) -> Library {
        let mut library = Library::new();
        library.insert(document);
        library
    }

    fn sample() -> Document {
        Document::new(DocId::new("doc"), Metadata::new("eng", "test")).with_block(
            Block::paragraph("p")
                .with(Item::chapter(1))
                .with(Item::verse(1))
                .with(Item::text("a")),
        )
    }

    #[test]
    fn test_unknown_document_is_not_found() {
        let library = Library::new();
        let renderer = Renderer::new(&library, ActionSet::<Vec<String>>::new());
        let mut output = Vec::new();

        let err = renderer
            .render_document(&DocId::new("missing"), &RenderConfig::default(), &mut output)
            .unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(id) if id.as_str() == "missing"));
    }

    #[test]
    fn test_events_dispatched_in_document_order() {
        let library = library_with(sample());
        let mut actions: ActionSet<Vec<String>> = ActionSet::new();
        for event_type in EventType::ALL {
            actions.add(
                event_type,
                Action::always("record", |s: &mut Snapshot<'_, Vec<String>>| {
                    s.output.push(s.context.event().to_string());
                    Ok(())
                }),
            );
        }

        let mut output = Vec::new();
        Renderer::new(&library, actions)
            .render_document(&DocId::new("doc"), &RenderConfig::default(), &mut output)
            .unwrap();

        assert_eq!(
            output,
            vec![
                "startDocument(document)",
                "startSequence(main)",
                "startParagraph(p)",
                "mark(chapter=1)",
                "mark(verses=1)",
                "text(\"a\")",
                "endParagraph(p)",
                "endSequence(main)",
                "endDocument(document)",
            ]
        );
    }

    #[test]
    fn test_all_matching_actions_run() {
        let library = library_with(sample());
        let mut actions: ActionSet<Vec<&'static str>> = ActionSet::new();
        for (name, matches) in [("one", true), ("skip", false), ("two", true)] {
            actions.register(
                EventType::Text,
                move |_| matches,
                move |s| {
                    s.output.push(name);
                    Ok(())
                },
                name,
            );
        }

        let mut output = Vec::new();
        Renderer::new(&library, actions)
            .render_document(&DocId::new("doc"), &RenderConfig::default(), &mut output)
            .unwrap();

        assert_eq!(output, vec!["one", "two"]);
    }

    #[test]
    fn test_effect_error_aborts_session() {
        let library = library_with(sample());
        let mut actions = ActionSet::<Vec<String>>::new();
        actions.register(
            EventType::Mark,
            |_| true,
            |s| Err(Error::render(s.context.event(), "boom")),
            "fail",
        );
        actions.register(
            EventType::EndDocument,
            |_| true,
            |s| {
                s.output.push("end".to_string());
                Ok(())
            },
            "finish",
        );

        let mut output = Vec::new();
        let err = Renderer::new(&library, actions)
            .render_document(&DocId::new("doc"), &RenderConfig::default(), &mut output)
            .unwrap_err();

        assert_eq!(err.to_string(), "render error at mark(chapter=1): boom");
        assert!(output.is_empty());
    }

    #[test]
    fn test_context_tracks_sequences_and_blocks() {
        let note = crate::model::Sequence::note(SequenceKind::Footnote, "+")
            .with_block(Block::new(crate::model::BlockKind::Note, "f").with(Item::text("n")));
        let doc = Document::new(DocId::new("doc"), Metadata::default()).with_block(
            Block::paragraph("p")
                .with(Item::text("t"))
                .with(Item::graft(note)),
        );
        let library = library_with(doc);

        let mut actions = ActionSet::<Vec<String>>::new();
        actions.register(
            EventType::Text,
            |_| true,
            |s| {
                let ctx = s.context;
                s.output.push(format!(
                    "{}:{}:{}:{}",
                    ctx.depth(),
                    ctx.sequence_kind().map(SequenceKind::as_str).unwrap_or("-"),
                    ctx.block().map(|b| b.style.as_str()).unwrap_or("-"),
                    ctx.in_scripture_paragraph()
                ));
                Ok(())
            },
            "where",
        );

        let mut output = Vec::new();
        Renderer::new(&library, actions)
            .render_document(&DocId::new("doc"), &RenderConfig::default(), &mut output)
            .unwrap();

        assert_eq!(output, vec!["1:main:p:true", "2:footnote:f:false"]);
    }

    #[test]
    fn test_each_render_gets_fresh_workspace() {
        let library = library_with(sample());
        let actions = ActionSet::<Vec<Option<u32>>>::new()
            .on(
                EventType::StartDocument,
                Action::always("seen", |s: &mut Snapshot<'_, Vec<Option<u32>>>| {
                    s.output.push(s.workspace.chapter);
                    Ok(())
                }),
            )
            .on(
                EventType::Mark,
                Action::always("chapter", |s: &mut Snapshot<'_, Vec<Option<u32>>>| {
                    if let Some(n) = s.context.element().chapter() {
                        s.workspace.chapter = Some(n);
                    }
                    Ok(())
                }),
            );
        let renderer = Renderer::new(&library, actions);

        let mut output = Vec::new();
        renderer
            .render_document(&DocId::new("doc"), &RenderConfig::default(), &mut output)
            .unwrap();
        renderer
            .render_document(&DocId::new("doc"), &RenderConfig::default(), &mut output)
            .unwrap();

        assert_eq!(output, vec![None, None]);
    }
}
