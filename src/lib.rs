//! # versa
//!
//! Event-driven rendering of scripture documents.
//!
//! A document is imported once (USFM today) into an in-memory tree, then
//! rendered any number of times by walking its event stream and running
//! pluggable actions against it.
//!
//! ## Features
//!
//! - Import USFM into a typed document tree
//! - Register actions per event type, run in registration order
//! - Built-in HTML and verse-indexed action sets
//! - A small query language for headers, verse text and blocks
//!
//! ## Quick Start
//!
//! ```
//! use versa::{DocumentProvider, Library, Metadata, RenderConfig, Renderer};
//! use versa::render::html::{HtmlOutput, html_actions};
//!
//! let mut library = Library::new();
//! let id = library
//!     .import_document(Metadata::new("eng", "web"), "usfm", "\\id GEN\n\\c 1\n\\p\n\\v 1 In the beginning")
//!     .unwrap();
//!
//! let renderer = Renderer::new(&library, html_actions());
//! let config = RenderConfig::default().with_chapter_labels(false).with_verses_labels(false);
//! let mut output = HtmlOutput::default();
//! renderer.render_document(&id, &config, &mut output).unwrap();
//!
//! assert_eq!(output.paras, vec![r#"<p class="usfm_p">In the beginning</p>"#]);
//! ```
//!
//! ## Writing Actions
//!
//! ```
//! use versa::model::EventType;
//! use versa::render::ActionSet;
//!
//! let mut actions = ActionSet::<Vec<String>>::new();
//! actions.register(
//!     EventType::Text,
//!     |_| true,
//!     |s| {
//!         if let Some(text) = s.context.element().text() {
//!             s.output.push(text.to_string());
//!         }
//!         Ok(())
//!     },
//!     "Collect text",
//! );
//! assert_eq!(actions.len(), 1);
//! ```

pub mod error;
pub mod import;
pub mod model;
pub mod query;
pub mod render;
pub(crate) mod util;

pub use error::{Error, Result};
pub use import::{DocumentProvider, Format, Library};
pub use model::{CvRef, DocId, Document, EventType, Metadata, VerseRange};
pub use query::Query;
pub use render::{Action, ActionSet, RenderConfig, Renderer, Snapshot, Workspace};
