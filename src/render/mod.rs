//! Event-driven rendering of documents.
//!
//! A render walks a document's event stream once and dispatches every event
//! to the [`Action`]s registered for its [`EventType`](crate::model::EventType)
//! in an [`ActionSet`]. Actions read the current [`Context`], keep running
//! state in a [`Workspace`], and build up a caller-owned output.
//!
//! - [`action`]: actions, snapshots and the action registry
//! - [`context`]: the per-event traversal view
//! - [`engine`]: the [`Renderer`] driving one session per call
//! - [`config`]: the [`RenderConfig`] markup switches
//! - [`html`]: the built-in structural (HTML) action set
//! - [`verses`]: the built-in verse-indexed text action set
//!
//! # Example
//!
//! ```
//! use versa::import::{DocumentProvider, Library};
//! use versa::model::Metadata;
//! use versa::render::{RenderConfig, Renderer};
//! use versa::render::verses::{VerseOutput, verse_actions};
//!
//! let mut library = Library::new();
//! let id = library
//!     .import_document(Metadata::new("eng", "web"), "usfm", "\\id GEN\n\\c 1\n\\p\n\\v 1 In the beginning")
//!     .unwrap();
//!
//! let renderer = Renderer::new(&library, verse_actions());
//! let mut output = VerseOutput::default();
//! renderer.render_document(&id, &RenderConfig::default(), &mut output).unwrap();
//!
//! assert_eq!(output.lines(), vec!["1:1 => In the beginning"]);
//! ```

pub mod action;
pub mod config;
pub mod context;
pub mod engine;
pub mod html;
pub mod verses;

pub use action::{Action, ActionSet, Snapshot, Workspace};
pub use config::RenderConfig;
pub use context::{Context, Frame};
pub use engine::Renderer;
