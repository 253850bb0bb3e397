//! Core data model for scripture documents.
//!
//! This module contains:
//! - Document identity, metadata and header fields
//! - The document tree (sequences, blocks, items)
//! - Chapter/verse references
//! - The linear event stream derived from a document tree

mod event;
mod node;
mod reference;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// Re-export event stream types
pub use event::{Element, Event, EventType, Position};

// Re-export tree node types
pub use node::{Block, BlockKind, Item, Mark, Sequence, SequenceKind, Wrapper};

// Re-export reference types
pub use reference::{CvRef, VerseRange};

/// Identifier of a document held by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Import metadata attached to a document (`lang`, `abbr`, and any extras).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub lang: String,
    pub abbr: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new(lang: impl Into<String>, abbr: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            abbr: abbr.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Attach an extra metadata field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A parsed scripture document.
///
/// The tree is owned by the provider that imported it; rendering only ever
/// borrows it.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocId,
    pub metadata: Metadata,
    /// Book-level header fields (`id`, `bookCode`, `h`, `toc1`, ...).
    pub headers: BTreeMap<String, String>,
    /// The main content sequence.
    pub main: Sequence,
}

impl Document {
    /// Create an empty document with an empty main sequence.
    pub fn new(id: DocId, metadata: Metadata) -> Self {
        Self {
            id,
            metadata,
            headers: BTreeMap::new(),
            main: Sequence::new(SequenceKind::Main),
        }
    }

    pub fn id(&self) -> &DocId {
        &self.id
    }

    /// Get a header field by key.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    /// The book code from the `\id` line, if present.
    pub fn book_code(&self) -> Option<&str> {
        self.header("bookCode")
    }

    /// Set a header field, returning the document for chaining.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Append a block to the main sequence, returning the document for chaining.
    pub fn with_block(mut self, block: Block) -> Self {
        self.main.blocks.push(block);
        self
    }

    /// Linearize the tree into its event stream, in document order.
    ///
    /// The stream starts with the main sequence's `StartSequence` and ends
    /// with its `EndSequence`; document start/end events are synthesized by
    /// the renderer.
    pub fn events(&self) -> Vec<Event<'_>> {
        event::linearize(self)
    }
}
