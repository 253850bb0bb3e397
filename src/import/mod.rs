//! Document providers: importing source text and serving documents.
//!
//! The [`DocumentProvider`] trait is what the renderer consumes: resolve a
//! document id to its tree, list documents, and answer textual queries.
//! [`Library`] is the in-memory implementation.

pub mod usfm;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::error::{Error, Result};
use crate::model::{DocId, Document, Metadata};
use crate::query::{self, Query};
use crate::util::{decode_text, ide_encoding};

/// Source formats that can be imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Usfm,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Usfm => "usfm",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "usfm" | "sfm" => Ok(Format::Usfm),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Holds document trees and serves them to renderers and queries.
pub trait DocumentProvider {
    /// Parse `source` in the named format and store the resulting document.
    fn import_document(&mut self, metadata: Metadata, format: &str, source: &str) -> Result<DocId>;

    /// Look up a document by id.
    fn document(&self, id: &DocId) -> Option<&Document>;

    /// All documents, in import order.
    fn documents(&self) -> Vec<&Document>;

    /// Evaluate a textual query against every document.
    fn query(&self, expression: &str) -> Result<serde_json::Value> {
        let query: Query = expression.parse()?;
        debug!("query {query:?}");
        query::evaluate(&self.documents(), &query)
    }
}

/// In-memory document provider.
#[derive(Debug, Clone, Default)]
pub struct Library {
    documents: Vec<Document>,
    imported: usize,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already-built document, replacing any with the same id.
    pub fn insert(&mut self, document: Document) -> DocId {
        let id = document.id().clone();
        match self.documents.iter_mut().find(|d| d.id() == &id) {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
        id
    }

    /// Import raw bytes, decoding them first: UTF-8, then the encoding named
    /// by a `\ide` line, then CP1252.
    pub fn import_bytes(&mut self, metadata: Metadata, format: &str, bytes: &[u8]) -> Result<DocId> {
        let source = decode_text(bytes, ide_encoding(bytes));
        self.import_document(metadata, format, &source)
    }

    /// Read and import a USFM file.
    ///
    /// A missing path or unreadable file is reported as [`Error::Usage`],
    /// naming the resolved path.
    pub fn import_usfm_file(&mut self, metadata: Metadata, path: impl AsRef<Path>) -> Result<DocId> {
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        if !path.exists() {
            return Err(Error::Usage(format!(
                "USFM path {} does not exist",
                path.display()
            )));
        }
        let bytes = fs::read(&path).map_err(|e| {
            Error::Usage(format!("Could not load USFM file {}: {e}", path.display()))
        })?;
        self.import_bytes(metadata, Format::Usfm.as_str(), &bytes)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn next_id(&mut self, metadata: &Metadata) -> DocId {
        self.imported += 1;
        DocId::new(format!("{}_{}_{}", metadata.lang, metadata.abbr, self.imported))
    }
}

impl DocumentProvider for Library {
    fn import_document(&mut self, metadata: Metadata, format: &str, source: &str) -> Result<DocId> {
        let parsed = match format.parse::<Format>()? {
            Format::Usfm => usfm::parse(source)?,
        };

        let id = self.next_id(&metadata);
        let mut document = Document::new(id, metadata);
        document.headers = parsed.headers;
        document.main = parsed.main;
        debug!(
            "imported {} ({}): {} blocks",
            document.id(),
            document.book_code().unwrap_or("?"),
            document.main.blocks.len()
        );
        Ok(self.insert(document))
    }

    fn document(&self, id: &DocId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id)
    }

    fn documents(&self) -> Vec<&Document> {
        self.documents.iter().collect()
    }
}
