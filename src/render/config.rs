//! Render configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{CvRef, SequenceKind, VerseRange};

/// Switches controlling which markup categories a structural render emits.
///
/// Keys (de)serialize in camelCase (`showFootnotes`, `selectedBcvNotes`, ...)
/// and any key left out takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub show_word_atts: bool,
    pub show_titles: bool,
    pub show_headings: bool,
    pub show_introductions: bool,
    pub show_footnotes: bool,
    pub show_xrefs: bool,
    pub show_para_styles: bool,
    pub show_character_markup: bool,
    pub show_chapter_labels: bool,
    pub show_verses_labels: bool,
    /// Positions whose notes are rendered; empty means every position.
    pub selected_bcv_notes: Vec<CvRef>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_word_atts: false,
            show_titles: false,
            show_headings: true,
            show_introductions: true,
            show_footnotes: true,
            show_xrefs: true,
            show_para_styles: true,
            show_character_markup: true,
            show_chapter_labels: true,
            show_verses_labels: true,
            selected_bcv_notes: Vec::new(),
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_word_atts(mut self, show: bool) -> Self {
        self.show_word_atts = show;
        self
    }

    pub fn with_titles(mut self, show: bool) -> Self {
        self.show_titles = show;
        self
    }

    pub fn with_headings(mut self, show: bool) -> Self {
        self.show_headings = show;
        self
    }

    pub fn with_introductions(mut self, show: bool) -> Self {
        self.show_introductions = show;
        self
    }

    pub fn with_footnotes(mut self, show: bool) -> Self {
        self.show_footnotes = show;
        self
    }

    pub fn with_xrefs(mut self, show: bool) -> Self {
        self.show_xrefs = show;
        self
    }

    pub fn with_para_styles(mut self, show: bool) -> Self {
        self.show_para_styles = show;
        self
    }

    pub fn with_character_markup(mut self, show: bool) -> Self {
        self.show_character_markup = show;
        self
    }

    pub fn with_chapter_labels(mut self, show: bool) -> Self {
        self.show_chapter_labels = show;
        self
    }

    pub fn with_verses_labels(mut self, show: bool) -> Self {
        self.show_verses_labels = show;
        self
    }

    pub fn with_selected_notes(mut self, selected: Vec<CvRef>) -> Self {
        self.selected_bcv_notes = selected;
        self
    }

    /// Whether a note of `kind` at the given position should be rendered.
    pub fn shows_note(&self, kind: SequenceKind, chapter: Option<u32>, verses: Option<VerseRange>) -> bool {
        let enabled = match kind {
            SequenceKind::Footnote => self.show_footnotes,
            SequenceKind::Xref => self.show_xrefs,
            SequenceKind::Main => false,
        };
        if !enabled {
            return false;
        }
        if self.selected_bcv_notes.is_empty() {
            return true;
        }
        match (chapter, verses) {
            (Some(chapter), Some(verses)) => self
                .selected_bcv_notes
                .iter()
                .any(|cv| cv.covers(chapter, verses)),
            _ => false,
        }
    }
}
