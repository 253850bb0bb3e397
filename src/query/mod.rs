//! A small textual query language over imported documents.
//!
//! Queries are single expressions such as `documents`,
//! `header(id: "bookCode")`, `cvIndex(chapter: 2)` or
//! `blocks(withScriptureCV: "2:3-6")`. Each evaluates against every document
//! a provider holds and yields a JSON array with one entry per document.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Block, BlockKind, CvRef, Document, Item, Mark, VerseRange};
use crate::util::normalize_space;

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Id, book code and headers of every document.
    Documents,
    /// One header value per document.
    Header { id: String },
    /// Verse text of one chapter, indexed by verse.
    CvIndex { chapter: u32 },
    /// Blocks and items of the main sequence within a reference.
    Blocks { range: CvRef },
}

impl Query {
    fn name(&self) -> &'static str {
        match self {
            Query::Documents => "documents",
            Query::Header { .. } => "header",
            Query::CvIndex { .. } => "cvIndex",
            Query::Blocks { .. } => "blocks",
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Documents => f.write_str("documents"),
            Query::Header { id } => write!(f, "header(id: {id:?})"),
            Query::CvIndex { chapter } => write!(f, "cvIndex(chapter: {chapter})"),
            Query::Blocks { range } => write!(f, "blocks(withScriptureCV: \"{range}\")"),
        }
    }
}

impl FromStr for Query {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, args) = match s.split_once('(') {
            Some((name, rest)) => {
                let args = rest
                    .strip_suffix(')')
                    .ok_or_else(|| Error::Query(format!("missing ')' in {s:?}")))?;
                (name.trim(), parse_arguments(args)?)
            }
            None => (s, Vec::new()),
        };

        let query = match name {
            "documents" => Query::Documents,
            "header" => Query::Header {
                id: argument(&args, name, "id")?.to_string(),
            },
            "cvIndex" => {
                let value = argument(&args, name, "chapter")?;
                let chapter = value
                    .parse()
                    .map_err(|_| Error::Query(format!("invalid chapter {value:?}")))?;
                Query::CvIndex { chapter }
            }
            "blocks" => {
                let value = argument(&args, name, "withScriptureCV")?;
                let range = value
                    .parse()
                    .map_err(|_| Error::Query(format!("invalid reference {value:?}")))?;
                Query::Blocks { range }
            }
            "" => return Err(Error::Query("empty query".to_string())),
            other => return Err(Error::Query(format!("unknown query {other:?}"))),
        };

        // Every query takes at most one argument, and it must be the expected one.
        let expected = usize::from(query != Query::Documents);
        if args.len() != expected {
            return Err(Error::Query(format!(
                "{} takes {expected} argument(s), got {}",
                query.name(),
                args.len()
            )));
        }
        Ok(query)
    }
}

/// Split `key: value, key: "value"` into pairs.
fn parse_arguments(args: &str) -> Result<Vec<(&str, &str)>> {
    let mut pairs = Vec::new();
    for arg in args.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        let (key, value) = arg
            .split_once(':')
            .ok_or_else(|| Error::Query(format!("expected key: value, got {arg:?}")))?;
        let value = value.trim();
        let value = match value.strip_prefix('"') {
            Some(inner) => inner
                .strip_suffix('"')
                .ok_or_else(|| Error::Query(format!("unterminated string in {arg:?}")))?,
            None => value,
        };
        pairs.push((key.trim(), value));
    }
    Ok(pairs)
}

fn argument<'a>(args: &[(&str, &'a str)], query: &str, key: &str) -> Result<&'a str> {
    args.iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .ok_or_else(|| Error::Query(format!("{query} requires argument {key:?}")))
}

// --- Results ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentSummary<'a> {
    id: &'a str,
    book_code: Option<&'a str>,
    headers: &'a std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct HeaderValue<'a> {
    id: &'a str,
    value: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ChapterIndex<'a> {
    id: &'a str,
    chapter: u32,
    verses: Vec<VerseText>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerseText {
    verse_range: String,
    text: String,
}

#[derive(Debug, Serialize)]
struct DocumentBlocks<'a> {
    id: &'a str,
    blocks: Vec<BlockView>,
}

#[derive(Debug, Serialize)]
struct BlockView {
    bs: BlockScope,
    items: Vec<ItemView>,
}

#[derive(Debug, Serialize)]
struct BlockScope {
    payload: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemView {
    #[serde(rename = "type")]
    kind: &'static str,
    sub_type: String,
    payload: String,
}

/// Evaluate `query` against `documents`.
pub fn evaluate(documents: &[&Document], query: &Query) -> Result<serde_json::Value> {
    let value = match query {
        Query::Documents => serde_json::to_value(
            documents
                .iter()
                .map(|doc| DocumentSummary {
                    id: doc.id().as_str(),
                    book_code: doc.book_code(),
                    headers: &doc.headers,
                })
                .collect::<Vec<_>>(),
        )?,
        Query::Header { id } => serde_json::to_value(
            documents
                .iter()
                .map(|doc| HeaderValue {
                    id: doc.id().as_str(),
                    value: doc.header(id),
                })
                .collect::<Vec<_>>(),
        )?,
        Query::CvIndex { chapter } => serde_json::to_value(
            documents
                .iter()
                .map(|doc| ChapterIndex {
                    id: doc.id().as_str(),
                    chapter: *chapter,
                    verses: chapter_verses(doc, *chapter),
                })
                .collect::<Vec<_>>(),
        )?,
        Query::Blocks { range } => serde_json::to_value(
            documents
                .iter()
                .map(|doc| DocumentBlocks {
                    id: doc.id().as_str(),
                    blocks: blocks_in_range(doc, range),
                })
                .collect::<Vec<_>>(),
        )?,
    };
    Ok(value)
}

/// Chapter/verse position while walking a main sequence.
#[derive(Debug, Default, Clone, Copy)]
struct Cursor {
    chapter: Option<u32>,
    verses: Option<VerseRange>,
}

impl Cursor {
    fn mark(&mut self, mark: &Mark) {
        match *mark {
            Mark::Chapter { number } => {
                self.chapter = Some(number);
                self.verses = None;
            }
            Mark::Verses { range } => self.verses = Some(range),
        }
    }

    fn within(&self, range: &CvRef) -> bool {
        match (self.chapter, self.verses) {
            (Some(chapter), Some(verses)) => range.covers(chapter, verses),
            _ => false,
        }
    }
}

fn chapter_verses(doc: &Document, chapter: u32) -> Vec<VerseText> {
    let mut cursor = Cursor::default();
    let mut verses: Vec<(VerseRange, String)> = Vec::new();
    for block in &doc.main.blocks {
        if block.kind != BlockKind::Paragraph {
            // Marks still move the cursor outside scripture paragraphs.
            for item in &block.content {
                if let Item::Mark(mark) = item {
                    cursor.mark(mark);
                }
            }
            continue;
        }
        collect_verse_text(&block.content, chapter, &mut cursor, &mut verses);
    }
    verses
        .into_iter()
        .map(|(range, text)| VerseText {
            verse_range: range.to_string(),
            text: normalize_space(&text).trim().to_string(),
        })
        .collect()
}

fn collect_verse_text(
    items: &[Item],
    chapter: u32,
    cursor: &mut Cursor,
    verses: &mut Vec<(VerseRange, String)>,
) {
    for item in items {
        match item {
            Item::Mark(mark) => {
                cursor.mark(mark);
                if let Mark::Verses { range } = mark
                    && cursor.chapter == Some(chapter)
                {
                    verses.push((*range, String::new()));
                }
            }
            Item::Text(text) => {
                if cursor.chapter == Some(chapter)
                    && cursor.verses.is_some()
                    && let Some((_, buffer)) = verses.last_mut()
                {
                    buffer.push_str(text);
                }
            }
            Item::Wrapper { content, .. } => collect_verse_text(content, chapter, cursor, verses),
            Item::Graft(_) => {}
        }
    }
}

fn blocks_in_range(doc: &Document, range: &CvRef) -> Vec<BlockView> {
    let mut cursor = Cursor::default();
    let mut views = Vec::new();
    for block in &doc.main.blocks {
        let mut items = Vec::new();
        collect_items(&block.content, range, &mut cursor, &mut items);
        if !items.is_empty() {
            views.push(BlockView {
                bs: BlockScope {
                    payload: block_scope(block),
                },
                items,
            });
        }
    }
    views
}

fn block_scope(block: &Block) -> String {
    format!("blockTag/{}", block.style)
}

fn collect_items(items: &[Item], range: &CvRef, cursor: &mut Cursor, out: &mut Vec<ItemView>) {
    for item in items {
        match item {
            Item::Mark(mark) => {
                cursor.mark(mark);
                if cursor.within(range) {
                    let (sub_type, payload) = match mark {
                        Mark::Chapter { number } => ("chapter", number.to_string()),
                        Mark::Verses { range } => ("verses", range.to_string()),
                    };
                    out.push(ItemView {
                        kind: "mark",
                        sub_type: sub_type.to_string(),
                        payload,
                    });
                }
            }
            Item::Text(text) => {
                if cursor.within(range) {
                    out.push(ItemView {
                        kind: "text",
                        sub_type: "text".to_string(),
                        payload: normalize_space(text),
                    });
                }
            }
            Item::Wrapper { wrapper, content } => {
                let inside = cursor.within(range);
                if inside {
                    out.push(ItemView {
                        kind: "wrapper",
                        sub_type: "start".to_string(),
                        payload: wrapper.style().to_string(),
                    });
                }
                collect_items(content, range, cursor, out);
                if inside || cursor.within(range) {
                    out.push(ItemView {
                        kind: "wrapper",
                        sub_type: "end".to_string(),
                        payload: wrapper.style().to_string(),
                    });
                }
            }
            Item::Graft(sequence) => {
                if cursor.within(range) {
                    out.push(ItemView {
                        kind: "graft",
                        sub_type: sequence.kind.as_str().to_string(),
                        payload: sequence.caller.clone().unwrap_or_default(),
                    });
                }
            }
        }
    }
}
