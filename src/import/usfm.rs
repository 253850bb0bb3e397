//! USFM importer.
//!
//! Builds a document tree from USFM source. Covers the markers a typical
//! book uses: identification/header lines, chapters and verses, titles,
//! headings, introductions, paragraphs and poetry, character markup, `\w`
//! words with attributes, footnotes and cross-references. Unknown markers
//! are skipped with a warning; their text still flows into the current block.
//!
//! # Example
//!
//! ```
//! use versa::import::usfm;
//!
//! let parsed = usfm::parse("\\id GEN\n\\c 1\n\\p\n\\v 1 In the beginning").unwrap();
//! assert_eq!(parsed.headers["bookCode"], "GEN");
//! assert_eq!(parsed.main.blocks.len(), 1);
//! ```

use std::collections::BTreeMap;

use log::warn;

use crate::error::{Error, Result};
use crate::model::{Block, BlockKind, Item, Mark, Sequence, SequenceKind, VerseRange};
use crate::util::normalize_space;

/// Header fields and main sequence parsed from one USFM book.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub headers: BTreeMap<String, String>,
    pub main: Sequence,
}

/// Parse a USFM book.
pub fn parse(source: &str) -> Result<Parsed> {
    let mut parser = Parser::new();
    for token in tokenize(source) {
        parser.line = token.line;
        match token.kind {
            TokenKind::Marker { name, closing } => parser.marker(name, closing)?,
            TokenKind::Text(text) => parser.text(text)?,
        }
    }
    parser.finish()
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind<'s> {
    /// `\name` or `\name*`, with any `+` nesting prefix stripped.
    Marker { name: &'s str, closing: bool },
    Text(&'s str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'s> {
    kind: TokenKind<'s>,
    line: usize,
}

fn tokenize(source: &str) -> Vec<Token<'_>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut line = 1;

    while pos < bytes.len() {
        if bytes[pos] == b'\\' {
            let start = pos + 1;
            let mut end = start;
            while end < bytes.len()
                && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'+' || bytes[end] == b'-')
            {
                end += 1;
            }
            let name = source[start..end].trim_start_matches('+');
            let closing = bytes.get(end) == Some(&b'*');
            if closing {
                end += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Marker { name, closing },
                line,
            });
            pos = end;

            // One whitespace character delimits an opening marker from its content.
            if !closing {
                match bytes.get(pos) {
                    Some(b'\r') => {
                        pos += 1;
                        if bytes.get(pos) == Some(&b'\n') {
                            pos += 1;
                        }
                        line += 1;
                    }
                    Some(b'\n') => {
                        pos += 1;
                        line += 1;
                    }
                    Some(b' ' | b'\t') => pos += 1,
                    _ => {}
                }
            }
        } else {
            let end = memchr::memchr(b'\\', &bytes[pos..]).map_or(bytes.len(), |i| pos + i);
            let text = &source[pos..end];
            tokens.push(Token {
                kind: TokenKind::Text(text),
                line,
            });
            line += memchr::memchr_iter(b'\n', text.as_bytes()).count();
            pos = end;
        }
    }

    tokens
}

// ============================================================================
// Marker classification
// ============================================================================

const HEADER_MARKERS: &[&str] = &[
    "id", "ide", "h", "h1", "h2", "h3", "toc1", "toc2", "toc3", "toca1", "toca2", "toca3", "usfm",
    "rem", "sts",
];

const CHARACTER_MARKERS: &[&str] = &[
    "add", "addpn", "bd", "bdit", "bk", "dc", "em", "fig", "it", "jmp", "k", "lik", "litl", "liv",
    "nd", "ndx", "no", "ord", "pn", "png", "pro", "qac", "qs", "qt", "rb", "rq", "sc", "sig", "sls",
    "sup", "tl", "w", "wa", "wg", "wh", "wj",
];

const TITLE_MARKERS: &[&str] = &["mt", "mt1", "mt2", "mt3", "mt4", "mte", "mte1", "mte2"];

const HEADING_MARKERS: &[&str] = &[
    "s", "s1", "s2", "s3", "s4", "ms", "ms1", "ms2", "ms3", "mr", "sr", "r", "d", "sp", "sd", "sd1",
    "sd2", "cl", "cd",
];

const PARAGRAPH_MARKERS: &[&str] = &[
    "p", "m", "po", "pr", "cls", "pmo", "pm", "pmc", "pmr", "pi", "pi1", "pi2", "pi3", "mi", "nb",
    "pc", "ph", "ph1", "ph2", "ph3", "b", "q", "q1", "q2", "q3", "q4", "qr", "qc", "qa", "qm", "qm1",
    "qm2", "qm3", "qd", "lh", "li", "li1", "li2", "li3", "li4", "lf", "lim", "lim1", "lim2", "pb",
];

const NOTE_MARKERS: &[&str] = &["f", "fe", "x"];

fn is_note_part(name: &str) -> bool {
    name.len() > 1 && (name.starts_with('f') || name.starts_with('x')) && name != "fig"
}

fn block_kind(name: &str) -> Option<BlockKind> {
    if TITLE_MARKERS.contains(&name) {
        Some(BlockKind::Title)
    } else if HEADING_MARKERS.contains(&name) {
        Some(BlockKind::Heading)
    } else if PARAGRAPH_MARKERS.contains(&name) {
        Some(BlockKind::Paragraph)
    } else if name.starts_with('i') && name != "it" {
        Some(BlockKind::Introduction)
    } else {
        None
    }
}

// ============================================================================
// Parser
// ============================================================================

/// What the next text token means.
#[derive(Debug, Clone, Default)]
enum Expect {
    #[default]
    Content,
    Header(String),
    Chapter,
    Verse,
    Caller,
}

/// An open character or word wrapper.
#[derive(Debug, Clone)]
struct OpenWrapper {
    style: String,
    content: Vec<Item>,
}

impl OpenWrapper {
    fn new(style: &str) -> Self {
        Self {
            style: style.to_string(),
            content: Vec::new(),
        }
    }

    fn into_item(self) -> Item {
        if self.style == "w" {
            word_item(self.content)
        } else {
            Item::char(self.style, self.content)
        }
    }
}

#[derive(Debug, Clone)]
struct OpenNote {
    marker: String,
    sequence: Sequence,
    body: Block,
    wrappers: Vec<OpenWrapper>,
}

#[derive(Debug)]
struct Parser {
    line: usize,
    headers: BTreeMap<String, String>,
    main: Sequence,
    block: Option<Block>,
    wrappers: Vec<OpenWrapper>,
    note: Option<OpenNote>,
    /// Chapter marks waiting for the next paragraph block.
    pending: Vec<Item>,
    expect: Expect,
}

impl Parser {
    fn new() -> Self {
        Self {
            line: 1,
            headers: BTreeMap::new(),
            main: Sequence::new(SequenceKind::Main),
            block: None,
            wrappers: Vec::new(),
            note: None,
            pending: Vec::new(),
            expect: Expect::Content,
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn marker(&mut self, name: &str, closing: bool) -> Result<()> {
        if !matches!(self.expect, Expect::Content) {
            // A marker arrived where a value was expected.
            match std::mem::take(&mut self.expect) {
                Expect::Chapter => return Err(self.error("\\c without a chapter number")),
                Expect::Verse => return Err(self.error("\\v without a verse number")),
                Expect::Header(key) => {
                    self.headers.insert(key, String::new());
                }
                Expect::Caller | Expect::Content => {}
            }
        }

        if closing {
            return self.close_marker(name);
        }

        if name.is_empty() {
            warn!("line {}: stray backslash", self.line);
            return Ok(());
        }

        if HEADER_MARKERS.contains(&name) {
            self.expect = Expect::Header(name.to_string());
        } else if name == "c" {
            if self.note.is_some() {
                return Err(self.error("\\c inside a note"));
            }
            self.close_block();
            self.expect = Expect::Chapter;
        } else if name == "v" {
            self.expect = Expect::Verse;
        } else if NOTE_MARKERS.contains(&name) {
            self.open_note(name)?;
        } else if self.note.is_some() && is_note_part(name) {
            self.open_note_part(name);
        } else if CHARACTER_MARKERS.contains(&name) {
            if self.note.is_none() && self.block.is_none() {
                self.open_block(BlockKind::Paragraph, "p");
            }
            self.open_wrappers().push(OpenWrapper::new(name));
        } else if let Some(kind) = block_kind(name) {
            if self.note.is_some() {
                return Err(self.error(format!("\\{name} inside a note")));
            }
            self.open_block(kind, name);
        } else {
            warn!("line {}: skipping unknown marker \\{name}", self.line);
        }
        Ok(())
    }

    fn close_marker(&mut self, name: &str) -> Result<()> {
        if NOTE_MARKERS.contains(&name) {
            return self.close_note(name);
        }

        match self.open_wrappers().iter().rposition(|w| w.style == name) {
            Some(index) => {
                while self.open_wrappers().len() > index {
                    self.fold_top();
                }
            }
            None => warn!("line {}: unmatched \\{name}*", self.line),
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let text = match std::mem::take(&mut self.expect) {
            Expect::Content => text,
            Expect::Header(key) => {
                let (value, rest) = text.split_once('\n').unwrap_or((text, ""));
                self.headers.insert(key.clone(), value.trim().to_string());
                if key == "id"
                    && let Some(code) = value.split_whitespace().next()
                {
                    self.headers.insert("bookCode".to_string(), code.to_string());
                }
                rest
            }
            Expect::Chapter => {
                let (number, rest) = split_first_word(text);
                let number = number
                    .parse::<u32>()
                    .map_err(|_| self.error(format!("invalid chapter number {number:?}")))?;
                self.pending.push(Item::chapter(number));
                strip_separator(rest)
            }
            Expect::Verse => {
                let (number, rest) = split_first_word(text);
                let range = number
                    .parse::<VerseRange>()
                    .map_err(|_| self.error(format!("invalid verse number {number:?}")))?;
                self.push_item(Item::Mark(Mark::Verses { range }));
                strip_separator(rest)
            }
            Expect::Caller => {
                let (caller, rest) = split_first_word(text);
                if let Some(note) = self.note.as_mut() {
                    note.sequence.caller = Some(caller.to_string());
                }
                strip_separator(rest)
            }
        };

        let normalized = normalize_space(text);
        if normalized.trim().is_empty() && self.at_block_start() {
            return Ok(());
        }
        let normalized = if self.at_block_start() {
            normalized.trim_start().to_string()
        } else {
            normalized
        };
        if !normalized.is_empty() {
            self.push_item(Item::Text(normalized));
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Parsed> {
        match std::mem::take(&mut self.expect) {
            Expect::Chapter => return Err(self.error("\\c without a chapter number")),
            Expect::Verse => return Err(self.error("\\v without a verse number")),
            Expect::Header(key) => {
                self.headers.insert(key, String::new());
            }
            _ => {}
        }
        if let Some(note) = &self.note {
            return Err(self.error(format!("unclosed \\{} note", note.marker)));
        }
        self.close_block();
        if !self.pending.is_empty() {
            let mut block = Block::paragraph("p");
            block.content = std::mem::take(&mut self.pending);
            self.main.blocks.push(block);
        }
        Ok(Parsed {
            headers: self.headers,
            main: self.main,
        })
    }

    // --- Blocks ---

    fn open_block(&mut self, kind: BlockKind, style: &str) {
        self.close_block();
        let mut block = Block::new(kind, style);
        // Chapter marks wait for the first paragraph, skipping headings.
        if kind == BlockKind::Paragraph {
            block.content = std::mem::take(&mut self.pending);
        }
        self.block = Some(block);
    }

    fn close_block(&mut self) {
        while !self.wrappers.is_empty() {
            fold_into_block(&mut self.wrappers, &mut self.block);
        }
        if let Some(mut block) = self.block.take() {
            trim_trailing_space(&mut block.content);
            self.main.blocks.push(block);
        }
    }

    /// Whether nothing but marks has been written to the current container.
    fn at_block_start(&self) -> bool {
        let content = match (&self.note, self.wrappers.last()) {
            (Some(note), _) => match note.wrappers.last() {
                Some(wrapper) => &wrapper.content,
                None => &note.body.content,
            },
            (None, Some(wrapper)) => &wrapper.content,
            (None, None) => match &self.block {
                Some(block) => &block.content,
                None => return true,
            },
        };
        content.iter().all(|item| matches!(item, Item::Mark(_)))
    }

    // --- Notes ---

    fn open_note(&mut self, name: &str) -> Result<()> {
        if self.note.is_some() {
            return Err(self.error(format!("\\{name} inside a note")));
        }
        let kind = if name == "x" {
            SequenceKind::Xref
        } else {
            SequenceKind::Footnote
        };
        self.note = Some(OpenNote {
            marker: name.to_string(),
            sequence: Sequence::new(kind),
            body: Block::new(BlockKind::Note, name),
            wrappers: Vec::new(),
        });
        self.expect = Expect::Caller;
        Ok(())
    }

    fn open_note_part(&mut self, name: &str) {
        if let Some(note) = self.note.as_mut() {
            // A new part ends the previous one, along with any markup nested in it.
            while !note.wrappers.is_empty() {
                fold_note_wrapper(note);
            }
            note.wrappers.push(OpenWrapper::new(name));
        }
    }

    fn close_note(&mut self, name: &str) -> Result<()> {
        let Some(mut note) = self.note.take() else {
            warn!("line {}: \\{name}* without an open note", self.line);
            return Ok(());
        };
        if note.marker != name {
            let message = format!("\\{name}* closes \\{} note", note.marker);
            self.note = Some(note);
            return Err(self.error(message));
        }
        while !note.wrappers.is_empty() {
            fold_note_wrapper(&mut note);
        }
        trim_trailing_space(&mut note.body.content);
        let sequence = note.sequence.with_block(note.body);
        self.push_item(Item::Graft(sequence));
        Ok(())
    }

    // --- Items ---

    fn open_wrappers(&mut self) -> &mut Vec<OpenWrapper> {
        match self.note.as_mut() {
            Some(note) => &mut note.wrappers,
            None => &mut self.wrappers,
        }
    }

    /// Close the innermost open wrapper into its parent.
    fn fold_top(&mut self) {
        match self.note.as_mut() {
            Some(note) => fold_note_wrapper(note),
            None => fold_into_block(&mut self.wrappers, &mut self.block),
        }
    }

    fn push_item(&mut self, item: Item) {
        if let Some(note) = self.note.as_mut() {
            match note.wrappers.last_mut() {
                Some(wrapper) => wrapper.content.push(item),
                None => note.body.push(item),
            }
            return;
        }
        if let Some(wrapper) = self.wrappers.last_mut() {
            wrapper.content.push(item);
            return;
        }
        if self.block.is_none() {
            self.open_block(BlockKind::Paragraph, "p");
        }
        if let Some(block) = self.block.as_mut() {
            block.push(item);
        }
    }
}

fn fold_into_block(wrappers: &mut Vec<OpenWrapper>, block: &mut Option<Block>) {
    let Some(wrapper) = wrappers.pop() else {
        return;
    };
    let item = wrapper.into_item();
    match (wrappers.last_mut(), block.as_mut()) {
        (Some(parent), _) => parent.content.push(item),
        (None, Some(block)) => block.push(item),
        (None, None) => *block = Some(Block::paragraph("p").with(item)),
    }
}

fn fold_note_wrapper(note: &mut OpenNote) {
    let Some(wrapper) = note.wrappers.pop() else {
        return;
    };
    let item = wrapper.into_item();
    match note.wrappers.last_mut() {
        Some(parent) => parent.content.push(item),
        None => note.body.push(item),
    }
}

/// Build a word wrapper from `word|attributes` content.
fn word_item(content: Vec<Item>) -> Item {
    let text: String = content
        .iter()
        .filter_map(|item| match item {
            Item::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    match text.split_once('|') {
        Some((word, attributes)) => Item::word(word.trim(), parse_attributes(attributes)),
        None => Item::word(text.trim(), Vec::new()),
    }
}

/// Parse `key="value"` pairs; a bare value is the default `lemma` attribute.
fn parse_attributes(source: &str) -> Vec<(String, String)> {
    let source = source.trim();
    if !source.contains('=') {
        if source.is_empty() {
            return Vec::new();
        }
        return vec![("lemma".to_string(), source.to_string())];
    }

    let mut attributes = Vec::new();
    let mut rest = source;
    while let Some((key, after)) = rest.split_once('=') {
        let key = key.trim();
        let after = after.trim_start();
        let Some(value_start) = after.strip_prefix('"') else {
            break;
        };
        let Some((value, remainder)) = value_start.split_once('"') else {
            break;
        };
        if !key.is_empty() {
            attributes.push((key.to_string(), value.to_string()));
        }
        rest = remainder;
    }
    attributes
}

/// Drop the single whitespace character separating a value from content.
fn strip_separator(text: &str) -> &str {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str(),
        _ => text,
    }
}

fn split_first_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], &text[end..]),
        None => (text, ""),
    }
}

/// Drop trailing whitespace from the last text run of a block.
fn trim_trailing_space(content: &mut Vec<Item>) {
    if let Some(Item::Text(text)) = content.last_mut() {
        let trimmed = text.trim_end().len();
        text.truncate(trimmed);
        if text.is_empty() {
            content.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[Item]) -> Vec<String> {
        items
            .iter()
            .map(|item| match item {
                Item::Mark(Mark::Chapter { number }) => format!("c{number}"),
                Item::Mark(Mark::Verses { range }) => format!("v{range}"),
                Item::Text(text) => text.clone(),
                Item::Wrapper { wrapper, content } => {
                    format!("{}[{}]", wrapper.style(), texts(content).join(","))
                }
                Item::Graft(sequence) => format!(
                    "{}({})",
                    sequence.kind.as_str(),
                    texts(&sequence.blocks[0].content).join(",")
                ),
            })
            .collect()
    }

    #[test]
    fn test_tokenize_markers_and_text() {
        let tokens: Vec<_> = tokenize("\\p\n\\v 1 Hi \\nd Lord\\nd*").into_iter().map(|t| t.kind).collect();
        assert_eq!(
            tokens,
            vec![
                TokenKind::Marker { name: "p", closing: false },
                TokenKind::Marker { name: "v", closing: false },
                TokenKind::Text("1 Hi "),
                TokenKind::Marker { name: "nd", closing: false },
                TokenKind::Text("Lord"),
                TokenKind::Marker { name: "nd", closing: true },
            ]
        );
    }

    #[test]
    fn test_tokenize_tracks_lines() {
        let tokens = tokenize("\\id GEN\n\\c 1\n\\p\n\\v 1 a");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Text("1 a"));
        assert_eq!(last.line, 4);
    }

    #[test]
    fn test_headers() {
        let parsed = parse("\\id GEN World English Bible\n\\h Genesis\n\\toc1 The First Book of Moses\n").unwrap();
        assert_eq!(parsed.headers["id"], "GEN World English Bible");
        assert_eq!(parsed.headers["bookCode"], "GEN");
        assert_eq!(parsed.headers["h"], "Genesis");
        assert_eq!(parsed.headers["toc1"], "The First Book of Moses");
        assert!(parsed.main.blocks.is_empty());
    }

    #[test]
    fn test_chapter_mark_starts_next_block() {
        let parsed = parse("\\c 2\n\\p\n\\v 3 In\n\\v 4 the beginning\n").unwrap();
        let block = &parsed.main.blocks[0];
        assert_eq!(block.style, "p");
        assert_eq!(texts(&block.content), vec!["c2", "v3", "In ", "v4", "the beginning"]);
    }

    #[test]
    fn test_block_kinds() {
        let parsed = parse("\\mt1 Genesis\n\\ip Intro text\n\\c 1\n\\s1 Creation\n\\q1\n\\v 1 Poem").unwrap();
        let kinds: Vec<_> = parsed.main.blocks.iter().map(|b| (b.kind, b.style.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (BlockKind::Title, "mt1"),
                (BlockKind::Introduction, "ip"),
                (BlockKind::Heading, "s1"),
                (BlockKind::Paragraph, "q1"),
            ]
        );
        // The chapter mark skips the heading and opens the first paragraph.
        assert_eq!(texts(&parsed.main.blocks[2].content), vec!["Creation"]);
        assert_eq!(texts(&parsed.main.blocks[3].content), vec!["c1", "v1", "Poem"]);
    }

    #[test]
    fn test_chapter_mark_after_heading_only_chapter() {
        let parsed = parse("\\c 1\n\\p\n\\v 1 a\n\\c 2\n\\s1 Heading").unwrap();
        let blocks = &parsed.main.blocks;
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].kind, BlockKind::Heading);
        assert_eq!(texts(&blocks[1].content), vec!["Heading"]);
        // With no paragraph left, the chapter mark gets one of its own.
        assert_eq!(blocks[2].kind, BlockKind::Paragraph);
        assert_eq!(texts(&blocks[2].content), vec!["c2"]);
    }

    #[test]
    fn test_character_markup_nesting() {
        let parsed = parse("\\p \\v 1 the \\wj say \\+nd Lord\\+nd*\\wj* end").unwrap();
        assert_eq!(
            texts(&parsed.main.blocks[0].content),
            vec!["v1", "the ", "wj[say ,nd[Lord]]", " end"]
        );
    }

    #[test]
    fn test_word_attributes() {
        let parsed = parse("\\p \\v 1 \\w gracious|lemma=\"grace\" strong=\"H2603\"\\w* \\w God|Elohim\\w*").unwrap();
        let content = &parsed.main.blocks[0].content;
        assert_eq!(
            content[1],
            Item::word(
                "gracious",
                vec![
                    ("lemma".to_string(), "grace".to_string()),
                    ("strong".to_string(), "H2603".to_string()),
                ]
            )
        );
        assert_eq!(
            content[3],
            Item::word("God", vec![("lemma".to_string(), "Elohim".to_string())])
        );
    }

    #[test]
    fn test_footnote_and_xref() {
        let parsed = parse(
            "\\p \\v 1 Text\\f + \\fr 1.1 \\ft Or \\fq heavens\\f* more\\x - \\xo 1.1 \\xt Jn 1.1\\x*",
        )
        .unwrap();
        let content = &parsed.main.blocks[0].content;
        assert_eq!(
            texts(content),
            vec![
                "v1",
                "Text",
                "footnote(fr[1.1 ],ft[Or ],fq[heavens])",
                " more",
                "xref(xo[1.1 ],xt[Jn 1.1])",
            ]
        );
        match &content[2] {
            Item::Graft(sequence) => {
                assert_eq!(sequence.caller.as_deref(), Some("+"));
                assert_eq!(sequence.blocks[0].kind, BlockKind::Note);
            }
            other => panic!("expected graft, got {other:?}"),
        }
    }

    #[test]
    fn test_verse_range_marker() {
        let parsed = parse("\\c 1 \\p \\v 4-5 joined").unwrap();
        assert_eq!(texts(&parsed.main.blocks[0].content), vec!["c1", "v4-5", "joined"]);
    }

    #[test]
    fn test_invalid_chapter_number() {
        let err = parse("\\id GEN\n\\c one\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_unclosed_note() {
        let err = parse("\\p text \\f + \\ft note").unwrap_err();
        assert!(err.to_string().contains("unclosed \\f note"));
    }

    #[test]
    fn test_unknown_marker_is_skipped() {
        let parsed = parse("\\p \\v 1 a \\zzz b").unwrap();
        assert_eq!(texts(&parsed.main.blocks[0].content), vec!["v1", "a ", "b"]);
    }

    #[test]
    fn test_trailing_chapter_gets_block() {
        let parsed = parse("\\c 1\n\\p\n\\v 1 a\n\\c 2\n").unwrap();
        assert_eq!(parsed.main.blocks.len(), 2);
        assert_eq!(texts(&parsed.main.blocks[1].content), vec!["c2"]);
    }
}
