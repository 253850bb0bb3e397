//! Chapter and verse references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An inclusive range of verse numbers, such as `3` or `3-4`.
///
/// `start <= end` always holds; construction validates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerseRange {
    start: u32,
    end: u32,
}

impl VerseRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidReference(format!("{start}-{end}")));
        }
        Ok(Self { start, end })
    }

    /// A range covering one verse.
    pub fn single(verse: u32) -> Self {
        Self {
            start: verse,
            end: verse,
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn contains(&self, verse: u32) -> bool {
        (self.start..=self.end).contains(&verse)
    }

    pub fn overlaps(&self, other: &VerseRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for VerseRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| Error::InvalidReference(s.to_string()))
        };
        match s.split_once('-') {
            Some((start, end)) => VerseRange::new(parse(start)?, parse(end)?),
            None => Ok(VerseRange::single(parse(s)?)),
        }
    }
}

/// A chapter:verse reference, e.g. `2:3` or `2:3-6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CvRef {
    pub chapter: u32,
    pub verses: VerseRange,
}

impl CvRef {
    pub fn new(chapter: u32, verses: VerseRange) -> Self {
        Self { chapter, verses }
    }

    /// Whether this reference selects any verse of `verses` in `chapter`.
    pub fn covers(&self, chapter: u32, verses: VerseRange) -> bool {
        self.chapter == chapter && self.verses.overlaps(&verses)
    }
}

impl fmt::Display for CvRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verses)
    }
}

impl FromStr for CvRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (chapter, verses) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| Error::InvalidReference(s.to_string()))?;
        let chapter = chapter
            .parse::<u32>()
            .map_err(|_| Error::InvalidReference(s.to_string()))?;
        Ok(CvRef::new(chapter, verses.parse()?))
    }
}

impl TryFrom<String> for CvRef {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CvRef> for String {
    fn from(cv: CvRef) -> Self {
        cv.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_range_display() {
        assert_eq!(VerseRange::single(3).to_string(), "3");
        assert_eq!(VerseRange::new(3, 6).unwrap().to_string(), "3-6");
    }

    #[test]
    fn test_verse_range_rejects_reversed() {
        assert!(VerseRange::new(6, 3).is_err());
        assert!("6-3".parse::<VerseRange>().is_err());
    }

    #[test]
    fn test_verse_range_parse() {
        assert_eq!("4".parse::<VerseRange>().unwrap(), VerseRange::single(4));
        assert_eq!(
            "4-5".parse::<VerseRange>().unwrap(),
            VerseRange::new(4, 5).unwrap()
        );
        assert!("four".parse::<VerseRange>().is_err());
    }

    #[test]
    fn test_cv_ref_covers_overlapping_ranges() {
        let cv: CvRef = "2:3-6".parse().unwrap();
        assert!(cv.covers(2, VerseRange::single(3)));
        assert!(cv.covers(2, VerseRange::new(6, 7).unwrap()));
        assert!(!cv.covers(2, VerseRange::single(7)));
        assert!(!cv.covers(3, VerseRange::single(4)));
    }

    #[test]
    fn test_cv_ref_serde_as_string() {
        let cv: CvRef = serde_json::from_str("\"2:3\"").unwrap();
        assert_eq!(cv, CvRef::new(2, VerseRange::single(3)));
        assert_eq!(serde_json::to_string(&cv).unwrap(), "\"2:3\"");
        assert!(serde_json::from_str::<CvRef>("\"2\"").is_err());
    }
}
