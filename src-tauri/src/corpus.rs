//! Reference corpus: chapters ("sura") of ordered verses ("aya"), loaded once
//! at startup from a Tanzil-style XML document and read-only afterwards.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("<{element}> element is missing its {attribute} attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Verse outside of any chapter")]
    VerseOutsideChapter,

    #[error("Unknown chapter {0}")]
    ChapterNotFound(String),

    #[error("Unknown verse {1} in chapter {0}")]
    VerseNotFound(String, String),
}

impl CorpusError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ChapterNotFound(_) => "Selected chapter was not found.",
            Self::VerseNotFound(..) => "Selected verse was not found.",
            Self::Io(_) => "The verse corpus file could not be read.",
            Self::Xml(_)
            | Self::Attr(_)
            | Self::MissingAttribute { .. }
            | Self::VerseOutsideChapter => "The verse corpus file is malformed.",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Verse {
    pub index: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Chapter {
    pub index: String,
    pub name: String,
    pub verses: Vec<Verse>,
}

/// Immutable verse store. Constructed once during app setup and handed to the
/// interaction layer as shared state.
#[derive(Debug, Default)]
pub struct Corpus {
    chapters: Vec<Chapter>,
}

impl Corpus {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Degrade-gracefully entry point used at startup: a missing or malformed
    /// source logs the failure and yields an empty store instead of aborting.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(corpus) => corpus,
            Err(err) => {
                log::error!(
                    "Failed to load corpus from {}: {err}. Starting with an empty verse store.",
                    path.display()
                );
                Self::empty()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let start = Instant::now();
        let file = File::open(path)?;
        let corpus = Self::from_reader(BufReader::new(file))?;

        log::info!(
            "Loaded {} chapters ({} verses) from {} in {:?}",
            corpus.chapters.len(),
            corpus.chapters.iter().map(|c| c.verses.len()).sum::<usize>(),
            path.display(),
            start.elapsed()
        );
        Ok(corpus)
    }

    pub fn from_reader<R: BufRead>(source: R) -> Result<Self, CorpusError> {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);

        let mut chapters: Vec<Chapter> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                    b"sura" => {
                        let index = require_attr(&e, "sura", "index")?;
                        let name = require_attr(&e, "sura", "name")?;
                        chapters.push(Chapter {
                            index,
                            name,
                            verses: Vec::new(),
                        });
                    }
                    b"aya" => {
                        let index = require_attr(&e, "aya", "index")?;
                        let text = require_attr(&e, "aya", "text")?;
                        chapters
                            .last_mut()
                            .ok_or(CorpusError::VerseOutsideChapter)?
                            .verses
                            .push(Verse { index, text });
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { chapters })
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Chapters in document order.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Verses of a chapter in document order, or an empty slice for an
    /// unknown chapter index.
    pub fn verses(&self, chapter_index: &str) -> &[Verse] {
        self.chapter(chapter_index)
            .map(|c| c.verses.as_slice())
            .unwrap_or(&[])
    }

    pub fn verse_text(&self, chapter_index: &str, verse_index: &str) -> Result<&str, CorpusError> {
        let chapter = self
            .chapter(chapter_index)
            .ok_or_else(|| CorpusError::ChapterNotFound(chapter_index.to_string()))?;

        chapter
            .verses
            .iter()
            .find(|v| v.index == verse_index)
            .map(|v| v.text.as_str())
            .ok_or_else(|| {
                CorpusError::VerseNotFound(chapter_index.to_string(), verse_index.to_string())
            })
    }

    fn chapter(&self, chapter_index: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.index == chapter_index)
    }
}

fn attr_value(e: &BytesStart, name: &str) -> Result<Option<String>, CorpusError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn require_attr(
    e: &BytesStart,
    element: &'static str,
    attribute: &'static str,
) -> Result<String, CorpusError> {
    attr_value(e, attribute)?.ok_or(CorpusError::MissingAttribute { element, attribute })
}
