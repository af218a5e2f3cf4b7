use crate::error::CorpusFormatError;
use crate::models::*;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// One corpus book with its verses in source order.
#[derive(Debug, Clone)]
pub struct CorpusBook {
    pub name: String,
    pub verses: Vec<VerseRecord>,
}

/// The flattened corpus: books in source order, each holding its verses in
/// source order, plus lookup indexes by book name and by verse id.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    books: Vec<CorpusBook>,
    book_index: HashMap<String, usize>,
    verse_index: HashMap<VerseId, (usize, usize)>,
}

impl Corpus {
    pub fn books(&self) -> &[CorpusBook] {
        &self.books
    }

    /// Book names in corpus order. This ordering is the axis of the book matrix.
    pub fn book_names(&self) -> Vec<String> {
        self.books.iter().map(|b| b.name.clone()).collect()
    }

    pub fn book_set(&self) -> HashSet<String> {
        self.books.iter().map(|b| b.name.clone()).collect()
    }

    #[cfg(test)]
    pub fn contains_book(&self, name: &str) -> bool {
        self.book_index.contains_key(name)
    }

    pub fn contains_verse(&self, id: &VerseId) -> bool {
        self.verse_index.contains_key(id)
    }

    #[cfg(test)]
    pub fn verse_text(&self, id: &VerseId) -> Option<&str> {
        self.verse_index
            .get(id)
            .map(|&(book, verse)| self.books[book].verses[verse].text.as_str())
    }

    /// `VerseId -> text` for one book, in source order.
    pub fn verses_of(&self, book: &str) -> Option<impl Iterator<Item = (VerseId, &str)> + '_> {
        let idx = *self.book_index.get(book)?;
        Some(
            self.books[idx]
                .verses
                .iter()
                .map(|v| (v.id(), v.text.as_str())),
        )
    }

    pub fn chapter_count(&self) -> usize {
        self.books
            .iter()
            .map(|b| {
                b.verses
                    .iter()
                    .map(|v| v.chapter)
                    .collect::<HashSet<_>>()
                    .len()
            })
            .sum()
    }

    pub fn verse_count(&self) -> usize {
        self.verse_index.len()
    }
}

pub struct CorpusLoader {
    verse_name_pattern: Regex,
}

impl CorpusLoader {
    pub fn new() -> Result<Self> {
        Ok(CorpusLoader {
            verse_name_pattern: Regex::new(r"^(?:.*\S\s+)?(\d+):(\d+)$")
                .context("Failed to compile verse name pattern")?,
        })
    }

    pub fn load(&self, json: &str) -> Result<Corpus, CorpusFormatError> {
        let raw: RawCorpus = serde_json::from_str(json)
            .map_err(|e| CorpusFormatError::InvalidJson(e.to_string()))?;
        self.from_raw(raw)
    }

    pub fn from_raw(&self, raw: RawCorpus) -> Result<Corpus, CorpusFormatError> {
        let raw_books = raw.books.ok_or(CorpusFormatError::MissingBooks)?;

        let mut corpus = Corpus::default();

        for (book_idx, raw_book) in raw_books.into_iter().enumerate() {
            let name = raw_book
                .name
                .ok_or(CorpusFormatError::MissingBookName { index: book_idx })?;
            if corpus.book_index.contains_key(&name) {
                return Err(CorpusFormatError::DuplicateBook { book: name });
            }
            let chapters = raw_book
                .chapters
                .ok_or_else(|| CorpusFormatError::MissingChapters { book: name.clone() })?;

            let position = corpus.books.len();
            let mut verses = Vec::new();

            for (chapter_idx, raw_chapter) in chapters.into_iter().enumerate() {
                let raw_verses = raw_chapter.verses.ok_or_else(|| CorpusFormatError::MissingVerses {
                    book: name.clone(),
                    chapter_index: chapter_idx,
                })?;

                for (verse_idx, raw_verse) in raw_verses.into_iter().enumerate() {
                    let verse_name = raw_verse.name.ok_or_else(|| CorpusFormatError::MissingVerseName {
                        book: name.clone(),
                        chapter_index: chapter_idx,
                        verse_index: verse_idx,
                    })?;
                    let (chapter, verse) = self.parse_verse_name(&name, &verse_name)?;
                    let text = raw_verse.text.ok_or_else(|| CorpusFormatError::MissingVerseText {
                        book: name.clone(),
                        verse: verse_name.clone(),
                    })?;

                    let record = VerseRecord {
                        book: name.clone(),
                        chapter,
                        verse,
                        text,
                    };
                    let id = record.id();
                    if corpus.verse_index.contains_key(&id) {
                        return Err(CorpusFormatError::DuplicateVerse {
                            book: name.clone(),
                            verse: id.to_string(),
                        });
                    }
                    corpus.verse_index.insert(id, (position, verses.len()));
                    verses.push(record);
                }
            }

            corpus.book_index.insert(name.clone(), position);
            corpus.books.push(CorpusBook { name, verses });
        }

        Ok(corpus)
    }

    /// Reads `chapter:verse` from the end of a verse name such as `"Genesis 1:1"`.
    fn parse_verse_name(&self, book: &str, verse_name: &str) -> Result<(u32, u32), CorpusFormatError> {
        let bad = || CorpusFormatError::BadVerseName {
            book: book.to_string(),
            name: verse_name.to_string(),
        };

        let caps = self.verse_name_pattern.captures(verse_name.trim()).ok_or_else(bad)?;
        let chapter = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(bad)?;
        let verse = caps
            .get(2)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(bad)?;

        if chapter == 0 || verse == 0 {
            return Err(bad());
        }

        Ok((chapter, verse))
    }
}
