use crate::error::ParseVerseIdError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Canonical verse identifier, rendered as `"<Book> <chapter>:<verse>"`.
///
/// Equality and hashing are over the (book, chapter, verse) triple, which is
/// equivalent to comparing the canonical strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct VerseId {
    book: String,
    chapter: u32,
    verse: u32,
}

impl VerseId {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        VerseId {
            book: book.into(),
            chapter,
            verse,
        }
    }

    pub fn book(&self) -> &str {
        &self.book
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn verse(&self) -> u32 {
        self.verse
    }
}

impl fmt::Display for VerseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

impl FromStr for VerseId {
    type Err = ParseVerseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseVerseIdError(s.to_string());

        // Book names may contain spaces ("Song of Solomon"), so split on the last one.
        let (book, location) = s.rsplit_once(' ').ok_or_else(bad)?;
        let (chapter, verse) = location.split_once(':').ok_or_else(bad)?;

        if book.is_empty() || book != book.trim() {
            return Err(bad());
        }
        let chapter: u32 = chapter.parse().map_err(|_| bad())?;
        let verse: u32 = verse.parse().map_err(|_| bad())?;
        if chapter == 0 || verse == 0 {
            return Err(bad());
        }

        let id = VerseId::new(book, chapter, verse);
        // Rejects "+1", "01" and other spellings that parse but are not canonical.
        if id.to_string() != s {
            return Err(bad());
        }
        Ok(id)
    }
}

impl From<VerseId> for String {
    fn from(id: VerseId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for VerseId {
    type Error = ParseVerseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl JsonSchema for VerseId {
    fn schema_name() -> String {
        "VerseId".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

/// Raw corpus shapes. Every field is optional so the loader can report
/// exactly which one is missing instead of a generic serde error.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCorpus {
    pub books: Option<Vec<RawBook>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBook {
    pub name: Option<String>,
    pub chapters: Option<Vec<RawChapter>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChapter {
    pub verses: Option<Vec<RawVerse>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVerse {
    pub name: Option<String>,
    pub text: Option<String>,
}

/// One verse as loaded from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseRecord {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl VerseRecord {
    pub fn id(&self) -> VerseId {
        VerseId::new(self.book.clone(), self.chapter, self.verse)
    }
}

/// A verse joined with its resolved outgoing references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseNode {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    pub references: Vec<VerseId>,
}

impl VerseNode {
    #[cfg(test)]
    pub fn id(&self) -> VerseId {
        VerseId::new(self.book.clone(), self.chapter, self.verse)
    }
}

impl fmt::Display for VerseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}\nReferences:", self.book, self.chapter, self.verse)?;
        for reference in &self.references {
            write!(f, "\n- {}", reference)?;
        }
        Ok(())
    }
}

// Export document structures

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BookCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BookConnection {
    pub source: String,
    pub target: String,
    pub count: u64,
}

/// Book-to-book matrix with its axis labels. Rows are sources, columns targets.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AdjacencyJson {
    pub schema_version: String,
    pub books: Vec<String>,
    pub matrix: Vec<Vec<u64>>,
    pub out_degree: Vec<u64>,
    pub in_degree: Vec<u64>,
    pub excluded_edges: ExcludedEdges,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ExcludedEdges {
    pub same_book: u64,
    pub unknown_book: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RankingsJson {
    pub schema_version: String,
    pub most_referenced: Vec<BookCount>,
    pub most_referencing: Vec<BookCount>,
    pub top_connections: Vec<BookConnection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ReferenceEntry {
    pub source: VerseId,
    pub targets: Vec<VerseId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ReferencesJson {
    pub schema_version: String,
    pub references: Vec<ReferenceEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResolutionSummary {
    pub records: usize,
    pub accepted: usize,
    pub below_threshold: usize,
    pub rejected: usize,
    pub edges: usize,
    pub duplicate_edges: usize,
    pub rejections_by_kind: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RunManifest {
    pub schema_version: String,
    pub build_timestamp: String,
    pub min_votes: i64,
    pub source_checksums: BTreeMap<String, String>,
    pub output_checksums: BTreeMap<String, String>,
    pub resolution: ResolutionSummary,
    pub extensions: serde_json::Value,
}
