use serde::Serialize;
use thiserror::Error;

/// Fatal problems with the hierarchical corpus. Any of these aborts the load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusFormatError {
    #[error("corpus is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("corpus has no `books` array")]
    MissingBooks,

    #[error("book #{index} is missing its `name`")]
    MissingBookName { index: usize },

    #[error("book '{book}' is missing its `chapters`")]
    MissingChapters { book: String },

    #[error("book '{book}', chapter #{chapter_index} is missing its `verses`")]
    MissingVerses { book: String, chapter_index: usize },

    #[error("book '{book}', chapter #{chapter_index}, verse #{verse_index} is missing its `name`")]
    MissingVerseName {
        book: String,
        chapter_index: usize,
        verse_index: usize,
    },

    #[error("verse '{verse}' in book '{book}' is missing its `text`")]
    MissingVerseText { book: String, verse: String },

    #[error("verse name '{name}' in book '{book}' does not end in `chapter:verse`")]
    BadVerseName { book: String, name: String },

    #[error("verse '{verse}' appears more than once in book '{book}'")]
    DuplicateVerse { book: String, verse: String },

    #[error("book '{book}' appears more than once in the corpus")]
    DuplicateBook { book: String },
}

/// What exactly was wrong with a `BookCode.Chapter.Verse` spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecErrorKind {
    Empty,
    WrongArity,
    EmptyBookCode,
    BadChapter,
    BadVerse,
    ZeroNumber,
    TooManyRangeMarkers,
}

impl std::fmt::Display for SpecErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SpecErrorKind::Empty => "empty spec",
            SpecErrorKind::WrongArity => "expected three dot-separated parts",
            SpecErrorKind::EmptyBookCode => "empty book code",
            SpecErrorKind::BadChapter => "chapter is not a positive integer",
            SpecErrorKind::BadVerse => "verse is not a positive integer",
            SpecErrorKind::ZeroNumber => "chapter and verse numbers start at 1",
            SpecErrorKind::TooManyRangeMarkers => "more than one range marker",
        };
        f.write_str(text)
    }
}

/// Per-record failures while resolving the edge list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("expected 3 tab-separated fields, found {found}")]
    MalformedRecord { found: usize },

    #[error("vote count '{raw}' is not an integer")]
    MalformedVote { raw: String },

    #[error("malformed spec '{spec}': {kind}")]
    MalformedSpec { spec: String, kind: SpecErrorKind },

    #[error("unknown book code '{code}'{}", suggestion_hint(.suggestion))]
    UnknownBookCode {
        code: String,
        suggestion: Option<String>,
    },

    #[error("book code '{code}' maps to '{book}', which is not a corpus book")]
    BookNotInCorpus { code: String, book: String },

    #[error("range '{spec}' ends in a different book or chapter than it starts")]
    RangeSpansBoundary { spec: String },

    #[error("range '{spec}' ends before it starts")]
    InvertedRange { spec: String },

    #[error("range '{spec}' spans {verses} verses, more than any chapter holds")]
    RangeTooLong { spec: String, verses: u64 },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(code) => format!(" (did you mean '{}'?)", code),
        None => String::new(),
    }
}

impl ResolveError {
    /// Stable short name used to bucket rejections in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::MalformedRecord { .. } => "malformed_record",
            ResolveError::MalformedVote { .. } => "malformed_vote",
            ResolveError::MalformedSpec { .. } => "malformed_spec",
            ResolveError::UnknownBookCode { .. } => "unknown_book_code",
            ResolveError::BookNotInCorpus { .. } => "book_not_in_corpus",
            ResolveError::RangeSpansBoundary { .. } => "range_spans_boundary",
            ResolveError::InvertedRange { .. } => "inverted_range",
            ResolveError::RangeTooLong { .. } => "range_too_long",
        }
    }
}

/// A string that is not a canonical `"<Book> <chapter>:<verse>"` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a canonical verse identifier")]
pub struct ParseVerseIdError(pub String);

/// A strict-mode resolution abort, carrying the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("edge list line {line}: {source}")]
pub struct RecordError {
    pub line: usize,
    #[source]
    pub source: ResolveError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_code_message_includes_suggestion() {
        let err = ResolveError::UnknownBookCode {
            code: "Gn".to_string(),
            suggestion: Some("Gen".to_string()),
        };
        assert_eq!(err.to_string(), "unknown book code 'Gn' (did you mean 'Gen'?)");

        let bare = ResolveError::UnknownBookCode {
            code: "Xyz".to_string(),
            suggestion: None,
        };
        assert_eq!(bare.to_string(), "unknown book code 'Xyz'");
    }

    #[test]
    fn test_record_error_names_line() {
        let err = RecordError {
            line: 42,
            source: ResolveError::MalformedVote { raw: "x".to_string() },
        };
        assert_eq!(err.to_string(), "edge list line 42: vote count 'x' is not an integer");
    }
}
