//! Grammar for the edge list's compact verse notation.
//!
//! ```text
//! reference := verse | verse "-" verse
//! verse     := code "." number "." number
//! code      := any non-empty run of characters other than "." and "-"
//! number    := [0-9]+   (value >= 1)
//! ```

use crate::error::{ResolveError, SpecErrorKind};

const RANGE_MARKER: char = '-';

/// A parsed `BookCode.Chapter.Verse` triple, still carrying the raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseSpec<'a> {
    pub code: &'a str,
    pub chapter: u32,
    pub verse: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSpec<'a> {
    Single(VerseSpec<'a>),
    Range {
        start: VerseSpec<'a>,
        end: VerseSpec<'a>,
    },
}

pub fn parse_verse_spec(spec: &str) -> Result<VerseSpec<'_>, ResolveError> {
    let spec = spec.trim();
    let fail = |kind| ResolveError::MalformedSpec {
        spec: spec.to_string(),
        kind,
    };

    if spec.is_empty() {
        return Err(fail(SpecErrorKind::Empty));
    }

    let parts: Vec<&str> = spec.split('.').collect();
    let &[code, chapter, verse] = parts.as_slice() else {
        return Err(fail(SpecErrorKind::WrongArity));
    };

    if code.is_empty() {
        return Err(fail(SpecErrorKind::EmptyBookCode));
    }
    let chapter = parse_number(chapter).ok_or_else(|| fail(SpecErrorKind::BadChapter))?;
    let verse = parse_number(verse).ok_or_else(|| fail(SpecErrorKind::BadVerse))?;
    if chapter == 0 || verse == 0 {
        return Err(fail(SpecErrorKind::ZeroNumber));
    }

    Ok(VerseSpec {
        code,
        chapter,
        verse,
    })
}

pub fn parse_reference_spec(spec: &str) -> Result<ReferenceSpec<'_>, ResolveError> {
    let spec = spec.trim();
    let mut pieces = spec.split(RANGE_MARKER);

    match (pieces.next(), pieces.next(), pieces.next()) {
        (Some(single), None, _) => Ok(ReferenceSpec::Single(parse_verse_spec(single)?)),
        (Some(start), Some(end), None) => Ok(ReferenceSpec::Range {
            start: parse_verse_spec(start)?,
            end: parse_verse_spec(end)?,
        }),
        _ => Err(ResolveError::MalformedSpec {
            spec: spec.to_string(),
            kind: SpecErrorKind::TooManyRangeMarkers,
        }),
    }
}

fn parse_number(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_kind(result: Result<ReferenceSpec<'_>, ResolveError>) -> SpecErrorKind {
        match result {
            Err(ResolveError::MalformedSpec { kind, .. }) => kind,
            other => panic!("expected MalformedSpec, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_single_verse() {
        let spec = parse_verse_spec("Gen.1.1").unwrap();
        assert_eq!(spec, VerseSpec { code: "Gen", chapter: 1, verse: 1 });

        let spec = parse_verse_spec(" 1Sam.17.45 ").unwrap();
        assert_eq!(spec.code, "1Sam");
        assert_eq!(spec.chapter, 17);
        assert_eq!(spec.verse, 45);
    }

    #[test]
    fn test_parse_range() {
        let spec = parse_reference_spec("Ps.89.11-Ps.89.12").unwrap();
        assert_eq!(
            spec,
            ReferenceSpec::Range {
                start: VerseSpec { code: "Ps", chapter: 89, verse: 11 },
                end: VerseSpec { code: "Ps", chapter: 89, verse: 12 },
            }
        );

        assert!(matches!(
            parse_reference_spec("Exod.20.3").unwrap(),
            ReferenceSpec::Single(VerseSpec { code: "Exod", chapter: 20, verse: 3 })
        ));
    }

    #[test]
    fn test_enumerated_failures() {
        assert_eq!(spec_kind(parse_reference_spec("")), SpecErrorKind::Empty);
        assert_eq!(spec_kind(parse_reference_spec("Gen.1")), SpecErrorKind::WrongArity);
        assert_eq!(spec_kind(parse_reference_spec("Gen.1.1.1")), SpecErrorKind::WrongArity);
        assert_eq!(spec_kind(parse_reference_spec(".1.1")), SpecErrorKind::EmptyBookCode);
        assert_eq!(spec_kind(parse_reference_spec("Gen.x.1")), SpecErrorKind::BadChapter);
        assert_eq!(spec_kind(parse_reference_spec("Gen.1.+2")), SpecErrorKind::BadVerse);
        assert_eq!(spec_kind(parse_reference_spec("Gen.0.1")), SpecErrorKind::ZeroNumber);
        assert_eq!(
            spec_kind(parse_reference_spec("Gen.1.1-Gen.1.2-Gen.1.3")),
            SpecErrorKind::TooManyRangeMarkers
        );
        assert_eq!(spec_kind(parse_reference_spec("Gen.1.1-")), SpecErrorKind::Empty);
    }

    #[test]
    fn test_overflowing_number_is_rejected() {
        let err = parse_verse_spec("Gen.1.99999999999").unwrap_err();
        assert!(matches!(err, ResolveError::MalformedSpec { kind: SpecErrorKind::BadVerse, .. }));
    }
}
