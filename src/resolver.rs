use crate::book_codes::NameMapping;
use crate::error::{RecordError, ResolveError};
use crate::models::*;
use crate::resolver_config::{ErrorPolicy, ResolverConfig};
use crate::spec_parser::{parse_reference_spec, parse_verse_spec, ReferenceSpec, VerseSpec};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Longest range a single record may expand to. Psalm 119 has 176 verses,
/// the most of any chapter.
pub const MAX_RANGE_VERSES: u32 = 176;

#[derive(Debug, Clone, Default, PartialEq)]
struct TargetList {
    ordered: Vec<VerseId>,
    seen: HashSet<VerseId>,
}

/// Resolved verse-level graph: source verse to its distinct targets, both in
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceGraph {
    sources: Vec<VerseId>,
    targets: HashMap<VerseId, TargetList>,
}

impl ReferenceGraph {
    /// Appends `target` to `source`'s list unless already present.
    /// Returns whether the edge was new.
    fn insert(&mut self, source: &VerseId, target: VerseId) -> bool {
        if !self.targets.contains_key(source) {
            self.sources.push(source.clone());
        }
        let list = self.targets.entry(source.clone()).or_default();
        if !list.seen.insert(target.clone()) {
            return false;
        }
        list.ordered.push(target);
        true
    }

    pub fn targets_of(&self, source: &VerseId) -> Option<&[VerseId]> {
        self.targets.get(source).map(|list| list.ordered.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VerseId, &[VerseId])> + '_ {
        self.sources
            .iter()
            .filter_map(move |s| self.targets_of(s).map(|t| (s, t)))
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    #[cfg(test)]
    pub fn edge_count(&self) -> usize {
        self.targets.values().map(|list| list.ordered.len()).sum()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// 1-based line number in the edge list, header included.
    pub line: usize,
    pub raw: String,
    pub error: ResolveError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionReport {
    pub records: usize,
    pub accepted: usize,
    pub below_threshold: usize,
    pub edges: usize,
    pub duplicate_edges: usize,
    pub rejected: Vec<RejectedRecord>,
}

impl ResolutionReport {
    pub fn rejections_by_kind(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for rejected in &self.rejected {
            *counts.entry(rejected.error.kind().to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> ResolutionSummary {
        ResolutionSummary {
            records: self.records,
            accepted: self.accepted,
            below_threshold: self.below_threshold,
            rejected: self.rejected.len(),
            edges: self.edges,
            duplicate_edges: self.duplicate_edges,
            rejections_by_kind: self.rejections_by_kind(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub graph: ReferenceGraph,
    pub report: ResolutionReport,
}

enum RecordOutcome {
    BelowThreshold,
    Accepted {
        source: VerseId,
        targets: Vec<VerseId>,
    },
}

/// Every verse of a same-chapter range, both ends included.
pub fn expand_range(book: &str, chapter: u32, start: u32, end: u32) -> Vec<VerseId> {
    (start..=end)
        .map(|verse| VerseId::new(book, chapter, verse))
        .collect()
}

pub struct ReferenceResolver<'a> {
    mapping: &'a NameMapping,
    books: &'a HashSet<String>,
    config: &'a ResolverConfig,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(mapping: &'a NameMapping, books: &'a HashSet<String>, config: &'a ResolverConfig) -> Self {
        ReferenceResolver {
            mapping,
            books,
            config,
        }
    }

    /// Resolves a tab-separated edge list. The first line is a header and is
    /// skipped; blank lines are ignored.
    pub fn resolve(&self, edge_list: &str) -> Result<Resolution, RecordError> {
        let mut resolution = Resolution::default();

        for (idx, line) in edge_list.lines().enumerate().skip(1) {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let report = &mut resolution.report;
            report.records += 1;

            match self.resolve_record(line) {
                Ok(RecordOutcome::BelowThreshold) => report.below_threshold += 1,
                Ok(RecordOutcome::Accepted { source, targets }) => {
                    report.accepted += 1;
                    for target in targets {
                        if resolution.graph.insert(&source, target) {
                            report.edges += 1;
                        } else {
                            report.duplicate_edges += 1;
                        }
                    }
                }
                Err(error) => match self.config.policy {
                    ErrorPolicy::Strict => {
                        return Err(RecordError {
                            line: idx + 1,
                            source: error,
                        })
                    }
                    ErrorPolicy::Lenient => report.rejected.push(RejectedRecord {
                        line: idx + 1,
                        raw: line.to_string(),
                        error,
                    }),
                },
            }
        }

        Ok(resolution)
    }

    fn resolve_record(&self, line: &str) -> Result<RecordOutcome, ResolveError> {
        let fields: Vec<&str> = line.split('\t').collect();
        let &[verse_field, reference_field, vote_field] = fields.as_slice() else {
            return Err(ResolveError::MalformedRecord { found: fields.len() });
        };

        let votes: i64 = vote_field
            .trim()
            .parse()
            .map_err(|_| ResolveError::MalformedVote {
                raw: vote_field.to_string(),
            })?;
        if votes < self.config.effective_min_votes() {
            return Ok(RecordOutcome::BelowThreshold);
        }

        // Every lookup happens before anything is returned, so a bad target
        // code never leaves a partial set of edges behind.
        let source = self.canonical(parse_verse_spec(verse_field)?)?;

        let targets = match parse_reference_spec(reference_field)? {
            ReferenceSpec::Single(target) => vec![self.canonical(target)?],
            ReferenceSpec::Range { start, end } => {
                let start_book = self.book_for(start.code)?;
                let end_book = self.book_for(end.code)?;
                if start_book != end_book || start.chapter != end.chapter {
                    return Err(ResolveError::RangeSpansBoundary {
                        spec: reference_field.trim().to_string(),
                    });
                }
                if end.verse < start.verse {
                    return Err(ResolveError::InvertedRange {
                        spec: reference_field.trim().to_string(),
                    });
                }
                if end.verse - start.verse >= MAX_RANGE_VERSES {
                    return Err(ResolveError::RangeTooLong {
                        spec: reference_field.trim().to_string(),
                        verses: u64::from(end.verse - start.verse) + 1,
                    });
                }
                expand_range(start_book, start.chapter, start.verse, end.verse)
            }
        };

        Ok(RecordOutcome::Accepted { source, targets })
    }

    fn canonical(&self, spec: VerseSpec<'_>) -> Result<VerseId, ResolveError> {
        let book = self.book_for(spec.code)?;
        Ok(VerseId::new(book, spec.chapter, spec.verse))
    }

    fn book_for(&self, code: &str) -> Result<&'static str, ResolveError> {
        let book = self
            .mapping
            .book_name(code)
            .ok_or_else(|| ResolveError::UnknownBookCode {
                code: code.to_string(),
                suggestion: self.mapping.suggest(code).map(str::to_string),
            })?;

        if !self.books.contains(book) {
            return Err(ResolveError::BookNotInCorpus {
                code: code.to_string(),
                book: book.to_string(),
            });
        }

        Ok(book)
    }
}
