use crate::aggregator::{aggregate, BookAdjacency};
use crate::book_codes::NameMapping;
use crate::corpus::{Corpus, CorpusLoader};
use crate::logger::*;
use crate::nodes::{build_nodes, NodeSet};
use crate::resolver::{ReferenceResolver, Resolution};
use crate::resolver_config::ResolverConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Everything one run produces, handed read-only to exporters and reports.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub corpus: Corpus,
    pub resolution: Resolution,
    pub nodes: NodeSet,
    pub adjacency: BookAdjacency,
}

impl PipelineOutput {
    pub fn stats(&self) -> ProcessingStats {
        ProcessingStats {
            books: self.corpus.books().len(),
            chapters: self.corpus.chapter_count(),
            verses: self.corpus.verse_count(),
            edge_records: self.resolution.report.records,
            edges: self.resolution.report.edges,
            rejected_records: self.resolution.report.rejected.len(),
        }
    }
}

/// Runs the four stages in order: load corpus, resolve edge list, build
/// nodes, aggregate. Each stage is also callable on its own.
pub struct CrossReferencePipeline {
    pub loader: CorpusLoader,
    pub mapping: NameMapping,
    pub config: ResolverConfig,
    pub logger: DiagnosticLogger,
}

impl CrossReferencePipeline {
    pub fn new(config: ResolverConfig, log_dir: &Path) -> Result<Self> {
        let logger = DiagnosticLogger::new(log_dir)
            .context("Failed to create DiagnosticLogger")?;
        Self::with_logger(config, logger)
    }

    pub fn with_logger(config: ResolverConfig, logger: DiagnosticLogger) -> Result<Self> {
        Ok(CrossReferencePipeline {
            loader: CorpusLoader::new()
                .context("Failed to create CorpusLoader")?,
            mapping: NameMapping::kjv(),
            config,
            logger,
        })
    }

    pub fn load_corpus(&self, corpus_json: &str) -> Result<Corpus> {
        self.logger.info("Loading corpus...".to_string());

        let corpus = match self.loader.load(corpus_json) {
            Ok(corpus) => corpus,
            Err(e) => {
                self.logger.error(format!("Corpus rejected: {}", e), None);
                return Err(e).context("Failed to load corpus");
            }
        };

        self.logger.info(format!(
            "Loaded {} books, {} chapters, {} verses",
            corpus.books().len(),
            corpus.chapter_count(),
            corpus.verse_count()
        ));

        Ok(corpus)
    }

    pub fn resolve_references(&self, corpus: &Corpus, edge_list: &str) -> Result<Resolution> {
        self.logger.info(format!(
            "Resolving edge list (min votes {}, {:?} policy)...",
            self.config.effective_min_votes(),
            self.config.policy
        ));

        let books = corpus.book_set();
        let resolver = ReferenceResolver::new(&self.mapping, &books, &self.config);

        let resolution = match resolver.resolve(edge_list) {
            Ok(resolution) => resolution,
            Err(e) => {
                self.logger.error(
                    format!("Edge list rejected: {}", e),
                    Some(serde_json::json!({"line": e.line, "kind": e.source.kind()})),
                );
                return Err(e).context("Failed to resolve edge list");
            }
        };

        let report = &resolution.report;
        for rejected in &report.rejected {
            self.logger.warning(
                format!("Skipped edge list line {}: {}", rejected.line, rejected.error),
                Some(serde_json::json!({
                    "line": rejected.line,
                    "kind": rejected.error.kind(),
                    "raw": rejected.raw,
                })),
            );
        }

        self.logger.info(format!(
            "Resolution summary: {} records, {} accepted, {} below threshold, {} rejected; {} edges from {} sources ({} duplicates dropped)",
            report.records,
            report.accepted,
            report.below_threshold,
            report.rejected.len(),
            report.edges,
            resolution.graph.source_count(),
            report.duplicate_edges
        ));

        if !report.rejected.is_empty() {
            let kinds: Vec<String> = report
                .rejections_by_kind()
                .into_iter()
                .map(|(kind, count)| format!("{} {}", count, kind))
                .collect();
            self.logger.warning(
                format!("{} records rejected: {}", report.rejected.len(), kinds.join(", ")),
                None,
            );
        }

        Ok(resolution)
    }

    pub fn build_nodes(&self, corpus: &Corpus, resolution: &Resolution) -> NodeSet {
        let nodes = build_nodes(corpus, &resolution.graph);

        self.logger.info(format!(
            "Built {} verse nodes, {} with references ({} references total)",
            nodes.nodes.len(),
            nodes.referencing_nodes(),
            nodes.reference_count()
        ));

        if !nodes.unmatched_sources.is_empty() {
            let sample: Vec<String> = nodes
                .unmatched_sources
                .iter()
                .take(10)
                .map(|id| id.to_string())
                .collect();
            self.logger.warning(
                format!(
                    "{} resolved sources have no corpus verse",
                    nodes.unmatched_sources.len()
                ),
                Some(serde_json::json!({"sample": sample})),
            );
        }

        nodes
    }

    pub fn aggregate(&self, corpus: &Corpus, nodes: &NodeSet) -> BookAdjacency {
        let adjacency = aggregate(&nodes.nodes, &corpus.book_names());

        self.logger.info(format!(
            "Aggregated {} cross-book edges over {} books ({} same-book edges excluded)",
            adjacency.total_edges(),
            adjacency.books().len(),
            adjacency.same_book_edges()
        ));

        if adjacency.unknown_book_edges() > 0 {
            self.logger.warning(
                format!(
                    "{} references point at books outside the matrix and were excluded",
                    adjacency.unknown_book_edges()
                ),
                None,
            );
        }

        adjacency
    }

    pub fn run(&self, corpus_json: &str, edge_list: &str) -> Result<PipelineOutput> {
        let corpus = self.load_corpus(corpus_json)?;
        let resolution = self.resolve_references(&corpus, edge_list)?;
        let nodes = self.build_nodes(&corpus, &resolution);
        let adjacency = self.aggregate(&corpus, &nodes);

        Ok(PipelineOutput {
            corpus,
            resolution,
            nodes,
            adjacency,
        })
    }

    pub fn finalize(&self, stats: ProcessingStats) -> Result<DiagnosticReport> {
        self.logger
            .generate_report(stats)
            .context("Failed to generate diagnostic report")
    }
}
