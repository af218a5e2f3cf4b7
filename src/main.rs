mod aggregator;
mod book_codes;
mod cli;
mod corpus;
mod error;
mod export;
mod logger;
mod models;
mod nodes;
mod pipeline;
mod resolver;
mod resolver_config;
mod schema;
mod spec_parser;
mod stats_report;
#[cfg(test)]
mod test_fixtures;

use crate::cli::Cli;
use crate::export::JsonExporter;
use crate::models::VerseId;
use crate::pipeline::CrossReferencePipeline;
use crate::resolver_config::ResolverConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("Bible cross-reference graph starting...");

    let log_dir = cli.log_dir.as_deref().unwrap_or_else(|| Path::new("logs"));
    let config = ResolverConfig::new(cli.min_votes, cli.strict, cli.top);
    let pipeline = CrossReferencePipeline::new(config, log_dir)?;

    println!("Log directory: {:?} (run {})", log_dir, pipeline.logger.run_id());

    let corpus_json = fs::read_to_string(&cli.corpus)
        .with_context(|| format!("Failed to read corpus: {:?}", cli.corpus))?;
    let edge_list = fs::read_to_string(&cli.crossrefs)
        .with_context(|| format!("Failed to read cross-references: {:?}", cli.crossrefs))?;

    println!("Resolving cross-references...");
    let output = pipeline.run(&corpus_json, &edge_list)?;

    let report = &output.resolution.report;
    println!(
        "{} records: {} accepted, {} below threshold, {} rejected",
        report.records,
        report.accepted,
        report.below_threshold,
        report.rejected.len()
    );
    for (kind, count) in report.rejections_by_kind() {
        println!("  {:25} {}", kind, count);
    }
    println!(
        "{} edges from {} verses ({} unmatched sources)",
        report.edges,
        output.nodes.referencing_nodes(),
        output.nodes.unmatched_sources.len()
    );

    if let Some(raw_id) = &cli.show_verse {
        let id: VerseId = raw_id
            .parse()
            .with_context(|| format!("Invalid --show-verse value: {}", raw_id))?;
        match output.nodes.find(&id) {
            Some(node) => {
                println!("\n{}", node);
                let adjacency = &output.adjacency;
                if let (Some(outgoing), Some(incoming)) =
                    (adjacency.out_degree(&node.book), adjacency.in_degree(&node.book))
                {
                    println!(
                        "{}: {} outgoing, {} incoming cross-book references",
                        node.book, outgoing, incoming
                    );
                }
            }
            None => eprintln!("Warning: verse not found in corpus: {}", id),
        }
    }

    println!("\n{}", stats_report::format_connection_stats(&output.adjacency, pipeline.config.top_n));

    if let Some(out_dir) = &cli.out {
        println!("Exporting JSON to {:?}...", out_dir);
        let exporter = JsonExporter::new(out_dir, pipeline.logger.clone(), cli.minify_json, cli.gzip_json)
            .context("Failed to create JSON exporter")?;
        let sources = export::source_checksums(&[
            ("corpus", corpus_json.as_str()),
            ("crossrefs", edge_list.as_str()),
        ]);
        let manifest_path = exporter
            .export_all(
                &output.adjacency,
                &output.resolution.graph,
                report,
                pipeline.config.top_n,
                pipeline.config.effective_min_votes(),
                sources,
            )
            .context("Failed to export JSON documents")?;
        println!("Manifest: {:?}", manifest_path);
    }

    let diagnostics = pipeline.finalize(output.stats())?;
    let removed = pipeline
        .logger
        .rotate_logs(cli.keep_logs)
        .context("Failed to rotate logs")?;

    println!("Done!");
    println!(
        "Errors: {}, Warnings: {} (removed {} old logs)",
        diagnostics.summary.errors, diagnostics.summary.warnings, removed
    );

    Ok(())
}
