use crate::aggregator::BookAdjacency;
use crate::logger::*;
use crate::models::*;
use crate::resolver::{ReferenceGraph, ResolutionReport};
use crate::schema::{self, validate_json};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const ADJACENCY_FILE: &str = "adjacency.json";
pub const RANKINGS_FILE: &str = "rankings.json";
pub const REFERENCES_FILE: &str = "references.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Writes the aggregate graph as JSON documents, each checked against its
/// generated schema before it lands on disk.
pub struct JsonExporter {
    output_base: PathBuf,
    logger: DiagnosticLogger,
    minify: bool,
    compress: bool,
    build_timestamp: String,
}

impl JsonExporter {
    pub fn new(output_dir: &Path, logger: DiagnosticLogger, minify: bool, compress: bool) -> Result<Self> {
        Self::with_timestamp(output_dir, logger, minify, compress, Utc::now())
    }

    pub fn with_timestamp(
        output_dir: &Path,
        logger: DiagnosticLogger,
        minify: bool,
        compress: bool,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
        schema::generate_schemas(&output_dir.join("schema"))
            .map_err(|e| anyhow::anyhow!("Schema generation failed: {}", e))?;

        Ok(JsonExporter {
            output_base: output_dir.to_path_buf(),
            logger,
            minify,
            compress,
            build_timestamp: timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        })
    }

    pub fn export_adjacency(&self, adjacency: &BookAdjacency) -> Result<String> {
        self.write_document(ADJACENCY_FILE, schema::ADJACENCY_SCHEMA, &adjacency.to_json())
    }

    pub fn export_rankings(&self, adjacency: &BookAdjacency, top_n: usize) -> Result<String> {
        self.write_document(RANKINGS_FILE, schema::RANKINGS_SCHEMA, &adjacency.rankings(top_n))
    }

    pub fn export_references(&self, graph: &ReferenceGraph) -> Result<String> {
        let references = ReferencesJson {
            schema_version: "1.0".to_string(),
            references: graph
                .iter()
                .map(|(source, targets)| ReferenceEntry {
                    source: source.clone(),
                    targets: targets.to_vec(),
                })
                .collect(),
        };
        self.write_document(REFERENCES_FILE, schema::REFERENCES_SCHEMA, &references)
    }

    /// Writes every document and finally a manifest recording input and
    /// output checksums. Returns the manifest path.
    pub fn export_all(
        &self,
        adjacency: &BookAdjacency,
        graph: &ReferenceGraph,
        report: &ResolutionReport,
        top_n: usize,
        min_votes: i64,
        source_checksums: BTreeMap<String, String>,
    ) -> Result<PathBuf> {
        let mut output_checksums = BTreeMap::new();
        output_checksums.insert(ADJACENCY_FILE.to_string(), self.export_adjacency(adjacency)?);
        output_checksums.insert(RANKINGS_FILE.to_string(), self.export_rankings(adjacency, top_n)?);
        output_checksums.insert(REFERENCES_FILE.to_string(), self.export_references(graph)?);

        let manifest = RunManifest {
            schema_version: "1.0".to_string(),
            build_timestamp: self.build_timestamp.clone(),
            min_votes,
            source_checksums,
            output_checksums,
            resolution: report.summary(),
            extensions: serde_json::json!({}),
        };

        let hash = self.write_document(MANIFEST_FILE, schema::MANIFEST_SCHEMA, &manifest)?;
        self.logger.info(format!("Manifest SHA-256: {}", hash));

        Ok(self.output_base.join(MANIFEST_FILE))
    }

    fn write_document<T: Serialize>(&self, file_name: &str, schema_name: &str, document: &T) -> Result<String> {
        let output_path = self.output_base.join(file_name);

        let json_str = if self.minify {
            serde_json::to_string(document)?
        } else {
            serde_json::to_string_pretty(document)?
        };

        let json_value: Value = serde_json::from_str(&json_str)?;
        let schema_path = self.output_base.join("schema").join(schema_name);
        if let Err(e) = validate_json(&json_value, &schema_path) {
            self.logger.warning(
                format!("Schema validation warning for {}: {}", file_name, e),
                Some(serde_json::json!({"file": file_name, "schema": schema_name})),
            );
        }

        fs::write(&output_path, &json_str)
            .with_context(|| format!("Failed to write {}", file_name))?;

        if self.compress {
            self.compress_json(&output_path)?;
        }

        let hash = Self::hash_json(&json_str);
        self.logger.info(format!(
            "Generated {} ({} bytes, SHA-256: {})",
            file_name,
            json_str.len(),
            hash
        ));

        Ok(hash)
    }

    fn compress_json(&self, json_path: &Path) -> Result<PathBuf> {
        let gz_path = json_path.with_extension("json.gz");

        let json_content = fs::read(json_path)
            .context("Failed to read JSON for compression")?;

        let mut encoder = GzEncoder::new(
            fs::File::create(&gz_path)
                .context("Failed to create compressed file")?,
            Compression::default(),
        );

        encoder
            .write_all(&json_content)
            .context("Failed to write compressed data")?;

        encoder
            .finish()
            .context("Failed to finalize compression")?;

        let compressed_size = fs::metadata(&gz_path)?.len();
        self.logger.info(format!(
            "Compressed {} -> {} bytes",
            json_content.len(),
            compressed_size
        ));

        Ok(gz_path)
    }

    pub fn hash_json(json: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// SHA-256 of each named input, keyed by name.
pub fn source_checksums(sources: &[(&str, &str)]) -> BTreeMap<String, String> {
    sources
        .iter()
        .map(|(name, content)| (name.to_string(), JsonExporter::hash_json(content)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::nodes::build_nodes;
    use crate::test_fixtures::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn exporter(dir: &Path, minify: bool, compress: bool) -> JsonExporter {
        let logger = DiagnosticLogger::new(&dir.join("logs")).unwrap();
        JsonExporter::new(&dir.join("out"), logger, minify, compress).unwrap()
    }

    #[test]
    fn test_export_all_writes_documents() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = exporter(temp_dir.path(), false, false);

        let (corpus, resolution) = sample_inputs();
        let set = build_nodes(&corpus, &resolution.graph);
        let adjacency = aggregate(&set.nodes, &corpus.book_names());
        let sources = source_checksums(&[("corpus", SAMPLE_CORPUS), ("crossrefs", SAMPLE_EDGE_LIST)]);

        let manifest_path = exporter
            .export_all(&adjacency, &resolution.graph, &resolution.report, 5, 1, sources)
            .unwrap();

        let out = temp_dir.path().join("out");
        let adjacency_json: AdjacencyJson =
            serde_json::from_str(&fs::read_to_string(out.join(ADJACENCY_FILE)).unwrap()).unwrap();
        assert_eq!(adjacency_json.books, vec!["Genesis", "Exodus", "I Samuel"]);
        assert_eq!(adjacency_json.matrix[0], vec![0, 1, 2]);

        let references: ReferencesJson =
            serde_json::from_str(&fs::read_to_string(out.join(REFERENCES_FILE)).unwrap()).unwrap();
        assert_eq!(references.references[0].source, VerseId::new("Genesis", 1, 1));
        assert_eq!(references.references[0].targets.len(), 3);

        let manifest: RunManifest =
            serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
        assert_eq!(manifest.output_checksums.len(), 3);
        assert_eq!(manifest.source_checksums.len(), 2);
        assert_eq!(manifest.resolution.rejected, 1);
        assert_eq!(
            manifest.output_checksums[ADJACENCY_FILE],
            JsonExporter::hash_json(&fs::read_to_string(out.join(ADJACENCY_FILE)).unwrap())
        );
    }

    #[test]
    fn test_exports_pass_schema_validation() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = exporter(temp_dir.path(), true, false);

        let (corpus, resolution) = sample_inputs();
        let set = build_nodes(&corpus, &resolution.graph);
        let adjacency = aggregate(&set.nodes, &corpus.book_names());
        exporter
            .export_all(&adjacency, &resolution.graph, &resolution.report, 5, 1, BTreeMap::new())
            .unwrap();

        assert_eq!(exporter.logger.warning_count(), 0);
    }

    #[test]
    fn test_gzip_side_files() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = exporter(temp_dir.path(), true, true);

        let (corpus, resolution) = example_inputs();
        let set = build_nodes(&corpus, &resolution.graph);
        let adjacency = aggregate(&set.nodes, &corpus.book_names());
        exporter.export_adjacency(&adjacency).unwrap();

        let out = temp_dir.path().join("out");
        let plain = fs::read_to_string(out.join(ADJACENCY_FILE)).unwrap();
        let mut decoded = String::new();
        GzDecoder::new(fs::File::open(out.join("adjacency.json.gz")).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, plain);
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(JsonExporter::hash_json("{}"), JsonExporter::hash_json("{}"));
        assert_ne!(JsonExporter::hash_json("{}"), JsonExporter::hash_json("[]"));
        assert_eq!(JsonExporter::hash_json("").len(), 64);
    }
}
