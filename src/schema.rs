use crate::models::*;
use schemars::schema_for;
use std::fs;
use std::path::Path;

pub const ADJACENCY_SCHEMA: &str = "adjacency-1.0.json";
pub const RANKINGS_SCHEMA: &str = "rankings-1.0.json";
pub const REFERENCES_SCHEMA: &str = "references-1.0.json";
pub const MANIFEST_SCHEMA: &str = "manifest-1.0.json";

/// Write a JSON Schema for every exported document into `schema_dir`.
pub fn generate_schemas(schema_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(schema_dir)?;

    let schemas = [
        (ADJACENCY_SCHEMA, schema_for!(AdjacencyJson)),
        (RANKINGS_SCHEMA, schema_for!(RankingsJson)),
        (REFERENCES_SCHEMA, schema_for!(ReferencesJson)),
        (MANIFEST_SCHEMA, schema_for!(RunManifest)),
    ];

    for (file_name, schema) in schemas {
        let json = serde_json::to_string_pretty(&schema)?;
        fs::write(schema_dir.join(file_name), json)?;
    }

    Ok(())
}

/// Validate JSON against schema
pub fn validate_json(json: &serde_json::Value, schema_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    use jsonschema::JSONSchema;

    let schema_content = fs::read_to_string(schema_path)?;
    let schema_json: serde_json::Value = serde_json::from_str(&schema_content)?;

    // The compiled schema borrows schema_json, so errors are collected here.
    let compiled = JSONSchema::compile(&schema_json)
        .map_err(|e| format!("Failed to compile schema: {}", e))?;

    let error_msgs: Vec<String> = match compiled.validate(json) {
        Ok(()) => return Ok(()),
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    };

    Err(format!("Validation error: {}", error_msgs.join("; ")).into())
}
