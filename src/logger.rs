use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use walkdir::WalkDir;

const LOG_PREFIX: &str = "run-";
const LOG_SUFFIX: &str = ".jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub run_id: String,
    pub timestamp: String,
    pub summary: ReportSummary,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub processed: ProcessingStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProcessingStats {
    pub books: usize,
    pub chapters: usize,
    pub verses: usize,
    pub edge_records: usize,
    pub edges: usize,
    pub rejected_records: usize,
}

struct LoggerState {
    file: Option<BufWriter<File>>,
    entries: Vec<LogEntry>,
    errors: usize,
    warnings: usize,
}

/// Run log written as one JSON object per line, with in-memory counters for
/// the end-of-run report. Clones share the same file and counters.
#[derive(Clone)]
pub struct DiagnosticLogger {
    log_dir: PathBuf,
    run_id: String,
    state: Arc<Mutex<LoggerState>>,
}

impl DiagnosticLogger {
    pub fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

        let run_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();
        let log_file_path = log_dir.join(format!("{}{}{}", LOG_PREFIX, run_id, LOG_SUFFIX));

        let file = BufWriter::new(
            File::create(&log_file_path)
                .with_context(|| format!("Failed to create log file: {:?}", log_file_path))?,
        );

        Ok(DiagnosticLogger {
            log_dir: log_dir.to_path_buf(),
            run_id,
            state: Arc::new(Mutex::new(LoggerState {
                file: Some(file),
                entries: Vec::new(),
                errors: 0,
                warnings: 0,
            })),
        })
    }

    fn state(&self) -> MutexGuard<'_, LoggerState> {
        // A panic while logging must not silence the rest of the run.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn log(&self, level: LogLevel, message: String, context: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            level,
            message,
            context,
        };

        let mut state = self.state();
        match level {
            LogLevel::Error => state.errors += 1,
            LogLevel::Warning => state.warnings += 1,
            LogLevel::Info => {}
        }

        if let Some(file) = state.file.as_mut() {
            if let Ok(json) = serde_json::to_string(&entry) {
                let _ = writeln!(file, "{}", json);
            }
        }
        state.entries.push(entry);
    }

    pub fn info(&self, message: String) {
        self.log(LogLevel::Info, message, None);
    }

    pub fn warning(&self, message: String, context: Option<serde_json::Value>) {
        self.log(LogLevel::Warning, message, context);
    }

    pub fn error(&self, message: String, context: Option<serde_json::Value>) {
        self.log(LogLevel::Error, message, context);
    }

    #[cfg(test)]
    pub fn error_count(&self) -> usize {
        self.state().errors
    }

    pub fn warning_count(&self) -> usize {
        self.state().warnings
    }

    pub fn generate_report(&self, stats: ProcessingStats) -> Result<DiagnosticReport> {
        let mut state = self.state();
        if let Some(file) = state.file.as_mut() {
            file.flush()
                .context("Failed to flush log file before generating report")?;
        }

        Ok(DiagnosticReport {
            run_id: self.run_id.clone(),
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            summary: ReportSummary {
                errors: state.errors,
                warnings: state.warnings,
                processed: stats,
            },
            entries: state.entries.clone(),
        })
    }

    /// Deletes the oldest run logs so that at most `max_runs` remain.
    pub fn rotate_logs(&self, max_runs: usize) -> Result<usize> {
        let mut run_files: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();

        for entry in WalkDir::new(&self.log_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let is_run_log = entry
                .file_name()
                .to_str()
                .map_or(false, |name| name.starts_with(LOG_PREFIX) && name.ends_with(LOG_SUFFIX));
            if !is_run_log {
                continue;
            }
            if let Some(modified) = entry.metadata().ok().and_then(|m| m.modified().ok()) {
                run_files.push((entry.path().to_path_buf(), modified.into()));
            }
        }

        if run_files.len() <= max_runs {
            return Ok(0);
        }

        run_files.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        let to_delete = run_files.len() - max_runs;
        for (path, _) in run_files.iter().take(to_delete) {
            fs::remove_file(path)
                .with_context(|| format!("Failed to delete old log file: {:?}", path))?;
        }

        Ok(to_delete)
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

impl Drop for LoggerState {
    fn drop(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
    }
}
