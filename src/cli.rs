use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bible-crossref-graph")]
#[command(about = "Resolve Bible cross-references and aggregate them into a book-to-book graph", long_about = None)]
pub struct Cli {
    #[arg(long, help = "Hierarchical corpus JSON (books → chapters → verses)")]
    pub corpus: PathBuf,

    #[arg(long, help = "Tab-separated cross-reference edge list")]
    pub crossrefs: PathBuf,

    #[arg(long, help = "Export directory for JSON documents (skipped when absent)")]
    pub out: Option<PathBuf>,

    #[arg(long, default_value_t = 1, allow_negative_numbers = true, help = "Minimum votes for a record to become an edge (clamped to at least 1)")]
    pub min_votes: i64,

    #[arg(long, help = "Abort on the first edge-list record that fails to resolve")]
    pub strict: bool,

    #[arg(long, default_value_t = 20, help = "Number of entries in each ranking")]
    pub top: usize,

    #[arg(long, help = "Minify JSON output")]
    pub minify_json: bool,

    #[arg(long, help = "Compress JSON with gzip")]
    pub gzip_json: bool,

    #[arg(long, help = "Log directory")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 10, help = "Number of run logs to keep")]
    pub keep_logs: usize,

    #[arg(long, value_name = "VERSE_ID", help = "Print one verse node, e.g. \"Genesis 1:1\"")]
    pub show_verse: Option<String>,
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }
}
