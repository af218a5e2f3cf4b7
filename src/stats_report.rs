use crate::aggregator::BookAdjacency;

/// Plain-text tables of the most connected books and book pairs.
pub fn format_connection_stats(adjacency: &BookAdjacency, top_n: usize) -> String {
    let mut out = format!("=== TOP {} MOST REFERENCED BOOKS ===\n", top_n);
    for entry in adjacency.most_referenced(top_n) {
        out.push_str(&format!("{:25} {:5} incoming references\n", entry.name, entry.count));
    }

    out.push_str(&format!("\n=== TOP {} BOOKS WITH MOST OUTGOING REFERENCES ===\n", top_n));
    for entry in adjacency.most_referencing(top_n) {
        out.push_str(&format!("{:25} {:5} outgoing references\n", entry.name, entry.count));
    }

    out.push_str(&format!("\n=== TOP {} BOOK-TO-BOOK CONNECTIONS ===\n", top_n));
    for pair in adjacency.top_connections(top_n) {
        out.push_str(&format!(
            "{:20} → {:20} : {:4} references\n",
            pair.source, pair.target, pair.count
        ));
    }

    out
}
