use crate::models::*;
use std::collections::HashMap;

/// Directed book-to-book edge counts over a fixed book axis.
///
/// Row `i`, column `j` counts verse-level references from book `i` into book
/// `j`. The diagonal is always zero: same-book references are counted in
/// `same_book` instead. References into a book missing from the axis cannot
/// be placed and are counted in `unknown_book`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookAdjacency {
    books: Vec<String>,
    index: HashMap<String, usize>,
    counts: Vec<u64>,
    out_degree: Vec<u64>,
    in_degree: Vec<u64>,
    same_book: u64,
    unknown_book: u64,
}

/// Single pass over every (node, reference) pair.
pub fn aggregate(nodes: &[VerseNode], books: &[String]) -> BookAdjacency {
    let n = books.len();
    let index: HashMap<String, usize> = books
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect();

    let mut adjacency = BookAdjacency {
        books: books.to_vec(),
        index,
        counts: vec![0; n * n],
        out_degree: vec![0; n],
        in_degree: vec![0; n],
        same_book: 0,
        unknown_book: 0,
    };

    for node in nodes {
        let source = adjacency.index.get(node.book.as_str()).copied();
        for reference in &node.references {
            let target = adjacency.index.get(reference.book()).copied();
            match (source, target) {
                (Some(i), Some(j)) if i == j => adjacency.same_book += 1,
                (Some(i), Some(j)) => {
                    adjacency.counts[i * n + j] += 1;
                    adjacency.out_degree[i] += 1;
                    adjacency.in_degree[j] += 1;
                }
                _ => adjacency.unknown_book += 1,
            }
        }
    }

    adjacency
}

impl BookAdjacency {
    pub fn books(&self) -> &[String] {
        &self.books
    }

    #[cfg(test)]
    pub fn count(&self, source: &str, target: &str) -> Option<u64> {
        let i = *self.index.get(source)?;
        let j = *self.index.get(target)?;
        Some(self.counts[i * self.books.len() + j])
    }

    pub fn row(&self, i: usize) -> &[u64] {
        let n = self.books.len();
        &self.counts[i * n..(i + 1) * n]
    }

    pub fn matrix(&self) -> Vec<Vec<u64>> {
        (0..self.books.len()).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn out_degree(&self, book: &str) -> Option<u64> {
        self.index.get(book).map(|&i| self.out_degree[i])
    }

    pub fn in_degree(&self, book: &str) -> Option<u64> {
        self.index.get(book).map(|&i| self.in_degree[i])
    }

    pub fn total_edges(&self) -> u64 {
        self.out_degree.iter().sum()
    }

    pub fn same_book_edges(&self) -> u64 {
        self.same_book
    }

    pub fn unknown_book_edges(&self) -> u64 {
        self.unknown_book
    }

    /// Books by incoming references, highest first. Ties keep corpus order;
    /// books with no incoming references are left out.
    pub fn most_referenced(&self, limit: usize) -> Vec<BookCount> {
        self.rank(&self.in_degree, limit)
    }

    /// Books by outgoing references, highest first.
    pub fn most_referencing(&self, limit: usize) -> Vec<BookCount> {
        self.rank(&self.out_degree, limit)
    }

    fn rank(&self, degrees: &[u64], limit: usize) -> Vec<BookCount> {
        let mut ranked: Vec<BookCount> = self
            .books
            .iter()
            .zip(degrees)
            .filter(|(_, &count)| count > 0)
            .map(|(name, &count)| BookCount {
                name: name.clone(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(limit);
        ranked
    }

    /// Strongest book pairs, highest first. Ties keep row-major corpus order.
    pub fn top_connections(&self, limit: usize) -> Vec<BookConnection> {
        let n = self.books.len();
        let mut pairs: Vec<BookConnection> = self
            .counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(cell, &count)| BookConnection {
                source: self.books[cell / n].clone(),
                target: self.books[cell % n].clone(),
                count,
            })
            .collect();
        pairs.sort_by(|a, b| b.count.cmp(&a.count));
        pairs.truncate(limit);
        pairs
    }

    pub fn to_json(&self) -> AdjacencyJson {
        AdjacencyJson {
            schema_version: "1.0".to_string(),
            books: self.books.clone(),
            matrix: self.matrix(),
            out_degree: self.out_degree.clone(),
            in_degree: self.in_degree.clone(),
            excluded_edges: ExcludedEdges {
                same_book: self.same_book,
                unknown_book: self.unknown_book,
            },
        }
    }

    pub fn rankings(&self, limit: usize) -> RankingsJson {
        RankingsJson {
            schema_version: "1.0".to_string(),
            most_referenced: self.most_referenced(limit),
            most_referencing: self.most_referencing(limit),
            top_connections: self.top_connections(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::build_nodes;
    use crate::test_fixtures::*;
    use proptest::prelude::*;

    fn node(book: &str, chapter: u32, verse: u32, references: &[(&str, u32, u32)]) -> VerseNode {
        VerseNode {
            book: book.to_string(),
            chapter,
            verse,
            text: String::new(),
            references: references
                .iter()
                .map(|&(b, c, v)| VerseId::new(b, c, v))
                .collect(),
        }
    }

    fn books(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_end_to_end_example_matrix() {
        let (corpus, resolution) = example_inputs();
        let set = build_nodes(&corpus, &resolution.graph);
        let adjacency = aggregate(&set.nodes, &corpus.book_names());

        assert_eq!(adjacency.count("Genesis", "Exodus"), Some(1));
        assert_eq!(adjacency.count("Genesis", "Genesis"), Some(0));
        assert_eq!(adjacency.out_degree("Genesis"), Some(1));
        assert_eq!(adjacency.in_degree("Exodus"), Some(1));
        assert_eq!(adjacency.same_book_edges(), 1);
        assert_eq!(adjacency.matrix(), vec![vec![0, 1], vec![0, 0]]);
    }

    #[test]
    fn test_self_loops_excluded() {
        let nodes = vec![node("Genesis", 1, 1, &[("Genesis", 2, 4), ("Genesis", 1, 27)])];
        let adjacency = aggregate(&nodes, &books(&["Genesis", "Exodus"]));

        assert_eq!(adjacency.count("Genesis", "Genesis"), Some(0));
        assert_eq!(adjacency.out_degree("Genesis"), Some(0));
        assert_eq!(adjacency.in_degree("Genesis"), Some(0));
        assert_eq!(adjacency.same_book_edges(), 2);
        assert_eq!(adjacency.total_edges(), 0);
    }

    #[test]
    fn test_unknown_target_book_is_counted_not_fatal() {
        let nodes = vec![node("Genesis", 1, 1, &[("Hezekiah", 1, 1), ("Exodus", 3, 14)])];
        let adjacency = aggregate(&nodes, &books(&["Genesis", "Exodus"]));

        assert_eq!(adjacency.unknown_book_edges(), 1);
        assert_eq!(adjacency.total_edges(), 1);
        assert_eq!(adjacency.count("Genesis", "Hezekiah"), None);
    }

    #[test]
    fn test_rankings() {
        let nodes = vec![
            node("Genesis", 1, 1, &[("Exodus", 1, 1), ("Psalms", 33, 6)]),
            node("Exodus", 3, 14, &[("Psalms", 90, 2)]),
            node("Psalms", 104, 30, &[("Genesis", 1, 2)]),
            node("Psalms", 33, 9, &[("Genesis", 1, 3), ("Psalms", 33, 6)]),
        ];
        let adjacency = aggregate(&nodes, &books(&["Genesis", "Exodus", "Psalms", "Ruth"]));

        let referenced = adjacency.most_referenced(10);
        assert_eq!(
            referenced,
            vec![
                BookCount { name: "Genesis".to_string(), count: 2 },
                BookCount { name: "Psalms".to_string(), count: 2 },
                BookCount { name: "Exodus".to_string(), count: 1 },
            ]
        );

        let referencing = adjacency.most_referencing(2);
        assert_eq!(referencing.len(), 2);
        assert_eq!(referencing[0].name, "Genesis");
        assert_eq!(referencing[1].name, "Psalms");

        let top = adjacency.top_connections(1);
        assert_eq!(
            top,
            vec![BookConnection {
                source: "Psalms".to_string(),
                target: "Genesis".to_string(),
                count: 2
            }]
        );
        assert_eq!(adjacency.top_connections(100).len(), 4);
    }

    #[test]
    fn test_to_json_shape() {
        let nodes = vec![node("Genesis", 1, 1, &[("Exodus", 1, 1)])];
        let json = aggregate(&nodes, &books(&["Genesis", "Exodus"])).to_json();

        assert_eq!(json.books, vec!["Genesis", "Exodus"]);
        assert_eq!(json.matrix, vec![vec![0, 1], vec![0, 0]]);
        assert_eq!(json.out_degree, vec![1, 0]);
        assert_eq!(json.in_degree, vec![0, 1]);
        assert_eq!(json.excluded_edges, ExcludedEdges::default());
    }

    const AXIS: [&str; 4] = ["Genesis", "Exodus", "Psalms", "Isaiah"];

    fn arb_nodes() -> impl Strategy<Value = Vec<VerseNode>> {
        prop::collection::vec(
            (0usize..4, prop::collection::vec((0usize..4, 1u32..20, 1u32..20), 0..6)),
            0..30,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (book, refs))| VerseNode {
                    book: AXIS[book].to_string(),
                    chapter: 1,
                    verse: i as u32 + 1,
                    text: String::new(),
                    references: refs
                        .into_iter()
                        .map(|(b, c, v)| VerseId::new(AXIS[b], c, v))
                        .collect(),
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn degrees_match_matrix_sums(nodes in arb_nodes()) {
            let axis = books(&AXIS);
            let adjacency = aggregate(&nodes, &axis);

            for (i, book) in axis.iter().enumerate() {
                let row_sum: u64 = adjacency.row(i).iter().sum();
                let col_sum: u64 = (0..axis.len()).map(|s| adjacency.row(s)[i]).sum();
                prop_assert_eq!(adjacency.out_degree(book), Some(row_sum));
                prop_assert_eq!(adjacency.in_degree(book), Some(col_sum));
                prop_assert_eq!(adjacency.row(i)[i], 0);
            }

            let total: usize = nodes.iter().map(|n| n.references.len()).sum();
            prop_assert_eq!(adjacency.total_edges() + adjacency.same_book_edges(), total as u64);
        }
    }
}
