use crate::corpus::Corpus;
use crate::models::*;
use crate::resolver::ReferenceGraph;

#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    /// One node per corpus verse, in corpus book order then verse order.
    pub nodes: Vec<VerseNode>,
    /// Resolved sources with no matching corpus verse; their references
    /// cannot be attached to any node.
    pub unmatched_sources: Vec<VerseId>,
}

impl NodeSet {
    pub fn referencing_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| !n.references.is_empty()).count()
    }

    pub fn reference_count(&self) -> usize {
        self.nodes.iter().map(|n| n.references.len()).sum()
    }

    pub fn find(&self, id: &VerseId) -> Option<&VerseNode> {
        self.nodes
            .iter()
            .find(|n| n.book == id.book() && n.chapter == id.chapter() && n.verse == id.verse())
    }
}

/// Joins corpus verses with their resolved references by verse id.
pub fn build_nodes(corpus: &Corpus, graph: &ReferenceGraph) -> NodeSet {
    let nodes = corpus
        .book_names()
        .iter()
        .filter_map(|book| corpus.verses_of(book))
        .flatten()
        .map(|(id, text)| {
            let references = graph
                .targets_of(&id)
                .map(<[VerseId]>::to_vec)
                .unwrap_or_default();
            VerseNode {
                book: id.book().to_string(),
                chapter: id.chapter(),
                verse: id.verse(),
                text: text.to_string(),
                references,
            }
        })
        .collect();

    let unmatched_sources = graph
        .iter()
        .map(|(source, _)| source)
        .filter(|source| !corpus.contains_verse(source))
        .cloned()
        .collect();

    NodeSet {
        nodes,
        unmatched_sources,
    }
}
