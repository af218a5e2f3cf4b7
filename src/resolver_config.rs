/// What to do with an edge-list record that fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Skip the record, keep going, report it at the end.
    Lenient,
    /// Abort resolution on the first bad record.
    Strict,
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub min_votes: i64,
    pub policy: ErrorPolicy,
    pub top_n: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            min_votes: 1,
            policy: ErrorPolicy::Lenient,
            top_n: 20,
        }
    }
}

impl ResolverConfig {
    pub fn new(min_votes: i64, strict: bool, top_n: usize) -> Self {
        ResolverConfig {
            min_votes,
            policy: if strict {
                ErrorPolicy::Strict
            } else {
                ErrorPolicy::Lenient
            },
            top_n,
        }
    }

    /// Vote threshold actually applied. Never below 1, so a record with zero
    /// or negative votes can never become an edge.
    pub fn effective_min_votes(&self) -> i64 {
        self.min_votes.max(1)
    }
}
