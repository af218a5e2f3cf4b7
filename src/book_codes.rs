use std::collections::HashMap;
use strsim::normalized_levenshtein;

/// Edge-list book codes paired with the book names used by the KJV corpus.
static KJV_BOOK_CODES: &[(&str, &str)] = &[
    ("Gen", "Genesis"), ("Exod", "Exodus"), ("Lev", "Leviticus"),
    ("Num", "Numbers"), ("Deut", "Deuteronomy"), ("Josh", "Joshua"),
    ("Judg", "Judges"), ("Ruth", "Ruth"), ("1Sam", "I Samuel"),
    ("2Sam", "II Samuel"), ("1Kgs", "I Kings"), ("2Kgs", "II Kings"),
    ("1Chr", "I Chronicles"), ("2Chr", "II Chronicles"), ("Ezra", "Ezra"),
    ("Neh", "Nehemiah"), ("Esth", "Esther"), ("Job", "Job"),
    ("Ps", "Psalms"), ("Prov", "Proverbs"), ("Eccl", "Ecclesiastes"),
    ("Song", "Song of Solomon"), ("Isa", "Isaiah"), ("Jer", "Jeremiah"),
    ("Lam", "Lamentations"), ("Ezek", "Ezekiel"), ("Dan", "Daniel"),
    ("Hos", "Hosea"), ("Joel", "Joel"), ("Amos", "Amos"),
    ("Obad", "Obadiah"), ("Jonah", "Jonah"), ("Mic", "Micah"),
    ("Nah", "Nahum"), ("Hab", "Habakkuk"), ("Zeph", "Zephaniah"),
    ("Hag", "Haggai"), ("Zech", "Zechariah"), ("Mal", "Malachi"),
    ("Matt", "Matthew"), ("Mark", "Mark"), ("Luke", "Luke"),
    ("John", "John"), ("Acts", "Acts"), ("Rom", "Romans"),
    ("1Cor", "I Corinthians"), ("2Cor", "II Corinthians"), ("Gal", "Galatians"),
    ("Eph", "Ephesians"), ("Phil", "Philippians"), ("Col", "Colossians"),
    ("1Thess", "I Thessalonians"), ("2Thess", "II Thessalonians"),
    ("1Tim", "I Timothy"), ("2Tim", "II Timothy"), ("Titus", "Titus"),
    ("Phlm", "Philemon"), ("Heb", "Hebrews"), ("Jas", "James"),
    ("1Pet", "I Peter"), ("2Pet", "II Peter"), ("1John", "I John"),
    ("2John", "II John"), ("3John", "III John"), ("Jude", "Jude"),
    ("Rev", "Revelation of John"),
];

/// Minimum similarity for a known code to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.5;

/// Closed lookup table from edge-list book codes to corpus book names.
#[derive(Debug, Clone)]
pub struct NameMapping {
    codes: HashMap<&'static str, &'static str>,
}

impl NameMapping {
    pub fn kjv() -> Self {
        NameMapping {
            codes: KJV_BOOK_CODES.iter().copied().collect(),
        }
    }

    pub fn book_name(&self, code: &str) -> Option<&'static str> {
        self.codes.get(code).copied()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Closest known code by normalized Levenshtein similarity, ties broken
    /// lexicographically so the answer is stable.
    pub fn suggest(&self, code: &str) -> Option<&'static str> {
        let mut best: Option<(&'static str, f64)> = None;

        for &known in self.codes.keys() {
            let score = normalized_levenshtein(&code.to_lowercase(), &known.to_lowercase());
            if score < SUGGESTION_THRESHOLD {
                continue;
            }
            best = match best {
                Some((current, current_score))
                    if current_score > score || (current_score == score && current < known) =>
                {
                    Some((current, current_score))
                }
                _ => Some((known, score)),
            };
        }

        best.map(|(known, _)| known)
    }
}

impl Default for NameMapping {
    fn default() -> Self {
        Self::kjv()
    }
}
