use std::collections::{HashMap, HashSet};

/// English stop words filtered before any counting. Trimmed-down list of the
/// function words that dominate raw frequency tables.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it",
    "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out",
    "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your", "yours", "yourself", "yourselves",
];

/// Capability interface over the external linguistic pipeline.
///
/// The corpus passes depend only on this trait, so the real NLP system (or a
/// mock in tests) can be substituted without touching the accumulation code.
pub trait Annotator {
    /// Normalized lexical units of `text`: no stop words, no punctuation,
    /// no pure-whitespace tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Named entities by surface text, not normalized or disambiguated.
    fn entities(&self, text: &str) -> Vec<String>;

    /// Content terms worth searching for. The reference pipeline keeps
    /// nouns, proper nouns, and verbs; without part-of-speech tags the
    /// content tokens are the closest approximation.
    fn key_terms(&self, text: &str) -> Vec<String> {
        self.tokenize(text)
    }
}

/// Lexical synonym source used to broaden search queries.
pub trait SynonymProvider {
    /// Up to `limit` synonyms for `term`.
    fn synonyms(&self, term: &str, limit: usize) -> Vec<String>;
}

/// Null provider; expansion disabled (the reference default).
pub struct NoSynonyms;

impl SynonymProvider for NoSynonyms {
    fn synonyms(&self, _term: &str, _limit: usize) -> Vec<String> {
        Vec::new()
    }
}

/// Table-backed provider for tests and offline word lists.
#[derive(Default)]
pub struct StaticSynonyms {
    table: HashMap<String, Vec<String>>,
}

impl StaticSynonyms {
    pub fn new() -> Self {
        StaticSynonyms::default()
    }

    pub fn insert(&mut self, term: &str, synonyms: &[&str]) {
        self.table.insert(
            term.to_lowercase(),
            synonyms.iter().map(|s| s.to_string()).collect(),
        );
    }
}

impl SynonymProvider for StaticSynonyms {
    fn synonyms(&self, term: &str, limit: usize) -> Vec<String> {
        match self.table.get(&term.to_lowercase()) {
            Some(list) => list.iter().take(limit).cloned().collect(),
            None => Vec::new(),
        }
    }
}

/// Built-in stand-in for the external NLP library.
///
/// Tokenization is alphanumeric word extraction (inner hyphens kept, so
/// "SARS-CoV-2" stays one token) with the stop-word list applied
/// case-insensitively. Entity recognition is a heuristic: runs of
/// capitalized words, or single words that are all-caps or carry digits.
/// Anything smarter plugs in behind [`Annotator`].
pub struct BasicAnnotator {
    stop_words: HashSet<&'static str>,
}

impl Default for BasicAnnotator {
    fn default() -> Self {
        BasicAnnotator::new()
    }
}

impl BasicAnnotator {
    pub fn new() -> Self {
        BasicAnnotator {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word.to_lowercase().as_str())
    }

    /// Raw word extraction: maximal runs of alphanumeric characters and
    /// inner hyphens, with leading/trailing hyphens trimmed.
    fn words(text: &str) -> Vec<&str> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .map(|w| w.trim_matches('-'))
            .filter(|w| !w.is_empty())
            .collect()
    }

    fn looks_like_entity_word(word: &str) -> bool {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) if first.is_uppercase() => true,
            _ => word.chars().any(|c| c.is_ascii_digit()),
        }
    }
}

impl Annotator for BasicAnnotator {
    fn tokenize(&self, text: &str) -> Vec<String> {
        Self::words(text)
            .into_iter()
            .filter(|w| !self.is_stop_word(w))
            .map(|w| w.to_string())
            .collect()
    }

    fn entities(&self, text: &str) -> Vec<String> {
        let words = Self::words(text);
        let mut entities = Vec::new();
        let mut run: Vec<&str> = Vec::new();
        for word in words.iter().chain(std::iter::once(&"")) {
            if !word.is_empty()
                && Self::looks_like_entity_word(word)
                && !self.is_stop_word(word)
            {
                run.push(*word);
                continue;
            }
            // a run ends; multi-word runs always count, single words only
            // when they are all-caps or carry digits
            if run.len() >= 2 {
                entities.push(run.join(" "));
            } else if let [single] = run[..] {
                let shouty = single.chars().all(|c| !c.is_lowercase());
                if shouty || single.chars().any(|c| c.is_ascii_digit()) {
                    entities.push(single.to_string());
                }
            }
            run.clear();
        }
        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_filters_stop_words_and_punctuation() {
        let ann = BasicAnnotator::new();
        let tokens = ann.tokenize("The symptoms of COVID-19 are, however, varied.");
        assert_eq!(tokens, vec!["symptoms", "COVID-19", "however", "varied"]);
    }

    #[test]
    fn tokenize_never_yields_whitespace_or_empty_tokens() {
        let ann = BasicAnnotator::new();
        let tokens = ann.tokenize("  \t\n  --  ...  ");
        assert!(tokens.is_empty());
    }

    #[test]
    fn entities_pick_up_capitalized_runs_and_acronyms() {
        let ann = BasicAnnotator::new();
        let ents = ann.entities("Reported by World Health Organization and WHO on covid.");
        assert!(ents.contains(&"World Health Organization".to_string()));
        assert!(ents.contains(&"WHO".to_string()));
        assert!(!ents.iter().any(|e| e == "covid"));
    }

    #[test]
    fn entities_keep_surface_text_distinct() {
        let ann = BasicAnnotator::new();
        let ents = ann.entities("SARS-CoV-2 differs from SARS-CoV-2, and from Sars.");
        assert_eq!(
            ents.iter().filter(|e| *e == "SARS-CoV-2").count(),
            2,
            "each mention is counted by its surface text"
        );
    }

    #[test]
    fn static_synonyms_respect_the_limit() {
        let mut syn = StaticSynonyms::new();
        syn.insert("symptom", &["sign", "indication", "manifestation"]);
        assert_eq!(syn.synonyms("symptom", 2), vec!["sign", "indication"]);
        assert!(syn.synonyms("symptom", 0).is_empty());
        assert!(syn.synonyms("unknown", 3).is_empty());
    }

    #[test]
    fn no_synonyms_is_always_empty() {
        assert!(NoSynonyms.synonyms("anything", 5).is_empty());
    }
}
