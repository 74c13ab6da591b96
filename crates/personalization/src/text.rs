//! TF-IDF text vectorization for item descriptions.
//!
//! Tokens are runs of two or more word characters after lowercasing.
//! Weights use raw term counts and smoothed inverse document frequency
//! `ln((1 + n) / (1 + df)) + 1`, and every row is L2-normalized so the dot
//! product of two rows is their cosine similarity.

use std::collections::{BTreeMap, HashSet};

use ndarray::Array2;

/// English stop-words removed from the vocabulary.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Split text into lowercase tokens of at least two word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in lowered.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            current.push(ch);
        } else {
            flush_token(&mut current, &mut tokens);
        }
    }
    flush_token(&mut current, &mut tokens);
    tokens
}

fn flush_token(current: &mut String, tokens: &mut Vec<String>) {
    if current.chars().count() >= 2 {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Vectorizer fitted on a corpus; holds the sorted vocabulary and idf weights.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    stop_words: HashSet<&'static str>,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_english_stop_words() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn analyze(&self, doc: &str) -> Vec<String> {
        tokenize(doc)
            .into_iter()
            .filter(|t| !self.stop_words.contains(t.as_str()))
            .collect()
    }

    /// Learn vocabulary and idf from `docs` and return the normalized
    /// document-term matrix (one row per document, columns in term order).
    pub fn fit_transform<S: AsRef<str>>(&mut self, docs: &[S]) -> Array2<f64> {
        let analyzed: Vec<Vec<String>> = docs.iter().map(|d| self.analyze(d.as_ref())).collect();

        let mut terms: BTreeMap<String, usize> = BTreeMap::new();
        for tokens in &analyzed {
            for token in tokens {
                terms.entry(token.clone()).or_insert(0);
            }
        }
        for (column, slot) in terms.values_mut().enumerate() {
            *slot = column;
        }

        let mut df = vec![0usize; terms.len()];
        let mut matrix = Array2::<f64>::zeros((docs.len(), terms.len()));
        for (row, tokens) in analyzed.iter().enumerate() {
            let mut seen = HashSet::new();
            for token in tokens {
                if let Some(&column) = terms.get(token) {
                    matrix[[row, column]] += 1.0;
                    if seen.insert(column) {
                        df[column] += 1;
                    }
                }
            }
        }

        let n = docs.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        for mut row in matrix.rows_mut() {
            for (value, weight) in row.iter_mut().zip(&idf) {
                *value *= weight;
            }
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }

        self.vocabulary = terms;
        self.idf = idf;
        matrix
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_short_tokens_and_punctuation() {
        assert_eq!(
            tokenize("A fast, Portable LAPTOP-15 x"),
            vec!["fast", "portable", "laptop", "15"]
        );
        assert_eq!(tokenize("snake_case ok"), vec!["snake_case", "ok"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_stop_words_removed() {
        let mut vectorizer = TfidfVectorizer::with_english_stop_words();
        vectorizer.fit_transform(&["the system will find the laptop"]);
        let terms: Vec<&String> = vectorizer.vocabulary().keys().collect();
        assert_eq!(terms, vec!["laptop"]);
    }

    #[test]
    fn test_vocabulary_sorted_and_idf_smoothed() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit_transform(&["beta alpha", "alpha"]);
        assert_eq!(vectorizer.vocabulary()["alpha"], 0);
        assert_eq!(vectorizer.vocabulary()["beta"], 1);
        // alpha appears in both documents, beta in one.
        assert!((vectorizer.idf()[0] - 1.0).abs() < 1e-12);
        assert!((vectorizer.idf()[1] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_l2_normalized() {
        let mut vectorizer = TfidfVectorizer::with_english_stop_words();
        let matrix = vectorizer.fit_transform(&["laptop laptop fast", "scarf wool", "the"]);
        for row in 0..2 {
            let norm = matrix.row(row).dot(&matrix.row(row));
            assert!((norm - 1.0).abs() < 1e-9);
        }
        // Only stop-words: stays a zero row.
        assert!(matrix.row(2).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_empty_corpus() {
        let mut vectorizer = TfidfVectorizer::with_english_stop_words();
        let docs: Vec<String> = Vec::new();
        let matrix = vectorizer.fit_transform(&docs);
        assert_eq!(matrix.dim(), (0, 0));
        assert!(vectorizer.vocabulary().is_empty());
    }
}
