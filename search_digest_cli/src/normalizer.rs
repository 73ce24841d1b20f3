use crate::stemmer::PorterStemmer;

const STRIPPED: [char; 4] = ['.', ',', ':', '"'];

const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

pub fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOPWORDS.contains(&lower.as_str())
}

/// Word filtering and stem comparison used when counting page words.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    stemmer: PorterStemmer,
}

impl TextNormalizer {
    pub fn new(stemmer: PorterStemmer) -> Self {
        Self { stemmer }
    }

    /// Lowercases and strips punctuation. Returns `None` for words that are
    /// too short, start with a non-letter, or are stopwords.
    pub fn normalize(&self, word: &str) -> Option<String> {
        let word: String = word
            .to_lowercase()
            .chars()
            .filter(|c| !STRIPPED.contains(c))
            .collect();

        let first = word.chars().next()?;
        if word.chars().count() <= 2 || !first.is_alphabetic() || is_stopword(&word) {
            return None;
        }
        Some(word)
    }

    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word)
    }

    pub fn stems_equal(&self, a: &str, b: &str) -> bool {
        self.stem(a) == self.stem(b)
    }
}
