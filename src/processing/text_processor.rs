//! Text normalization and segmentation

use regex::Regex;

pub struct TextProcessor {
    whitespace_regex: Regex,
}

/// Normalized view of one resume, shared read-only by every analyzer.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    pub original: String,
    pub cleaned: String,
    pub lowercase: String,
    pub words: Vec<String>,
    pub sentences: Vec<String>,
}

impl NormalizedText {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Never zero, so ratios over sentences are always defined.
    pub fn sentence_count(&self) -> usize {
        self.sentences.len().max(1)
    }

    /// Trimmed, non-empty lines of the original text.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.original
            .split(['\n', '\r'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.cleaned.is_empty()
    }
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");
        Self { whitespace_regex }
    }

    pub fn process(&self, text: &str) -> NormalizedText {
        let cleaned = self.normalize_whitespace(text);
        let lowercase = cleaned.to_lowercase();
        let words = self.split_words(&cleaned);
        let sentences = self.split_sentences(&cleaned);

        NormalizedText {
            original: text.to_string(),
            cleaned,
            lowercase,
            words,
            sentences,
        }
    }

    /// Collapse whitespace runs to single spaces and trim
    pub fn normalize_whitespace(&self, text: &str) -> String {
        self.whitespace_regex.replace_all(text, " ").trim().to_string()
    }

    pub fn split_words(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    /// Split on whitespace that directly follows `.`, `!` or `?`
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut previous: Option<char> = None;

        for (idx, ch) in text.char_indices() {
            if ch.is_whitespace() && matches!(previous, Some('.') | Some('!') | Some('?')) {
                let sentence = text[start..idx].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                start = idx;
            }
            previous = Some(ch);
        }

        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }

        sentences
    }
}
