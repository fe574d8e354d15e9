//! Text normalization
//!
//! Turns raw dish text and user queries into indexable tokens: lowercase
//! alphabetic words longer than two characters that survive the stop-word
//! filter. Dish text and queries go through the same pipeline so they meet
//! in the same token space.

use std::collections::HashSet;

/// Normalizes raw text into tokens
#[derive(Debug, Clone)]
pub struct Normalizer {
    stop_words: HashSet<String>,
}

impl Normalizer {
    pub fn new(stop_words: HashSet<String>) -> Self {
        Self { stop_words }
    }

    /// Parse a stop-word list, one word per line, blank lines ignored
    pub fn from_word_list(text: &str) -> Self {
        let stop_words = text
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        Self::new(stop_words)
    }

    /// Normalize text into tokens, first occurrence order, no duplicates
    ///
    /// Idempotent: normalizing already-normalized tokens yields the same
    /// tokens.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut tokens = Vec::new();

        for run in text
            .to_lowercase()
            .split(|c: char| !c.is_alphabetic())
            .filter(|run| run.chars().count() > 2)
        {
            if self.stop_words.contains(run) {
                continue;
            }
            if seen.insert(run.to_string()) {
                tokens.push(run.to_string());
            }
        }

        tokens
    }

    pub fn stop_words(&self) -> &HashSet<String> {
        &self.stop_words
    }
}
