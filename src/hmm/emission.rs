use std::collections::HashMap;

use super::logspace::{LogProb, LOG_ZERO};

/// Emission log-probabilities `log P(word | tag)` handed to a decoder.
///
/// Words seen in training have one entry per tag; any other word uses the
/// per-tag unknown slot.
#[derive(Debug, Clone)]
pub struct EmissionProbs {
    known: HashMap<String, Vec<LogProb>>,
    unknown: Vec<LogProb>,
}

impl EmissionProbs {
    pub(crate) fn new(known: HashMap<String, Vec<LogProb>>, unknown: Vec<LogProb>) -> Self {
        Self { known, unknown }
    }

    /// # Panics
    ///
    /// If `tag` is not below [`num_tags`](Self::num_tags).
    pub fn log_prob(&self, tag: usize, word: &str) -> LogProb {
        match self.known.get(word) {
            Some(row) => row[tag],
            None => self.unknown[tag],
        }
    }

    pub fn unknown_log_prob(&self, tag: usize) -> LogProb {
        self.unknown[tag]
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.known.contains_key(word)
    }

    pub fn num_tags(&self) -> usize {
        self.unknown.len()
    }

    pub fn num_words(&self) -> usize {
        self.known.len()
    }

    /// Iterates `(word, log P(word | tag))` over seen words.
    pub fn words_for(&self, tag: usize) -> impl Iterator<Item = (&str, LogProb)> + '_ {
        self.known
            .iter()
            .map(move |(w, row)| (w.as_str(), row[tag]))
            .filter(|&(_, lp)| lp != LOG_ZERO)
    }
}
