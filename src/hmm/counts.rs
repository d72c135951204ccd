use std::collections::HashSet;

use crate::{states::StateNames, Result};

use super::{emission::EmissionProbs, logspace::LogProb};

/// Event counts for HMM training.
///
/// Amounts are `f64` so that expected counts from Baum-Welch can be added
/// alongside hard counts from tagged text. Tags are dense indices in
/// `0..num_tags()`; passing a larger tag panics. Amounts must be
/// non-negative.
///
/// Call [`prepare`](Counts::prepare) after accumulating and before handing the
/// distributions to a decoder.
pub trait Counts {
    fn copy(&self) -> Self
    where
        Self: Sized;

    fn num_tags(&self) -> usize;

    /// Adds `amount` to the frequency of `word`, independent of any tag.
    fn increment_word(&mut self, word: &str, amount: f64);

    /// Marks `word` as seen without adding mass.
    fn add_to_seen_words(&mut self, word: &str);

    /// Adds `amount` to the emission `(tag, word)` and to `c_t(tag)`.
    fn increment_emission(&mut self, tag: usize, word: &str, amount: f64);

    /// Adds `amount` to `c_t(tag)` with no word attached.
    fn increment_tag(&mut self, tag: usize, amount: f64);

    /// Adds `amount` to the transition `tag_i -> tag_j` and to `c_t(tag_i)`.
    fn increment_transition(&mut self, tag_i: usize, tag_j: usize, amount: f64);

    fn increment_initial(&mut self, tag: usize, amount: f64);

    fn increment_final(&mut self, tag: usize, amount: f64);

    /// `P(tag | word)` from the current ledger; does not need `prepare`.
    fn prob_tag_given_word(&self, tag: usize, word: &str) -> f64;

    /// Number of distinct words emitted by `tag`.
    fn num_emissions(&self, tag: usize) -> usize;

    /// Total mass attributed to `tag` (emissions, tag-only evidence and
    /// outgoing transitions).
    fn c_t(&self, tag: usize) -> f64;

    fn prepare(&mut self);

    fn initial_log_dist(&self, start_with_prior: bool) -> Vec<LogProb>;

    fn final_log_dist(&self, start_with_prior: bool) -> Vec<LogProb>;

    /// Row `i` is `log P(next = j | current = i)`.
    fn transition_log_dist(&self, start_with_prior: bool) -> Vec<Vec<LogProb>>;

    /// Emission log-probabilities. Only tags in `valid_tags_for_unknowns`
    /// receive unknown-word mass; `None` lets every tag receive it.
    fn emission_log_dist(&self, valid_tags_for_unknowns: Option<&HashSet<usize>>) -> EmissionProbs;

    /// Adds `amount` pseudo-counts to the initial, final and transition priors
    /// of every state in `state_names`, resolved through `states`.
    fn create_transition_prior(&mut self, state_names: &[String], states: &StateNames, amount: f64) -> Result<()>;

    /// Records one fully tagged sentence with weight `weight`: each word, its
    /// emission, the transitions between neighbours and the initial and
    /// final tags.
    fn observe_sequence(&mut self, words: &[&str], tags: &[usize], weight: f64) {
        debug_assert_eq!(words.len(), tags.len(), "words and tags differ in length");
        let (Some(&first), Some(&last)) = (tags.first(), tags.last()) else {
            return;
        };
        for (&w, &t) in words.iter().zip(tags) {
            self.increment_word(w, weight);
            self.increment_emission(t, w, weight);
        }
        for pair in tags.windows(2) {
            self.increment_transition(pair[0], pair[1], weight);
        }
        self.increment_initial(first, weight);
        self.increment_final(last, weight);
    }
}
