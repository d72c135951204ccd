use std::{collections::HashSet, sync::Arc};

use crate::{states::StateNames, Result};

use super::{
    counts::Counts,
    emission::EmissionProbs,
    grammar::Grammar,
    logspace::{LogProb, LOG_ZERO},
};

/// Wraps another [`Counts`] and admits only the initial, final and
/// transition events a [`Grammar`] permits.
///
/// Disallowed increments are dropped before they reach the delegate, and the
/// distributions read back are masked with [`LOG_ZERO`] wherever the grammar
/// forbids an entry. Word and emission events pass straight through.
#[derive(Debug, Clone)]
pub struct GrammarConstrainedCounts<C> {
    delegate: C,
    grammar: Arc<Grammar>,
}

impl<C: Counts> GrammarConstrainedCounts<C> {
    pub fn new(delegate: C, grammar: Arc<Grammar>) -> Self {
        debug_assert_eq!(delegate.num_tags(), grammar.num_tags(), "grammar and counts disagree on tags");
        Self { delegate, grammar }
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    pub fn delegate(&self) -> &C {
        &self.delegate
    }

    /// Direct access to the wrapped counts, bypassing the grammar on writes.
    pub fn delegate_mut(&mut self) -> &mut C {
        &mut self.delegate
    }

    pub fn into_inner(self) -> C {
        self.delegate
    }

    fn mask(dist: &mut [LogProb], valid: impl Fn(usize) -> bool) {
        for (t, lp) in dist.iter_mut().enumerate() {
            if !valid(t) {
                *lp = LOG_ZERO;
            }
        }
    }
}

impl<C: Counts> Counts for GrammarConstrainedCounts<C> {
    fn copy(&self) -> Self {
        Self { delegate: self.delegate.copy(), grammar: Arc::clone(&self.grammar) }
    }

    fn num_tags(&self) -> usize {
        self.delegate.num_tags()
    }

    fn increment_word(&mut self, word: &str, amount: f64) {
        self.delegate.increment_word(word, amount);
    }

    fn add_to_seen_words(&mut self, word: &str) {
        self.delegate.add_to_seen_words(word);
    }

    fn increment_emission(&mut self, tag: usize, word: &str, amount: f64) {
        self.delegate.increment_emission(tag, word, amount);
    }

    fn increment_tag(&mut self, tag: usize, amount: f64) {
        self.delegate.increment_tag(tag, amount);
    }

    fn increment_transition(&mut self, tag_i: usize, tag_j: usize, amount: f64) {
        if self.grammar.is_valid_transition(tag_i, tag_j) {
            self.delegate.increment_transition(tag_i, tag_j, amount);
        } else {
            log::trace!("drop transition {tag_i} -> {tag_j} ({amount})");
        }
    }

    fn increment_initial(&mut self, tag: usize, amount: f64) {
        if self.grammar.is_valid_initial(tag) {
            self.delegate.increment_initial(tag, amount);
        } else {
            log::trace!("drop initial {tag} ({amount})");
        }
    }

    fn increment_final(&mut self, tag: usize, amount: f64) {
        if self.grammar.is_valid_final(tag) {
            self.delegate.increment_final(tag, amount);
        } else {
            log::trace!("drop final {tag} ({amount})");
        }
    }

    fn prob_tag_given_word(&self, tag: usize, word: &str) -> f64 {
        self.delegate.prob_tag_given_word(tag, word)
    }

    fn num_emissions(&self, tag: usize) -> usize {
        self.delegate.num_emissions(tag)
    }

    fn c_t(&self, tag: usize) -> f64 {
        self.delegate.c_t(tag)
    }

    fn prepare(&mut self) {
        self.delegate.prepare();
    }

    fn initial_log_dist(&self, start_with_prior: bool) -> Vec<LogProb> {
        let mut dist = self.delegate.initial_log_dist(start_with_prior);
        Self::mask(&mut dist, |t| self.grammar.is_valid_initial(t));
        dist
    }

    fn final_log_dist(&self, start_with_prior: bool) -> Vec<LogProb> {
        let mut dist = self.delegate.final_log_dist(start_with_prior);
        Self::mask(&mut dist, |t| self.grammar.is_valid_final(t));
        dist
    }

    fn transition_log_dist(&self, start_with_prior: bool) -> Vec<Vec<LogProb>> {
        let mut dist = self.delegate.transition_log_dist(start_with_prior);
        for (i, row) in dist.iter_mut().enumerate() {
            match self.grammar.followers(i) {
                Some(valid) => Self::mask(row, |j| valid.contains(&j)),
                None => row.fill(LOG_ZERO),
            }
        }
        dist
    }

    fn emission_log_dist(&self, valid_tags_for_unknowns: Option<&HashSet<usize>>) -> EmissionProbs {
        self.delegate.emission_log_dist(valid_tags_for_unknowns)
    }

    fn create_transition_prior(&mut self, state_names: &[String], states: &StateNames, amount: f64) -> Result<()> {
        self.delegate.create_transition_prior(state_names, states, amount)
    }
}
