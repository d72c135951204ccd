use std::collections::{HashMap, HashSet};

use crate::{states::StateNames, Error, Result};

use super::{
    counts::Counts,
    emission::EmissionProbs,
    logspace::{is_log_zero, ln_mass, log_normalize, LogProb, LOG_ZERO},
    opt::CountsOpt,
};

/// Pseudo-counts added to the ledger when a getter asks for them.
#[derive(Debug, Clone)]
struct Prior {
    initial: Vec<f64>,
    initial_total: f64,
    fin: Vec<f64>,
    fin_total: f64,
    trans: Vec<Vec<f64>>,
    trans_out: Vec<f64>,
}

impl Prior {
    fn new(num_tags: usize) -> Self {
        Self {
            initial: vec![0.0; num_tags],
            initial_total: 0.0,
            fin: vec![0.0; num_tags],
            fin_total: 0.0,
            trans: vec![vec![0.0; num_tags]; num_tags],
            trans_out: vec![0.0; num_tags],
        }
    }
}

/// The plain count ledger.
#[derive(Debug, Clone)]
pub struct StandardCounts {
    opt: CountsOpt,
    num_tags: usize,
    /// Word frequencies, independent of tags.
    c_w: HashMap<String, f64>,
    /// Emission counts: word -> count per tag.
    c_tw: HashMap<String, Vec<f64>>,
    /// Distinct words with positive count per tag.
    n_tw: Vec<usize>,
    /// Emission mass per tag.
    c_t_emit: Vec<f64>,
    /// Tag-only mass per tag.
    c_t_only: Vec<f64>,
    c_tt: Vec<Vec<f64>>,
    c_tt_out: Vec<f64>,
    c_initial: Vec<f64>,
    c_initial_total: f64,
    c_final: Vec<f64>,
    c_final_total: f64,
    prior: Prior,
}

impl StandardCounts {
    pub fn new(num_tags: usize) -> Self {
        Self {
            opt: CountsOpt::default(),
            num_tags,
            c_w: HashMap::new(),
            c_tw: HashMap::new(),
            n_tw: vec![0; num_tags],
            c_t_emit: vec![0.0; num_tags],
            c_t_only: vec![0.0; num_tags],
            c_tt: vec![vec![0.0; num_tags]; num_tags],
            c_tt_out: vec![0.0; num_tags],
            c_initial: vec![0.0; num_tags],
            c_initial_total: 0.0,
            c_final: vec![0.0; num_tags],
            c_final_total: 0.0,
            prior: Prior::new(num_tags),
        }
    }

    pub fn with_opt(num_tags: usize, opt: CountsOpt) -> Result<Self> {
        opt.validate()?;
        Ok(Self { opt, ..Self::new(num_tags) })
    }

    pub fn opt(&self) -> &CountsOpt {
        &self.opt
    }

    pub fn word_count(&self, word: &str) -> f64 {
        self.c_w.get(word).copied().unwrap_or_default()
    }

    pub fn is_seen(&self, word: &str) -> bool {
        self.c_w.contains_key(word)
    }

    pub fn num_words(&self) -> usize {
        self.c_w.len()
    }

    pub fn emission_count(&self, tag: usize, word: &str) -> f64 {
        self.c_tw.get(word).map_or(0.0, |row| row[tag])
    }

    pub fn transition_count(&self, tag_i: usize, tag_j: usize) -> f64 {
        self.c_tt[tag_i][tag_j]
    }

    pub fn initial_count(&self, tag: usize) -> f64 {
        self.c_initial[tag]
    }

    pub fn final_count(&self, tag: usize) -> f64 {
        self.c_final[tag]
    }

    fn check_amount(amount: f64) {
        debug_assert!(amount >= 0.0, "negative or NaN amount: {amount}");
    }
}

impl Counts for StandardCounts {
    fn copy(&self) -> Self {
        self.clone()
    }

    fn num_tags(&self) -> usize {
        self.num_tags
    }

    fn increment_word(&mut self, word: &str, amount: f64) {
        Self::check_amount(amount);
        *self.c_w.entry(word.to_string()).or_insert(0.0) += amount;
    }

    fn add_to_seen_words(&mut self, word: &str) {
        self.c_w.entry(word.to_string()).or_insert(0.0);
    }

    fn increment_emission(&mut self, tag: usize, word: &str, amount: f64) {
        Self::check_amount(amount);
        let n = self.num_tags;
        let row = self.c_tw.entry(word.to_string()).or_insert_with(|| vec![0.0; n]);
        if row[tag] == 0.0 && amount > 0.0 {
            self.n_tw[tag] += 1;
        }
        row[tag] += amount;
        self.c_t_emit[tag] += amount;
    }

    fn increment_tag(&mut self, tag: usize, amount: f64) {
        Self::check_amount(amount);
        self.c_t_only[tag] += amount;
    }

    fn increment_transition(&mut self, tag_i: usize, tag_j: usize, amount: f64) {
        Self::check_amount(amount);
        self.c_tt[tag_i][tag_j] += amount;
        self.c_tt_out[tag_i] += amount;
    }

    fn increment_initial(&mut self, tag: usize, amount: f64) {
        Self::check_amount(amount);
        self.c_initial[tag] += amount;
        self.c_initial_total += amount;
    }

    fn increment_final(&mut self, tag: usize, amount: f64) {
        Self::check_amount(amount);
        self.c_final[tag] += amount;
        self.c_final_total += amount;
    }

    fn prob_tag_given_word(&self, tag: usize, word: &str) -> f64 {
        if let Some(row) = self.c_tw.get(word) {
            let total: f64 = row.iter().sum();
            if total > 0.0 {
                return row[tag] / total;
            }
        }
        // unseen word: fall back to the tag marginal
        let total: f64 = (0..self.num_tags).map(|t| self.c_t(t)).sum();
        if total > 0.0 {
            self.c_t(tag) / total
        } else {
            1.0 / self.num_tags as f64
        }
    }

    fn num_emissions(&self, tag: usize) -> usize {
        self.n_tw[tag]
    }

    fn c_t(&self, tag: usize) -> f64 {
        self.c_t_emit[tag] + self.c_t_only[tag] + self.c_tt_out[tag]
    }

    fn prepare(&mut self) {
        let n = self.num_tags;
        self.c_tw.retain(|_, row| row.iter().any(|&c| c > 0.0));

        self.n_tw = vec![0; n];
        self.c_t_emit = vec![0.0; n];
        for row in self.c_tw.values() {
            for (t, &c) in row.iter().enumerate() {
                if c > 0.0 {
                    self.n_tw[t] += 1;
                    self.c_t_emit[t] += c;
                }
            }
        }
        self.c_tt_out = self.c_tt.iter().map(|row| row.iter().sum()).collect();
        self.c_initial_total = self.c_initial.iter().sum();
        self.c_final_total = self.c_final.iter().sum();

        let prior = &mut self.prior;
        prior.initial_total = prior.initial.iter().sum();
        prior.fin_total = prior.fin.iter().sum();
        prior.trans_out = prior.trans.iter().map(|row| row.iter().sum()).collect();

        log::debug!(
            "prepared counts (tags: {}, words: {}, emission types: {}, transition mass: {}, initial mass: {}, final mass: {})",
            n,
            self.c_w.len(),
            self.c_tw.len(),
            self.c_tt_out.iter().sum::<f64>(),
            self.c_initial_total,
            self.c_final_total
        );
    }

    fn initial_log_dist(&self, start_with_prior: bool) -> Vec<LogProb> {
        let prior = start_with_prior.then(|| (&self.prior.initial[..], self.prior.initial_total));
        log_normalize(&self.c_initial, self.c_initial_total, prior)
    }

    fn final_log_dist(&self, start_with_prior: bool) -> Vec<LogProb> {
        let prior = start_with_prior.then(|| (&self.prior.fin[..], self.prior.fin_total));
        log_normalize(&self.c_final, self.c_final_total, prior)
    }

    fn transition_log_dist(&self, start_with_prior: bool) -> Vec<Vec<LogProb>> {
        self.c_tt
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let prior = start_with_prior.then(|| (&self.prior.trans[i][..], self.prior.trans_out[i]));
                log_normalize(row, self.c_tt_out[i], prior)
            })
            .collect()
    }

    fn emission_log_dist(&self, valid_tags_for_unknowns: Option<&HashSet<usize>>) -> EmissionProbs {
        let n = self.num_tags;
        let mut singletons = vec![0usize; n];
        for row in self.c_tw.values() {
            for (t, &c) in row.iter().enumerate() {
                if c > 0.0 && c <= self.opt.singleton_threshold {
                    singletons[t] += 1;
                }
            }
        }

        let unknown_mass: Vec<f64> = (0..n)
            .map(|t| match valid_tags_for_unknowns {
                Some(valid) if !valid.contains(&t) => 0.0,
                _ => self.opt.unknown_weight * (singletons[t] as f64 + 1.0),
            })
            .collect();
        let log_denom: Vec<LogProb> = (0..n).map(|t| ln_mass(self.c_t_emit[t] + unknown_mass[t])).collect();
        let ratio = |mass: f64, t: usize| {
            let lp = ln_mass(mass);
            if is_log_zero(lp) {
                LOG_ZERO
            } else {
                lp - log_denom[t]
            }
        };

        let known: HashMap<String, Vec<LogProb>> = self
            .c_tw
            .iter()
            .filter(|(_, row)| row.iter().any(|&c| c > 0.0))
            .map(|(w, row)| (w.clone(), row.iter().enumerate().map(|(t, &c)| ratio(c, t)).collect()))
            .collect();
        let unknown: Vec<LogProb> = (0..n).map(|t| ratio(unknown_mass[t], t)).collect();
        EmissionProbs::new(known, unknown)
    }

    fn create_transition_prior(&mut self, state_names: &[String], states: &StateNames, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount(amount));
        }
        let tags = state_names
            .iter()
            .map(|name| {
                let tag = states.index_of(name).ok_or_else(|| Error::UnknownState(name.clone()))?;
                if tag >= self.num_tags {
                    return Err(Error::TagOutOfRange { tag, num_tags: self.num_tags });
                }
                Ok(tag)
            })
            .collect::<Result<Vec<_>>>()?;

        let prior = &mut self.prior;
        for &i in &tags {
            prior.initial[i] += amount;
            prior.initial_total += amount;
            prior.fin[i] += amount;
            prior.fin_total += amount;
            for &j in &tags {
                prior.trans[i][j] += amount;
                prior.trans_out[i] += amount;
            }
        }
        log::info!("transition prior (states: {}, amount: {})", tags.len(), amount);
        Ok(())
    }
}
