use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use hmmcounts::{Counts, Grammar, GrammarConstrainedCounts, StandardCounts, StateNames, LOG_ZERO};

fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// 0 -> 1 -> 2, starting at 0 and ending at 2.
fn chain_grammar() -> Arc<Grammar> {
    let transitions = HashMap::from([(0, HashSet::from([1])), (1, HashSet::from([2])), (2, HashSet::new())]);
    Arc::new(Grammar::new(3, HashSet::from([0]), transitions, HashSet::from([2])).expect("invalid grammar"))
}

fn constrained() -> GrammarConstrainedCounts<StandardCounts> {
    GrammarConstrainedCounts::new(StandardCounts::new(3), chain_grammar())
}

/// Works the same whether or not the counts are constrained.
fn accumulate<C: Counts>(counts: &mut C) {
    counts.increment_initial(0, 1.0);
    counts.increment_initial(1, 1.0);
    counts.increment_transition(0, 1, 1.0);
    counts.increment_transition(1, 0, 1.0);
    counts.increment_final(2, 1.0);
    counts.prepare();
}

#[test]
fn chain_scenario() {
    init_logger();
    let mut counts = constrained();
    accumulate(&mut counts);

    assert_eq!(counts.initial_log_dist(false), vec![0.0, LOG_ZERO, LOG_ZERO]);
    assert_eq!(counts.final_log_dist(false), vec![LOG_ZERO, LOG_ZERO, 0.0]);

    let trans = counts.transition_log_dist(false);
    assert_eq!(trans[0], vec![LOG_ZERO, 0.0, LOG_ZERO]);
    assert!(trans[1].iter().all(|&x| x == LOG_ZERO));
    assert!(trans[2].iter().all(|&x| x == LOG_ZERO));
}

#[test]
fn unconstrained_scenario_keeps_everything() {
    let mut counts = StandardCounts::new(3);
    accumulate(&mut counts);
    let initial = counts.initial_log_dist(false);
    assert!((initial[0].exp() - 0.5).abs() < 1e-9);
    assert!((initial[1].exp() - 0.5).abs() < 1e-9);
    assert_eq!(counts.transition_log_dist(false)[1][0], 0.0);
}

#[test]
fn invalid_transitions_never_accumulate() {
    init_logger();
    let mut counts = constrained();
    for _ in 0..10 {
        counts.increment_transition(2, 0, 0.5);
        counts.increment_transition(0, 2, 0.5);
    }
    counts.increment_emission(0, "the", 1.0);
    counts.prepare();
    assert_eq!(counts.c_t(0), 1.0);
    assert_eq!(counts.c_t(2), 0.0);
    let trans = counts.transition_log_dist(false);
    assert_eq!(trans[2][0], LOG_ZERO);
    assert_eq!(trans[0][2], LOG_ZERO);
    assert_eq!(counts.delegate().transition_count(0, 2), 0.0);
}

#[test]
fn masks_mass_injected_into_delegate() {
    let mut counts = constrained();
    counts.increment_transition(0, 1, 1.0);
    counts.delegate_mut().increment_transition(0, 2, 3.0);
    counts.delegate_mut().increment_initial(1, 2.0);
    counts.delegate_mut().increment_final(0, 2.0);
    counts.prepare();

    let trans = counts.transition_log_dist(false);
    assert_eq!(trans[0][2], LOG_ZERO);
    // valid entries are left as the delegate produced them
    assert!((trans[0][1].exp() - 0.25).abs() < 1e-9);
    assert_eq!(counts.initial_log_dist(false)[1], LOG_ZERO);
    assert_eq!(counts.final_log_dist(false)[0], LOG_ZERO);
}

#[test]
fn masks_prior_mass() {
    let states: StateNames = ["A", "B", "C"].into_iter().collect();
    let mut counts = constrained();
    counts
        .create_transition_prior(states.names(), &states, 1.0)
        .expect("failed to create prior");
    counts.prepare();

    let trans = counts.transition_log_dist(true);
    assert!((trans[0][1].exp() - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(trans[0][0], LOG_ZERO);
    assert_eq!(trans[0][2], LOG_ZERO);
    let initial = counts.initial_log_dist(true);
    assert!((initial[0].exp() - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(initial[1], LOG_ZERO);
}

#[test]
fn copy_is_independent() {
    let mut original = constrained();
    accumulate(&mut original);
    let before = original.transition_log_dist(false);

    let mut copy = original.copy();
    copy.increment_transition(1, 2, 5.0);
    copy.prepare();

    assert_eq!(original.transition_log_dist(false), before);
    assert_eq!(original.c_t(1), 0.0);
    assert_eq!(copy.transition_log_dist(false)[1][2], 0.0);
    assert!(Arc::ptr_eq(original.grammar(), copy.grammar()));
}

#[test]
fn emissions_pass_through() {
    let mut counts = constrained();
    counts.increment_word("dog", 1.0);
    counts.add_to_seen_words("cat");
    counts.increment_emission(1, "dog", 2.0);
    counts.increment_tag(2, 0.5);
    assert_eq!(counts.num_emissions(1), 1);
    assert_eq!(counts.c_t(2), 0.5);
    assert_eq!(counts.prob_tag_given_word(1, "dog"), 1.0);
    assert!(counts.delegate().is_seen("cat"));
    counts.prepare();
    let probs = counts.emission_log_dist(None);
    assert!(probs.log_prob(1, "dog") > LOG_ZERO);
    assert_eq!(probs.log_prob(0, "dog"), LOG_ZERO);
}

#[test]
fn observe_sequence_respects_grammar() {
    let mut counts = constrained();
    counts.observe_sequence(&["the", "dog", "barks"], &[0, 1, 2], 1.0);
    counts.observe_sequence(&["dog", "the"], &[1, 0], 1.0);
    counts.prepare();
    let inner = counts.delegate();
    assert_eq!(inner.transition_count(0, 1), 1.0);
    assert_eq!(inner.transition_count(1, 0), 0.0);
    assert_eq!(inner.initial_count(1), 0.0);
    assert_eq!(inner.final_count(0), 0.0);
    // emissions are not constrained
    assert_eq!(inner.emission_count(0, "the"), 2.0);
}

#[test]
fn grammar_from_json() {
    let json = r#"{
        "num_tags": 3,
        "valid_initials": [0],
        "valid_transitions": {"0": [1], "1": [2]},
        "valid_finals": [2]
    }"#;
    let grammar: Grammar = serde_json::from_str(json).expect("failed to parse grammar");
    grammar.validate().expect("invalid grammar");
    assert!(grammar.is_valid_transition(0, 1));
    assert!(grammar.followers(2).is_none());

    let bad = r#"{"num_tags": 1, "valid_initials": [3], "valid_transitions": {}, "valid_finals": []}"#;
    let grammar: Grammar = serde_json::from_str(bad).expect("failed to parse grammar");
    assert!(grammar.validate().is_err());
}
