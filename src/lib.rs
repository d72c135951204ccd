pub mod error;
pub mod hmm;
pub mod states;

pub use error::{Error, Result};
pub use hmm::{
    constrained::GrammarConstrainedCounts,
    counts::Counts,
    emission::EmissionProbs,
    grammar::Grammar,
    logspace::{LogProb, LOG_ZERO},
    opt::CountsOpt,
    standard::StandardCounts,
};
pub use states::StateNames;
