//! Error types for count stores, priors and grammars.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A tag index outside `0..num_tags`
    #[error("tag {tag} out of range (number of tags: {num_tags})")]
    TagOutOfRange { tag: usize, num_tags: usize },

    /// A state name missing from the state table
    #[error("unknown state: {0}")]
    UnknownState(String),

    /// Smoothing mass or weight that is negative or not finite
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
