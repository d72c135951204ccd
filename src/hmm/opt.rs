use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Smoothing options for emission distributions.
///
/// Flatten into a training driver's parser with `#[command(flatten)]`, or
/// read from a config file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Args, Serialize, Deserialize)]
#[serde(default)]
pub struct CountsOpt {
    /// Weight of the unknown-word mass per singleton (plus one) of a tag.
    #[arg(long, default_value_t = 1.0)]
    pub unknown_weight: f64,
    /// Largest tag-word count still treated as a singleton.
    #[arg(long, default_value_t = 1.0)]
    pub singleton_threshold: f64,
}

impl Default for CountsOpt {
    fn default() -> Self {
        Self { unknown_weight: 1.0, singleton_threshold: 1.0 }
    }
}

impl CountsOpt {
    pub fn validate(&self) -> Result<()> {
        for v in [self.unknown_weight, self.singleton_threshold] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidAmount(v));
            }
        }
        Ok(())
    }
}
