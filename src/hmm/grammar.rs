use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{states::StateNames, Error, Result};

/// Permitted sequence structure: which tags may start a sequence, follow a
/// given tag, or end a sequence.
///
/// A tag with no entry in `valid_transitions` may not be followed by
/// anything, the same as an entry with an empty set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grammar {
    num_tags: usize,
    valid_initials: HashSet<usize>,
    valid_transitions: HashMap<usize, HashSet<usize>>,
    valid_finals: HashSet<usize>,
}

impl Grammar {
    pub fn new(
        num_tags: usize,
        valid_initials: HashSet<usize>,
        valid_transitions: HashMap<usize, HashSet<usize>>,
        valid_finals: HashSet<usize>,
    ) -> Result<Self> {
        let this = Self { num_tags, valid_initials, valid_transitions, valid_finals };
        this.validate()?;
        Ok(this)
    }

    /// Builds a grammar from state names, resolving each through `states`.
    pub fn from_names(
        states: &StateNames,
        initials: &[&str],
        transitions: &[(&str, &str)],
        finals: &[&str],
    ) -> Result<Self> {
        let resolve = |name: &str| states.index_of(name).ok_or_else(|| Error::UnknownState(name.to_string()));
        let valid_initials = initials.iter().map(|s| resolve(s)).collect::<Result<_>>()?;
        let valid_finals = finals.iter().map(|s| resolve(s)).collect::<Result<_>>()?;
        let mut valid_transitions: HashMap<usize, HashSet<usize>> = HashMap::new();
        for (from, to) in transitions {
            valid_transitions.entry(resolve(from)?).or_default().insert(resolve(to)?);
        }
        Self::new(states.len(), valid_initials, valid_transitions, valid_finals)
    }

    /// Checks every tag against `num_tags`; needed after deserializing.
    pub fn validate(&self) -> Result<()> {
        let num_tags = self.num_tags;
        let tags = self
            .valid_initials
            .iter()
            .chain(&self.valid_finals)
            .chain(self.valid_transitions.keys())
            .chain(self.valid_transitions.values().flatten());
        for &tag in tags {
            if tag >= num_tags {
                return Err(Error::TagOutOfRange { tag, num_tags });
            }
        }
        Ok(())
    }

    pub fn num_tags(&self) -> usize {
        self.num_tags
    }

    pub fn is_valid_initial(&self, tag: usize) -> bool {
        self.valid_initials.contains(&tag)
    }

    pub fn is_valid_final(&self, tag: usize) -> bool {
        self.valid_finals.contains(&tag)
    }

    pub fn is_valid_transition(&self, tag_i: usize, tag_j: usize) -> bool {
        self.valid_transitions.get(&tag_i).is_some_and(|s| s.contains(&tag_j))
    }

    /// Tags allowed after `tag`, or `None` when `tag` has no entry.
    pub fn followers(&self, tag: usize) -> Option<&HashSet<usize>> {
        self.valid_transitions.get(&tag)
    }
}
