use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Dense table of HMM state names. Index `i` is tag `i`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct StateNames {
    v: Vec<String>,
    m: HashMap<String, usize>,
}

impl From<Vec<String>> for StateNames {
    fn from(value: Vec<String>) -> Self {
        value.into_iter().collect()
    }
}

impl From<StateNames> for Vec<String> {
    fn from(value: StateNames) -> Self {
        value.v
    }
}

impl<S: AsRef<str>> FromIterator<S> for StateNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut states = Self::default();
        for s in iter {
            states.get_or_insert(s.as_ref());
        }
        states
    }
}

impl StateNames {
    /// Returns the tag for `name`, assigning the next free index if it is new.
    pub fn get_or_insert(&mut self, name: &str) -> usize {
        if let Some(&tag) = self.m.get(name) {
            return tag;
        }
        let tag = self.v.len();
        self.m.insert(name.to_string(), tag);
        self.v.push(name.to_string());
        tag
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.m.get(name).copied()
    }

    pub fn name_of(&self, tag: usize) -> Option<&str> {
        self.v.get(tag).map(|x| x.as_str())
    }

    pub fn names(&self) -> &[String] {
        &self.v
    }

    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }
}
