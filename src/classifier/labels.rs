use std::collections::HashMap;
use tracing::warn;

use crate::constants::DEFAULT_LABELS;

/// Immutable class-index to label-name mapping.
///
/// Derived once from the checkpoint's `id2label` table (or the fixed default
/// order) and never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    names: Vec<String>,
}

impl Default for LabelMap {
    fn default() -> Self {
        Self {
            names: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LabelMap {
    /// Builds a map from a checkpoint `id2label` table, title-casing names.
    ///
    /// A missing, empty, or inconsistent table (non-numeric keys, gaps)
    /// falls back to the default `[Left, Center, Right]` order.
    pub fn from_id2label(table: Option<&HashMap<String, String>>) -> Self {
        let Some(table) = table else {
            return Self::default();
        };
        if table.is_empty() {
            return Self::default();
        }

        let mut names = vec![String::new(); table.len()];
        for (key, value) in table {
            let Ok(idx) = key.parse::<usize>() else {
                warn!(key = %key, "non-numeric id2label key, using default labels");
                return Self::default();
            };
            if idx >= names.len() {
                warn!(index = idx, "id2label index gap, using default labels");
                return Self::default();
            }
            names[idx] = title_case(value);
        }
        if names.iter().any(|n| n.is_empty()) {
            warn!("incomplete id2label table, using default labels");
            return Self::default();
        }

        Self { names }
    }

    pub fn name(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Title-cases a label: first letter of each word upper, the rest lower.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
