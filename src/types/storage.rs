use std::collections::HashMap;

use crate::types::u256;

/// The persistent key/value store of the executing account.
///
/// Missing keys read as zero and storing zero removes the key again, so the
/// map only ever holds non-default slots. One invocation owns its storage
/// unless the host wires a shared instance through `evaluate_with_storage`.
#[derive(Debug, Default)]
pub struct Storage(HashMap<u256, u256>);

impl Storage {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity(capacity))
    }

    pub fn load(&self, key: &u256) -> u256 {
        self.0.get(key).copied().unwrap_or(u256::ZERO)
    }

    pub fn store(&mut self, key: u256, value: u256) {
        if value == u256::ZERO {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    /// Number of non-zero slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
