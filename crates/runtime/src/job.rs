//! The map/reduce job contract.

use std::vec;

use serde::Serialize;

use rmr_core::CoreError;

/// Collects the `(key, value)` pairs a single `map` call emits.
#[derive(Debug)]
pub struct Emitter<V> {
    emitted: Vec<(String, V)>,
}

impl<V> Default for Emitter<V> {
    fn default() -> Self {
        Self {
            emitted: Vec::new(),
        }
    }
}

impl<V> Emitter<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, key: impl Into<String>, value: V) {
        self.emitted.push((key.into(), value));
    }

    pub fn len(&self) -> usize {
        self.emitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitted.is_empty()
    }
}

impl<V> IntoIterator for Emitter<V> {
    type Item = (String, V);
    type IntoIter = vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.emitted.into_iter()
    }
}

/// A map/reduce job over stored `(key, value)` records.
///
/// `reduce` is applied to partial buffers and again to its own outputs, so it
/// has to accept previously reduced values alongside fresh map emissions.
pub trait MapReduceJob: Send + Sync {
    type Value: Serialize + Send;

    fn name(&self) -> &str;

    /// Turns one record into zero or more emissions.
    fn map(
        &self,
        emit: &mut Emitter<Self::Value>,
        key: &str,
        value: &str,
    ) -> Result<(), CoreError>;

    /// Folds the buffered values of one key into one.
    fn reduce(&self, values: Vec<Self::Value>) -> Self::Value;
}
