use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use rmr_core::CoreError;

use crate::job::{Emitter, MapReduceJob};
use crate::metrics::MetricsRegistry;

/// Buffered map/reduce over one stream of records.
///
/// Emitted values are buffered per key. A buffer that grows past
/// `buffer_size` is reduced to a single value on the spot, and every buffer is
/// reduced once more when the results are taken.
pub struct MapReduceProcessor<'j, J: MapReduceJob> {
    job: &'j J,
    buffer_size: usize,
    collectors: HashMap<String, Vec<J::Value>>,
    metrics: MetricsRegistry,
}

impl<'j, J: MapReduceJob> MapReduceProcessor<'j, J> {
    pub fn new(job: &'j J, buffer_size: usize, metrics: MetricsRegistry) -> Self {
        Self {
            job,
            buffer_size: buffer_size.max(1),
            collectors: HashMap::new(),
            metrics,
        }
    }

    /// Maps one record and buffers what it emits. Nothing is buffered when map fails.
    pub fn process(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut emitter = Emitter::new();
        self.job.map(&mut emitter, key, value)?;
        self.metrics.inc_map_emits(emitter.len() as u64);
        for (key, value) in emitter {
            self.collect(key, value);
        }
        Ok(())
    }

    /// Buffers an already mapped or pre-aggregated value for `key`.
    pub fn collect(&mut self, key: String, value: J::Value) {
        let buffer = self.collectors.entry(key).or_default();
        buffer.push(value);
        if buffer.len() > self.buffer_size {
            trace!(job = self.job.name(), buffered = buffer.len(), "reducing full buffer");
            let values = std::mem::take(buffer);
            buffer.push(self.job.reduce(values));
            self.metrics.inc_reduce_calls(1);
        }
    }

    pub fn keys(&self) -> usize {
        self.collectors.len()
    }

    /// Reduces every buffer and returns one value per key seen.
    pub fn into_results(self) -> BTreeMap<String, J::Value> {
        let Self {
            job,
            collectors,
            metrics,
            ..
        } = self;

        collectors
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, values)| {
                metrics.inc_reduce_calls(1);
                (key, job.reduce(values))
            })
            .collect()
    }
}
