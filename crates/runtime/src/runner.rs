//! Partitioned, in-process execution of a [`MapReduceJob`].

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use rmr_core::{CoreError, Record};

use crate::config::RuntimeConfig;
use crate::job::MapReduceJob;
use crate::metrics::{JobTimer, MetricsRegistry, MetricsSnapshot};
use crate::processor::MapReduceProcessor;

#[derive(Debug, Clone)]
pub struct JobOutput<V> {
    pub job: String,
    pub results: BTreeMap<String, V>,
    pub metrics: MetricsSnapshot,
    pub elapsed: Duration,
}

impl<V: Serialize> JobOutput<V> {
    /// Renders each result as a record whose value is the JSON form of `V`,
    /// ready to feed into a follow-up job.
    pub fn to_records(&self) -> Result<Vec<Record>, CoreError> {
        self.results
            .iter()
            .map(|(key, value)| -> Result<Record, CoreError> {
                Ok(Record::new(key.clone(), serde_json::to_string(value)?))
            })
            .collect()
    }
}

/// Shard of `key` in `[0; partitions)`.
pub fn partition_for(key: &str, partitions: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % partitions.max(1) as u64) as usize
}

/// Runs `job` over `records`.
///
/// Records are spread over `cfg.partitions` partitions by key. Each partition
/// is mapped and pre-reduced by its own processor on a scoped thread, and the
/// partial results are folded by a final processor into the job output.
pub fn run_job<J: MapReduceJob>(
    job: &J,
    records: Vec<Record>,
    cfg: &RuntimeConfig,
) -> Result<JobOutput<J::Value>> {
    cfg.validate()?;
    let metrics = MetricsRegistry::default();
    let timer = JobTimer::start();
    info!(
        job = job.name(),
        records = records.len(),
        partitions = cfg.partitions,
        "starting map/reduce job"
    );

    let mut partitions: Vec<Vec<Record>> = (0..cfg.partitions).map(|_| Vec::new()).collect();
    for record in records {
        let idx = partition_for(&record.key, cfg.partitions);
        partitions[idx].push(record);
    }

    let partials = if cfg.partitions == 1 {
        partitions
            .into_iter()
            .enumerate()
            .map(|(idx, part)| run_partition(job, idx, part, cfg, &metrics))
            .collect::<Result<Vec<_>, CoreError>>()?
    } else {
        thread::scope(|scope| -> Result<Vec<_>> {
            let handles: Vec<_> = partitions
                .into_iter()
                .enumerate()
                .map(|(idx, part)| {
                    let metrics = metrics.clone();
                    scope.spawn(move || run_partition(job, idx, part, cfg, &metrics))
                })
                .collect();

            let mut partials = Vec::with_capacity(handles.len());
            for handle in handles {
                let partial = handle
                    .join()
                    .map_err(|_| anyhow!("partition worker of job {} panicked", job.name()))??;
                partials.push(partial);
            }
            Ok(partials)
        })?
    };

    let mut master = MapReduceProcessor::new(job, cfg.buffer_size, metrics.clone());
    for partial in partials {
        for (key, value) in partial {
            master.collect(key, value);
        }
    }
    let results = master.into_results();

    let elapsed = timer.elapsed();
    let snapshot = metrics.snapshot();
    info!(
        job = job.name(),
        keys = results.len(),
        malformed = snapshot.records_malformed,
        elapsed_ms = elapsed.as_millis() as u64,
        "finished map/reduce job"
    );

    Ok(JobOutput {
        job: job.name().to_string(),
        results,
        metrics: snapshot,
        elapsed,
    })
}

fn run_partition<J: MapReduceJob>(
    job: &J,
    partition: usize,
    records: Vec<Record>,
    cfg: &RuntimeConfig,
    metrics: &MetricsRegistry,
) -> Result<BTreeMap<String, J::Value>, CoreError> {
    debug!(job = job.name(), partition, records = records.len(), "map partition starting");
    let mut processor = MapReduceProcessor::new(job, cfg.buffer_size, metrics.clone());

    for record in records {
        metrics.inc_records_in(1);
        if let Err(err) = processor.process(&record.key, &record.value) {
            metrics.inc_records_malformed(1);
            if cfg.fail_on_malformed {
                return Err(err);
            }
            warn!(job = job.name(), partition, key = %record.key, error = %err, "skipping record");
        }
    }

    let results = processor.into_results();
    metrics.inc_partitions_completed(1);
    debug!(job = job.name(), partition, keys = results.len(), "map partition done");
    Ok(results)
}
