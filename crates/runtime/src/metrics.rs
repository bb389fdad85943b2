use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Clone, Default)]
pub struct MetricsRegistry {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    records_in: AtomicU64,
    records_malformed: AtomicU64,
    map_emits: AtomicU64,
    reduce_calls: AtomicU64,
    partitions_completed: AtomicU64,
}

impl MetricsRegistry {
    pub fn inc_records_in(&self, delta: u64) {
        self.inner.records_in.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_records_malformed(&self, delta: u64) {
        self.inner.records_malformed.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_map_emits(&self, delta: u64) {
        self.inner.map_emits.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_reduce_calls(&self, delta: u64) {
        self.inner.reduce_calls.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_partitions_completed(&self, delta: u64) {
        self.inner
            .partitions_completed
            .fetch_add(delta, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_in: self.inner.records_in.load(Ordering::Relaxed),
            records_malformed: self.inner.records_malformed.load(Ordering::Relaxed),
            map_emits: self.inner.map_emits.load(Ordering::Relaxed),
            reduce_calls: self.inner.reduce_calls.load(Ordering::Relaxed),
            partitions_completed: self.inner.partitions_completed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_in: u64,
    pub records_malformed: u64,
    pub map_emits: u64,
    pub reduce_calls: u64,
    pub partitions_completed: u64,
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            label: &'a str,
            #[serde(flatten)]
            counters: &'a MetricsSnapshot,
            elapsed_ms: Option<u128>,
        }

        let payload = Snapshot {
            label,
            counters: self,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

pub struct JobTimer {
    start: Instant,
}

impl JobTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_counters() {
        let metrics = MetricsRegistry::default();
        let worker = metrics.clone();
        worker.inc_records_in(3);
        worker.inc_map_emits(2);
        metrics.inc_records_malformed(1);

        let snap = metrics.snapshot();
        assert_eq!(snap.records_in, 3);
        assert_eq!(snap.map_emits, 2);
        assert_eq!(snap.records_malformed, 1);
        assert_eq!(snap.reduce_calls, 0);
    }

    #[test]
    fn json_line_flattens_counters() {
        let metrics = MetricsRegistry::default();
        metrics.inc_reduce_calls(5);
        let line = metrics
            .snapshot()
            .to_json_line("top_orders", Some(Duration::from_millis(12)));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["label"], "top_orders");
        assert_eq!(value["reduce_calls"], 5);
        assert_eq!(value["elapsed_ms"], 12);
    }
}
