//! Local runtime for retail map/reduce jobs: buffered processing, partitioned runs, ingest.

use tracing_subscriber::EnvFilter;

pub mod config;
pub mod job;
pub mod jsonl;
pub mod metrics;
pub mod processor;
pub mod runner;

pub use config::RuntimeConfig;
pub use job::{Emitter, MapReduceJob};
pub use metrics::{JobTimer, MetricsRegistry, MetricsSnapshot};
pub use processor::MapReduceProcessor;
pub use runner::{run_job, JobOutput};

/// Installs the fmt subscriber on stderr; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
