use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use rmr_core::Record;
use rmr_jobs::{
    synthetic_orders, top_countries_from_orders, SalesByCountry, TopCountries, TopOrders,
};
use rmr_runtime::jsonl::{
    read_key_value_records, read_order_records, records_from_orders, write_results,
};
use rmr_runtime::{init_tracing, run_job, JobOutput, RuntimeConfig};
use rmr_views::TopNConfig;

/// Map/reduce aggregations over online retail orders.
#[derive(Parser, Debug)]
#[command(name = "retail_mr", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Total sales per country.
    SalesByCountry {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Countries with the largest sales.
    TopCountries {
        #[command(flatten)]
        run: RunArgs,
        #[arg(long, default_value_t = TopNConfig::default().n)]
        top_n: usize,
        /// Treat --input as `{"key": country, "value": total}` lines.
        #[arg(long, requires = "input")]
        totals: bool,
    },
    /// Orders with the largest totals.
    TopOrders {
        #[command(flatten)]
        run: RunArgs,
        #[arg(long, default_value_t = TopNConfig::default().n)]
        top_n: usize,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON-lines file, one order per line.
    #[arg(long, conflicts_with = "synthetic")]
    input: Option<PathBuf>,
    /// Generate this many orders instead of reading a file.
    #[arg(long)]
    synthetic: Option<usize>,
    /// Read at most this many records.
    #[arg(long)]
    limit: Option<usize>,
    /// Runtime config as JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    partitions: Option<usize>,
    #[arg(long)]
    buffer_size: Option<usize>,
    #[arg(long)]
    fail_on_malformed: bool,
    /// Print a metrics line to stderr when done.
    #[arg(long)]
    metrics: bool,
}

impl RunArgs {
    fn runtime_config(&self) -> Result<RuntimeConfig> {
        let mut cfg = match &self.config {
            Some(path) => RuntimeConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RuntimeConfig::default(),
        };
        if let Some(partitions) = self.partitions {
            cfg.partitions = partitions;
        }
        if let Some(buffer_size) = self.buffer_size {
            cfg.buffer_size = buffer_size;
        }
        cfg.fail_on_malformed |= self.fail_on_malformed;
        cfg.validate()?;
        Ok(cfg)
    }

    fn order_records(&self) -> Result<Vec<Record>> {
        match (&self.input, self.synthetic) {
            (Some(path), _) => read_order_records(path, self.limit)
                .with_context(|| format!("reading orders from {}", path.display())),
            (None, Some(count)) => {
                let count = self.limit.map_or(count, |limit| limit.min(count));
                Ok(records_from_orders(&synthetic_orders(count))?)
            }
            (None, None) => bail!("pass --input <PATH> or --synthetic <COUNT>"),
        }
    }

    fn totals_records(&self) -> Result<Vec<Record>> {
        let Some(path) = &self.input else {
            bail!("--totals needs --input <PATH>");
        };
        read_key_value_records(path, self.limit)
            .with_context(|| format!("reading totals from {}", path.display()))
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    info!(command = ?cli.command, "retail_mr starting");

    match cli.command {
        Command::SalesByCountry { run } => {
            let cfg = run.runtime_config()?;
            let out = run_job(&SalesByCountry, run.order_records()?, &cfg)?;
            report(&run, &out)
        }
        Command::TopCountries { run, top_n, totals } => {
            let cfg = run.runtime_config()?;
            let out = if totals {
                run_job(&TopCountries::new(top_n), run.totals_records()?, &cfg)?
            } else {
                top_countries_from_orders(run.order_records()?, top_n, &cfg)?
            };
            report(&run, &out)
        }
        Command::TopOrders { run, top_n } => {
            let cfg = run.runtime_config()?;
            let out = run_job(&TopOrders::new(top_n), run.order_records()?, &cfg)?;
            report(&run, &out)
        }
    }
}

fn report<V: Serialize>(run: &RunArgs, out: &JobOutput<V>) -> Result<()> {
    write_results(io::stdout().lock(), &out.results)?;
    if run.metrics {
        eprintln!("{}", out.metrics.to_json_line(&out.job, Some(out.elapsed)));
    }
    Ok(())
}
