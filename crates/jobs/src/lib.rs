//! The retail aggregation jobs: sales per country, top countries, top orders.

use anyhow::Result;
use tracing::debug;

use rmr_core::{Record, ScoredItem};
use rmr_runtime::{run_job, JobOutput, RuntimeConfig};

pub mod sales_by_country;
pub mod synthetic;
pub mod top_countries;
pub mod top_orders;

pub use sales_by_country::SalesByCountry;
pub use synthetic::synthetic_orders;
pub use top_countries::TopCountries;
pub use top_orders::TopOrders;

/// The single key the ranking jobs emit under, so all candidates meet in one reduce.
pub const RESULT_KEY: &str = "result";

/// The ranking a top-N job produced; empty when no record was mapped.
pub fn ranking(output: &JobOutput<Vec<ScoredItem>>) -> &[ScoredItem] {
    output
        .results
        .get(RESULT_KEY)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Totals sales per country over `orders`, then ranks the countries.
pub fn top_countries_from_orders(
    orders: Vec<Record>,
    n: usize,
    cfg: &RuntimeConfig,
) -> Result<JobOutput<Vec<ScoredItem>>> {
    let totals = run_job(&SalesByCountry, orders, cfg)?;
    debug!(countries = totals.results.len(), "ranking country totals");
    run_job(&TopCountries::new(n), totals.to_records()?, cfg)
}
