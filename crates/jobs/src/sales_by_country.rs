use rmr_core::retail::Order;
use rmr_core::CoreError;
use rmr_runtime::{Emitter, MapReduceJob};

/// Sums order totals per country.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesByCountry;

impl MapReduceJob for SalesByCountry {
    type Value = f64;

    fn name(&self) -> &str {
        "sales_by_country"
    }

    fn map(&self, emit: &mut Emitter<f64>, key: &str, value: &str) -> Result<(), CoreError> {
        let order = Order::from_json(key, value)?;
        let total = order.total();
        emit.emit(order.country, total);
        Ok(())
    }

    fn reduce(&self, values: Vec<f64>) -> f64 {
        values.into_iter().sum()
    }
}
