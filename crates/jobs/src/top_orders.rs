use rmr_core::retail::Order;
use rmr_core::{CoreError, ScoredItem};
use rmr_runtime::{Emitter, MapReduceJob};
use rmr_views::{TopNConfig, TopNMerger};

use crate::RESULT_KEY;

/// Ranks orders by their total, identified by invoice number.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopOrders {
    merger: TopNMerger,
}

impl TopOrders {
    pub fn new(n: usize) -> Self {
        Self::with_config(TopNConfig { n })
    }

    pub fn with_config(cfg: TopNConfig) -> Self {
        Self {
            merger: TopNMerger::new(cfg),
        }
    }
}

impl MapReduceJob for TopOrders {
    type Value = Vec<ScoredItem>;

    fn name(&self) -> &str {
        "top_orders"
    }

    fn map(
        &self,
        emit: &mut Emitter<Vec<ScoredItem>>,
        key: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        let order = Order::from_json(key, value)?;
        let total = order.total();
        emit.emit(RESULT_KEY, vec![ScoredItem::new(order.invoice_no, total)]);
        Ok(())
    }

    fn reduce(&self, values: Vec<Vec<ScoredItem>>) -> Vec<ScoredItem> {
        self.merger.merge(values)
    }
}
