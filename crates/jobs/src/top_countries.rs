use rmr_core::{CoreError, ScoredItem};
use rmr_runtime::{Emitter, MapReduceJob};
use rmr_views::{TopNConfig, TopNMerger};

use crate::RESULT_KEY;

/// Ranks countries by their aggregated sales.
///
/// Input records are `(country, total)` pairs as produced by
/// [`SalesByCountry`](crate::SalesByCountry), the total as a number string.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopCountries {
    merger: TopNMerger,
}

impl TopCountries {
    pub fn new(n: usize) -> Self {
        Self::with_config(TopNConfig { n })
    }

    pub fn with_config(cfg: TopNConfig) -> Self {
        Self {
            merger: TopNMerger::new(cfg),
        }
    }
}

impl MapReduceJob for TopCountries {
    type Value = Vec<ScoredItem>;

    fn name(&self) -> &str {
        "top_countries"
    }

    fn map(
        &self,
        emit: &mut Emitter<Vec<ScoredItem>>,
        key: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        let total: f64 = value
            .trim()
            .parse()
            .map_err(|e| CoreError::malformed(key, format!("total {value:?}: {e}")))?;
        if !total.is_finite() {
            return Err(CoreError::malformed(key, format!("total {value:?} is not finite")));
        }
        emit.emit(RESULT_KEY, vec![ScoredItem::new(key, total)]);
        Ok(())
    }

    fn reduce(&self, values: Vec<Vec<ScoredItem>>) -> Vec<ScoredItem> {
        self.merger.merge(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_each_total_in_a_single_item_list() {
        let mut emit = Emitter::new();
        TopCountries::default().map(&mut emit, "Germany", " 2210.5 ").unwrap();
        let emitted: Vec<_> = emit.into_iter().collect();
        assert_eq!(
            emitted,
            vec![(RESULT_KEY.to_string(), vec![ScoredItem::new("Germany", 2210.5)])]
        );
    }

    #[test]
    fn rejects_unparseable_totals() {
        let job = TopCountries::default();
        for bad in ["", "abc", "NaN", "inf"] {
            let mut emit = Emitter::new();
            assert!(job.map(&mut emit, "Spain", bad).is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn reduce_keeps_the_n_largest() {
        let job = TopCountries::new(2);
        let top = job.reduce(vec![
            vec![ScoredItem::new("France", 10.0)],
            vec![ScoredItem::new("EIRE", 30.0), ScoredItem::new("Spain", 5.0)],
            vec![ScoredItem::new("Germany", 20.0)],
        ]);
        assert_eq!(top, vec![ScoredItem::new("EIRE", 30.0), ScoredItem::new("Germany", 20.0)]);
        // feeding the output back in keeps it intact
        assert_eq!(job.reduce(vec![top.clone()]), top);
    }
}
