//! Reusable view builders over scored aggregates.

use std::iter::Peekable;
use std::vec;

use serde::{Deserialize, Serialize};

use rmr_core::{Score, ScoredItem};

/// Anything the top-N merge can rank.
pub trait Scored {
    fn score(&self) -> Score;
}

impl Scored for ScoredItem {
    fn score(&self) -> Score {
        self.score
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TopNConfig {
    pub n: usize,
}

impl Default for TopNConfig {
    fn default() -> Self {
        Self { n: 10 }
    }
}

/// Bounded merge of descending-sorted lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopNMerger {
    cfg: TopNConfig,
}

impl TopNMerger {
    pub fn new(cfg: TopNConfig) -> Self {
        Self { cfg }
    }

    pub fn with_n(n: usize) -> Self {
        Self::new(TopNConfig { n })
    }

    pub fn n(&self) -> usize {
        self.cfg.n
    }

    pub fn merge<T: Scored>(&self, lists: Vec<Vec<T>>) -> Vec<T> {
        merge_top_n(lists, self.cfg.n)
    }
}

/// Extracts the `n` highest-scored items from `lists`, each of which must be
/// sorted by non-increasing score.
///
/// Every round scans the head of each non-empty list and takes the largest;
/// on equal scores the list that comes first wins. The result is
/// non-increasing and keeps the relative order of items drawn from the same
/// list. Scores compare with IEEE `>`, so `-0.0` and `0.0` tie; a NaN head
/// ranks below every number.
///
/// ```
/// use rmr_core::ScoredItem;
/// use rmr_views::merge_top_n;
///
/// let lists = vec![
///     vec![ScoredItem::new("A", 50.0), ScoredItem::new("B", 10.0)],
///     vec![ScoredItem::new("C", 30.0)],
/// ];
/// let top = merge_top_n(lists, 2);
/// assert_eq!(top, vec![ScoredItem::new("A", 50.0), ScoredItem::new("C", 30.0)]);
/// ```
pub fn merge_top_n<T: Scored>(lists: Vec<Vec<T>>, n: usize) -> Vec<T> {
    if n == 0 {
        return Vec::new();
    }

    let available: usize = lists.iter().map(Vec::len).sum();
    let mut cursors: Vec<Peekable<vec::IntoIter<T>>> = lists
        .into_iter()
        .map(|list| list.into_iter().peekable())
        .collect();
    let mut result = Vec::with_capacity(n.min(available));

    while result.len() < n {
        let mut best: Option<(usize, Score)> = None;
        for (idx, cursor) in cursors.iter_mut().enumerate() {
            let Some(head) = cursor.peek() else {
                continue;
            };
            let score = head.score();
            let wins = match best {
                None => true,
                Some((_, max)) => score > max || (max.is_nan() && !score.is_nan()),
            };
            if wins {
                best = Some((idx, score));
            }
        }

        // all lists drained
        let Some((idx, _)) = best else {
            break;
        };
        if let Some(item) = cursors[idx].next() {
            result.push(item);
        }
    }

    result
}
