use std::collections::BTreeMap;

use crate::core::io::table::{ReactionTable, TableError};

/// Tag counts at or above this value share the last bucket.
pub const OVERFLOW_BUCKET_START: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct TagBucket {
    pub label: String,
    pub count: usize,
    /// Percentage of all rows, rounded to two decimals.
    pub dataset_fraction: f64,
}

/// Distribution of tag counts over a dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagStatistics {
    buckets: Vec<TagBucket>,
    total: usize,
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
}

impl TagStatistics {
    /// One bucket per observed tag count below 10 (ascending) followed by a
    /// `10+` bucket, which is present even when empty.
    ///
    /// Buckets are keyed by value: a count of 12 always lands in `10+` and a
    /// count of 3 always gets its own bucket, whatever order or frequency the
    /// counts are seen in. Taking the first ten distinct values as they are
    /// observed would instead let large counts claim single-value buckets.
    pub fn from_counts(counts: &[usize]) -> Self {
        let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
        let mut overflow = 0;
        for &n in counts {
            if n >= OVERFLOW_BUCKET_START {
                overflow += 1;
            } else {
                *histogram.entry(n).or_default() += 1;
            }
        }

        let total = counts.len();
        let mut buckets: Vec<TagBucket> = histogram
            .into_iter()
            .map(|(tags, count)| TagBucket {
                label: tags.to_string(),
                count,
                dataset_fraction: percentage(count, total),
            })
            .collect();
        buckets.push(TagBucket {
            label: format!("{}+", OVERFLOW_BUCKET_START),
            count: overflow,
            dataset_fraction: percentage(overflow, total),
        });

        Self { buckets, total }
    }

    pub fn buckets(&self) -> &[TagBucket] {
        &self.buckets
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Columns `num_tags,counts,dataset_fraction`.
    pub fn to_table(&self) -> Result<ReactionTable, TableError> {
        let mut table = ReactionTable::new(["num_tags", "counts", "dataset_fraction"]);
        for bucket in &self.buckets {
            table.push_row(vec![
                bucket.label.clone(),
                bucket.count.to_string(),
                format!("{:.2}", bucket.dataset_fraction),
            ])?;
        }
        Ok(table)
    }
}
