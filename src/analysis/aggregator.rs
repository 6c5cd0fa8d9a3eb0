//! Claim aggregation and statistics.
//!
//! Pure functions over an extracted claim sequence: summary statistics
//! for the dashboard and the display sort order. Everything here is
//! recomputed from scratch on each call; nothing is incremental.

use crate::models::Claim;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Summary statistics derived from a claim sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimStats {
    /// Total number of claims.
    pub total: usize,
    /// Mean significance score (0.0 for an empty sequence).
    pub avg_significance: f64,
    /// Number of claims flagged as predictions.
    pub predictions: usize,
    /// Claims per category, in first-occurrence order.
    pub category_counts: Vec<(String, usize)>,
    /// Claims per significance bucket (floor of the score), ascending.
    pub significance_buckets: Vec<(i64, usize)>,
}

/// Compute summary statistics for a claim sequence.
///
/// The empty sequence yields an all-zero `ClaimStats`; the mean is
/// defined as 0.0 in that case rather than dividing by zero.
pub fn summarize(claims: &[Claim]) -> ClaimStats {
    let total = claims.len();

    let avg_significance = if total == 0 {
        0.0
    } else {
        claims.iter().map(|c| c.significance).sum::<f64>() / total as f64
    };

    let predictions = claims.iter().filter(|c| c.is_prediction).count();

    ClaimStats {
        total,
        avg_significance,
        predictions,
        category_counts: category_counts(claims),
        significance_buckets: significance_buckets(claims),
    }
}

/// Count claims per category, preserving first-occurrence order.
pub fn category_counts(claims: &[Claim]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for claim in claims {
        let name = claim.category.to_string();
        match counts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }

    counts
}

/// Count claims per significance bucket, ascending by bucket.
pub fn significance_buckets(claims: &[Claim]) -> Vec<(i64, usize)> {
    let mut buckets: std::collections::BTreeMap<i64, usize> = std::collections::BTreeMap::new();

    for claim in claims {
        *buckets.entry(claim.significance_bucket()).or_default() += 1;
    }

    buckets.into_iter().collect()
}

/// Sort claims by significance, highest first.
///
/// The sort is stable: claims with equal significance keep their
/// arrival order.
pub fn sort_by_significance(claims: &mut [Claim]) {
    claims.sort_by(|a, b| {
        b.significance
            .partial_cmp(&a.significance)
            .unwrap_or(Ordering::Equal)
    });
}
