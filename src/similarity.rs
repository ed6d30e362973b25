// Motion Lock - Gesture similarity
//
// Compares a replay against the recorded reference, one axis at a time.
// Every axis must pass the configured threshold on its own, so agreement on
// two axes cannot hide divergence on the third.
//
// Unequal lengths: only indices present in both sequences contribute. The
// unmatched tail of the longer sequence is ignored rather than zero-padded,
// and the length guard in `LockConfig::min_length_ratio` keeps a short
// prefix from matching a long recording.
//
// Sums are accumulated in i64 and converted once per mean, which keeps both
// metrics exactly symmetric under argument swap.

use crate::config::{LockConfig, Metric};
use crate::events::Sample;

pub const AXES: usize = 3;

/// Outcome of one comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchReport {
    pub matched: bool,
    pub metric: Metric,
    /// Per-axis score, indexed x, y, z.
    pub scores: [f64; AXES],
}

/// Compare two gestures with the metric and threshold from `config`.
pub fn compare(reference: &[Sample], attempt: &[Sample], config: &LockConfig) -> MatchReport {
    let mut scores = [0.0; AXES];
    for (axis, score) in scores.iter_mut().enumerate() {
        *score = match config.metric {
            Metric::MeanAbsoluteDistance => mean_abs_distance(reference, attempt, axis),
            Metric::CrossCorrelation => peak_cross_correlation(reference, attempt, axis),
        };
    }

    let overlap = reference.len().min(attempt.len());
    let matched = overlap > 0
        && lengths_compatible(reference.len(), attempt.len(), config.min_length_ratio)
        && scores
            .iter()
            .all(|&score| config.metric.accepts(score, config.threshold));

    MatchReport {
        matched,
        metric: config.metric,
        scores,
    }
}

/// True when the shorter length is at least `ratio` of the longer one.
fn lengths_compatible(a: usize, b: usize, ratio: f64) -> bool {
    let (short, long) = if a <= b { (a, b) } else { (b, a) };
    short as f64 >= ratio * long as f64
}

/// Mean of `|a[i] - b[i]|` over the common prefix. No overlap scores
/// infinitely far.
pub fn mean_abs_distance(a: &[Sample], b: &[Sample], axis: usize) -> f64 {
    let overlap = a.len().min(b.len());
    if overlap == 0 {
        return f64::INFINITY;
    }

    let total: i64 = a
        .iter()
        .zip(b)
        .map(|(sa, sb)| (i64::from(sa.axis(axis)) - i64::from(sb.axis(axis))).abs())
        .sum();
    total as f64 / overlap as f64
}

/// Peak over shifts `s` in `[-(n-1), n-1]` of the mean of `a[i] * b[i + s]`
/// over the indices where both exist. No overlap scores `-inf`.
pub fn peak_cross_correlation(a: &[Sample], b: &[Sample], axis: usize) -> f64 {
    let n = a.len().max(b.len()) as isize;
    if a.is_empty() || b.is_empty() {
        return f64::NEG_INFINITY;
    }

    let mut best = f64::NEG_INFINITY;
    for shift in -(n - 1)..=(n - 1) {
        if let Some(corr) = correlation_at(a, b, axis, shift) {
            best = best.max(corr);
        }
    }
    best
}

fn correlation_at(a: &[Sample], b: &[Sample], axis: usize, shift: isize) -> Option<f64> {
    // i walks `a`, i + shift walks `b`.
    let start = 0isize.max(-shift);
    let end = (a.len() as isize).min(b.len() as isize - shift);
    if start >= end {
        return None;
    }

    let mut total: i64 = 0;
    for i in start..end {
        let va = i64::from(a[i as usize].axis(axis));
        let vb = i64::from(b[(i + shift) as usize].axis(axis));
        total += va * vb;
    }
    Some(total as f64 / (end - start) as f64)
}
