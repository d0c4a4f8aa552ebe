//! Maps the model's class probabilities to a labelled decision
//!
//! Each probability is rounded to 0 or 1 first (ties to even) and the first
//! maximum of the rounded pair picks the class. This is not a plain argmax:
//! `[0.5, 0.5]` and `[0.4, 0.45]` both round to `[0, 0]` and resolve to
//! class 0, and `[0.6, 0.9]` rounds to `[1, 1]` and also resolves to class 0.
//!
//! NaN probabilities are not guarded. A NaN wins the argmax and the
//! confidence becomes NaN, which serializes as JSON `null`.

use crate::models::{ClassificationResult, ProbabilityVector, SpamLabel};

const SPAM_CLASS: usize = 1;

pub fn decide(probs: &ProbabilityVector) -> ClassificationResult {
    let rounded = probs.as_array().map(f64::round_ties_even);
    let predicted_class = first_max_index(&rounded);
    let confidence = round_to_hundredths(probs.get(predicted_class) * 100.0);
    let is_spam = predicted_class == SPAM_CLASS;

    ClassificationResult {
        is_spam,
        confidence,
        label: if is_spam {
            SpamLabel::Spam
        } else {
            SpamLabel::NotSpam
        },
    }
}

/// Index of the first maximum; the first NaN, if any, counts as the maximum
fn first_max_index(values: &[f64]) -> usize {
    if let Some(idx) = values.iter().position(|v| v.is_nan()) {
        return idx;
    }

    let mut best = 0;
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = idx;
        }
    }
    best
}

/// Correctly rounded to two decimals, based on the exact binary value
fn round_to_hundredths(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
