//! Shared mathematical utilities for classifier outputs.

/// Tolerance used when checking whether scores already sum to one.
pub const DISTRIBUTION_TOLERANCE: f32 = 1e-3;

/// Index of the largest score.
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Numerically stable softmax.
///
/// # Arguments
/// * `logits` - Raw scores
///
/// # Returns
/// Probabilities in the same order, summing to 1.0
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return exps;
    }
    exps.into_iter().map(|x| x / sum).collect()
}

/// Whether `scores` already form a probability distribution.
pub fn is_distribution(scores: &[f32]) -> bool {
    if scores.is_empty() || scores.iter().any(|x| !x.is_finite() || *x < 0.0) {
        return false;
    }
    let sum: f32 = scores.iter().sum();
    (sum - 1.0).abs() <= DISTRIBUTION_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[0.1, 0.2, 0.7]), Some(2));
    }

    #[test]
    fn test_argmax_ties_go_to_first() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), Some(0));
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[2.0, 1.0, 0.1]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[0] > probs[1] && probs[1] > probs[2]);
    }

    #[test]
    fn test_softmax_large_logits() {
        let probs = softmax(&[1000.0, 1000.0, 1000.0]);
        for p in probs {
            assert!((p - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_is_distribution() {
        assert!(is_distribution(&[0.2, 0.3, 0.5]));
        assert!(!is_distribution(&[2.0, 1.0, 0.1]));
        assert!(!is_distribution(&[-0.5, 1.0, 0.5]));
        assert!(!is_distribution(&[]));
    }
}
