//! Bucket-distribution uniformity score.

/// Negated mean squared deviation of bucket occupancy from the uniform
/// expectation `token_count / n_buckets`.
///
/// A perfectly even distribution scores `0.0`; anything else is negative, so
/// higher is better. With no buckets the distribution is not measured and the
/// score is `0.0`.
pub fn uniformity(bucket_counts: &[u64], token_count: usize) -> f64 {
    if bucket_counts.is_empty() {
        return 0.0;
    }
    let n_buckets = bucket_counts.len() as f64;
    let expected = token_count as f64 / n_buckets;
    let sum_sq: f64 = bucket_counts
        .iter()
        .map(|&count| {
            let deviance = expected - count as f64;
            deviance * deviance
        })
        .sum();
    -(sum_sq / n_buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn even_split_scores_zero() {
        assert_eq!(uniformity(&[2, 2, 2, 2], 8), 0.0);
    }

    #[test]
    fn no_buckets_scores_zero() {
        assert_eq!(uniformity(&[], 1000), 0.0);
    }

    #[test]
    fn expectation_is_not_rounded() {
        // expected = 1.5 per bucket, deviances are +-0.5
        assert_eq!(uniformity(&[1, 2], 3), -0.25);
    }

    #[test]
    fn skew_is_penalised() {
        // expected = 2, deviances 2, -2, 0, 0 -> 8 / 4
        assert_eq!(uniformity(&[0, 4, 2, 2], 8), -2.0);
        assert!(uniformity(&[8, 0, 0, 0], 8) < uniformity(&[0, 4, 2, 2], 8));
    }

    proptest! {
        #[test]
        fn never_positive(counts in proptest::collection::vec(0u64..10_000, 1..256)) {
            let total: u64 = counts.iter().sum();
            let score = uniformity(&counts, total as usize);
            prop_assert!(score <= 0.0);
            prop_assert!(score.is_finite());
        }

        #[test]
        fn uniform_counts_score_zero(per_bucket in 0u64..1_000, n in 1usize..512) {
            let counts = vec![per_bucket; n];
            prop_assert_eq!(uniformity(&counts, per_bucket as usize * n), 0.0);
        }
    }
}
