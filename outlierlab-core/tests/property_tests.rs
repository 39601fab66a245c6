//! Property tests for the statistical invariants.
//!
//! Uses proptest to verify:
//! 1. Quartile ordering and non-negative IQR
//! 2. Tiers are disjoint and graded only among fence outliers
//! 3. Region percentages sum to 100 whenever any outlier exists
//! 4. Zero filtering is idempotent
//! 5. Box-and-whisker fliers at k = 1.5 coincide with IQR fence outliers

use proptest::prelude::*;

use outlierlab_core::classify::{classify_iqr_outliers, Tier, TierCoefficients};
use outlierlab_core::data::drop_zero_values;
use outlierlab_core::domain::Observation;
use outlierlab_core::outliers::{
    boxplot_outlier_mask, compute_iqr_bounds, iqr_outlier_mask, OutlierRule,
};
use outlierlab_core::regions::{rank_regions, RankingCriterion, RegionScope};
use outlierlab_core::stats::{mean, median, quartiles};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => (0.0..10_000.0_f64).prop_map(|v| (v * 10.0).round() / 10.0),
        1 => (10_000.0..500_000.0_f64),
        1 => Just(0.0),
    ]
}

fn arb_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_value(), 1..80)
}

fn arb_observations() -> impl Strategy<Value = Vec<Observation>> {
    let region = prop::sample::select(vec!["Altai", "Omsk", "Tomsk", "Kursk", "Orel"]);
    prop::collection::vec((region, arb_value()), 1..120).prop_map(|rows| {
        rows.into_iter()
            .map(|(r, v)| Observation::new(r, v))
            .collect()
    })
}

fn arb_criterion() -> impl Strategy<Value = RankingCriterion> {
    let tier = prop::sample::select(vec![Tier::Moderate, Tier::Extreme]);
    prop_oneof![
        Just(RankingCriterion::Rule { rule: OutlierRule::Iqr }),
        (1.0..3.5_f64).prop_map(|threshold| RankingCriterion::Rule {
            rule: OutlierRule::ZScore { threshold },
        }),
        (0.5..3.0_f64).prop_map(|whisker_coef| RankingCriterion::Rule {
            rule: OutlierRule::Boxplot { whisker_coef },
        }),
        tier.prop_map(|tier| RankingCriterion::Tier {
            tier,
            coefficients: TierCoefficients::default(),
        }),
    ]
}

// ── 1. Quartiles ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn quartiles_are_ordered(values in arb_values()) {
        let (q1, q2, q3) = quartiles(&values).unwrap();
        prop_assert!(q1 <= q2 && q2 <= q3);

        let bounds = compute_iqr_bounds(&values).unwrap();
        prop_assert!(bounds.iqr >= 0.0);
        prop_assert!(bounds.lower_fence <= bounds.upper_fence);
        prop_assert_eq!(median(&values), Some(q2));
    }

    #[test]
    fn mean_lies_within_range(values in arb_values()) {
        let m = mean(&values).unwrap();
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(m >= lo - 1e-6 && m <= hi + 1e-6);
    }
}

// ── 2. Tiers ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn tiers_are_disjoint_subsets_of_fence_outliers(
        values in arb_values(),
        moderate in 0.0..3.0_f64,
        gap in 0.0..3.0_f64,
    ) {
        let coefs = TierCoefficients::new(moderate, moderate + gap).unwrap();
        let c = classify_iqr_outliers(&values, coefs).unwrap();
        let fences = iqr_outlier_mask(&values);

        let moderate_idx = c.moderate_indices();
        for i in c.extreme_indices() {
            prop_assert!(!moderate_idx.contains(&i));
            prop_assert!(fences[i]);
        }
        for &i in &moderate_idx {
            prop_assert!(fences[i]);
        }

        let tiers = c.tiers(values.len());
        let graded = tiers.iter().filter(|t| **t != Tier::None).count();
        prop_assert_eq!(graded, c.moderate.len() + c.extreme.len());
    }
}

// ── 3. Region shares ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn region_percentages_sum_to_hundred(
        observations in arb_observations(),
        criterion in arb_criterion(),
        global in any::<bool>(),
    ) {
        let scope = if global { RegionScope::Global } else { RegionScope::WithinRegion };
        let ranking = rank_regions(&observations, criterion, scope).unwrap();

        let counted: usize = ranking.shares.iter().map(|s| s.outliers).sum();
        prop_assert_eq!(counted, ranking.total_outliers);
        if ranking.total_outliers > 0 {
            prop_assert!((ranking.percent_sum() - 100.0).abs() < 1e-9);
        } else {
            prop_assert!(ranking.top(10).is_empty());
        }
        for pair in ranking.shares.windows(2) {
            prop_assert!(pair[0].outliers >= pair[1].outliers);
        }
    }
}

// ── 4. Zero filtering ────────────────────────────────────────────────

proptest! {
    #[test]
    fn zero_filter_is_idempotent(observations in arb_observations()) {
        let once = drop_zero_values(observations);
        prop_assert!(once.iter().all(|o| o.value != 0.0));
        let twice = drop_zero_values(once.clone());
        prop_assert_eq!(once, twice);
    }
}

// ── 5. Whiskers vs fences ────────────────────────────────────────────

proptest! {
    #[test]
    fn default_whiskers_flag_the_fence_outliers(values in arb_values()) {
        prop_assert_eq!(boxplot_outlier_mask(&values, 1.5), iqr_outlier_mask(&values));
    }
}
