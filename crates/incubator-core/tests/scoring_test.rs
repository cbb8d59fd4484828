use incubator_core::FeasibilityScorer;
use proptest::prelude::*;

proptest! {
    #[test]
    fn score_always_in_range(
        market in -100.0f64..100.0,
        technical in -100.0f64..100.0,
        resource in -100.0f64..100.0,
    ) {
        let score = FeasibilityScorer::score(market, technical, resource);
        prop_assert!((0.0..=10.0).contains(&score));
    }

    #[test]
    fn score_rises_with_market_potential(
        low in 0.0f64..=10.0,
        delta in 0.0f64..=10.0,
        technical in 0.0f64..=10.0,
        resource in 0.0f64..=10.0,
    ) {
        let high = (low + delta).min(10.0);
        prop_assert!(
            FeasibilityScorer::score(high, technical, resource)
                >= FeasibilityScorer::score(low, technical, resource)
        );
    }

    #[test]
    fn score_falls_with_complexity(
        market in 0.0f64..=10.0,
        low in 0.0f64..=10.0,
        delta in 0.0f64..=10.0,
        resource in 0.0f64..=10.0,
    ) {
        let high = (low + delta).min(10.0);
        prop_assert!(
            FeasibilityScorer::score(market, high, resource)
                <= FeasibilityScorer::score(market, low, resource)
        );
    }
}

#[test]
fn documented_example_scores_seven() {
    let score = FeasibilityScorer::score(8.0, 3.0, 4.0);
    assert!((score - 7.0).abs() < 1e-9);
}
