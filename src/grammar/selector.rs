//! Weighted rule selection

use super::{Alternatives, Rule};
use crate::random::RandomSource;

/// Pick one rule among `candidates`.
///
/// Zero total weight returns the first rule without touching `rng`.
/// Otherwise exactly one draw `r` in `[0, total)` is taken and the first
/// rule whose cumulative weight exceeds `r` wins.
pub fn select_rule<'a, R: RandomSource + ?Sized>(candidates: &'a Alternatives, rng: &mut R) -> &'a Rule {
    let total = candidates.total_probability();
    if total <= 0.0 {
        return candidates.first();
    }

    let r = rng.next_float(0.0, total);
    let mut cumulative = 0.0;
    for rule in candidates.as_slice() {
        cumulative += rule.probability;
        if r < cumulative {
            return rule;
        }
    }

    // r >= total only when a source breaks the [0, 1) contract
    candidates.first()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Grammar, Rule};
    use crate::random::PseudoRandom;

    /// Counts draws and replays a fixed value
    struct Scripted {
        value: f64,
        calls: usize,
    }

    impl RandomSource for Scripted {
        fn next(&mut self) -> f64 {
            self.calls += 1;
            self.value
        }
    }

    fn alternatives(weights: &[f64]) -> Alternatives {
        let rules = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| Rule::new('F', i.to_string(), w))
            .collect();
        Grammar::new("F", rules)
            .unwrap()
            .index()
            .candidates('F')
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_zero_weights_pick_first_without_drawing() {
        let candidates = alternatives(&[0.0, 0.0]);
        let mut rng = Scripted { value: 0.9, calls: 0 };
        for _ in 0..1000 {
            assert_eq!(select_rule(&candidates, &mut rng).output, "0");
        }
        assert_eq!(rng.calls, 0);
    }

    #[test]
    fn test_one_draw_per_weighted_call() {
        let candidates = alternatives(&[1.0, 3.0]);
        let mut rng = Scripted { value: 0.5, calls: 0 };
        for _ in 0..25 {
            select_rule(&candidates, &mut rng);
        }
        assert_eq!(rng.calls, 25);
    }

    #[test]
    fn test_cumulative_boundaries() {
        let candidates = alternatives(&[1.0, 3.0]);
        // r = value * 4
        let pick = |value: f64| {
            let mut rng = Scripted { value, calls: 0 };
            select_rule(&candidates, &mut rng).output.clone()
        };
        assert_eq!(pick(0.0), "0");
        assert_eq!(pick(0.2499), "0");
        // r == 1.0 is not strictly below the first cumulative weight
        assert_eq!(pick(0.25), "1");
        assert_eq!(pick(0.999), "1");
    }

    #[test]
    fn test_draw_at_upper_bound_falls_back_to_first() {
        let candidates = alternatives(&[1.0, 3.0]);
        let mut rng = Scripted { value: 1.0, calls: 0 };
        assert_eq!(select_rule(&candidates, &mut rng).output, "0");
        assert_eq!(rng.calls, 1);
    }

    #[test]
    fn test_zero_weight_rule_never_chosen_when_others_weighted() {
        let candidates = alternatives(&[0.0, 2.0]);
        let mut rng = Scripted { value: 0.0, calls: 0 };
        assert_eq!(select_rule(&candidates, &mut rng).output, "1");
    }

    #[test]
    fn test_weighted_frequency() {
        let candidates = alternatives(&[1.0, 3.0]);
        let mut rng = PseudoRandom::new("selector").unwrap();
        let trials = 100_000;
        let second = (0..trials)
            .filter(|_| select_rule(&candidates, &mut rng).output == "1")
            .count();
        let ratio = second as f64 / trials as f64;
        assert!((0.72..=0.78).contains(&ratio), "ratio was {}", ratio);
    }
}
