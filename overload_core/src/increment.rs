//! Weight-tier increment table and rounding helpers.
//!
//! Heavier lifts progress in larger absolute steps. All decider output passes
//! through [`round_to_step`] and then [`round_to_two_decimals`].

/// Weights closer than this are the same load
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// Smallest load change the decider prescribes
pub const LOAD_STEP: f64 = 0.5;

/// Weight tiers as (lower bound, increment), heaviest first
const INCREMENT_TIERS: [(f64, f64); 4] = [(200.0, 10.0), (120.0, 5.0), (60.0, 2.5), (30.0, 2.0)];

/// Progression step for a working weight
///
/// | weight      | increment |
/// |-------------|-----------|
/// | >= 200      | 10        |
/// | [120, 200)  | 5         |
/// | [60, 120)   | 2.5       |
/// | [30, 60)    | 2         |
/// | (0, 30)     | 1         |
/// | <= 0        | 0         |
pub fn progression_increment(weight: f64) -> f64 {
    if weight.is_nan() || weight <= 0.0 {
        return 0.0;
    }

    INCREMENT_TIERS
        .iter()
        .find(|(floor, _)| weight >= *floor)
        .map(|(_, increment)| *increment)
        .unwrap_or(1.0)
}

/// Half of the tier increment, never below one load step
pub fn half_increment(increment: f64) -> f64 {
    (increment / 2.0).max(LOAD_STEP)
}

/// Round to the nearest multiple of `step`
///
/// Non-finite values and a zero step pass through unchanged.
pub fn round_to_step(value: f64, step: f64) -> f64 {
    if !value.is_finite() || step == 0.0 {
        return value;
    }
    // Half-up like the rest of the rounding, not half-away-from-zero
    (value / step + 0.5).floor() * step
}

/// Round half-up to two decimal places
pub fn round_to_two_decimals(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * 100.0 + 0.5).floor() / 100.0
}

pub fn weights_match(a: f64, b: f64) -> bool {
    (a - b).abs() < WEIGHT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_tiers() {
        assert_eq!(progression_increment(315.0), 10.0);
        assert_eq!(progression_increment(200.0), 10.0);
        assert_eq!(progression_increment(199.5), 5.0);
        assert_eq!(progression_increment(135.0), 5.0);
        assert_eq!(progression_increment(120.0), 5.0);
        assert_eq!(progression_increment(95.0), 2.5);
        assert_eq!(progression_increment(60.0), 2.5);
        assert_eq!(progression_increment(45.0), 2.0);
        assert_eq!(progression_increment(30.0), 2.0);
        assert_eq!(progression_increment(25.0), 1.0);
        assert_eq!(progression_increment(0.5), 1.0);
    }

    #[test]
    fn test_increment_non_positive() {
        assert_eq!(progression_increment(0.0), 0.0);
        assert_eq!(progression_increment(-10.0), 0.0);
        assert_eq!(progression_increment(f64::NAN), 0.0);
    }

    #[test]
    fn test_half_increment_floor() {
        assert_eq!(half_increment(10.0), 5.0);
        assert_eq!(half_increment(5.0), 2.5);
        assert_eq!(half_increment(2.5), 1.25);
        assert_eq!(half_increment(1.0), 0.5);
        assert_eq!(half_increment(0.0), 0.5);
    }

    #[test]
    fn test_round_to_step() {
        assert_eq!(round_to_step(137.4, 0.5), 137.5);
        assert_eq!(round_to_step(137.2, 0.5), 137.0);
        assert_eq!(round_to_step(136.25, 0.5), 136.5);
        assert_eq!(round_to_step(96.25, 0.5), 96.5);
        assert_eq!(round_to_step(140.0, 0.5), 140.0);
        assert_eq!(round_to_step(7.0, 0.0), 7.0);
        assert!(round_to_step(f64::NAN, 0.5).is_nan());
        assert_eq!(round_to_step(f64::INFINITY, 0.5), f64::INFINITY);
    }

    #[test]
    fn test_round_to_step_is_idempotent() {
        let mut x = -50.0;
        while x < 400.0 {
            let once = round_to_step(x, 0.5);
            assert_eq!(round_to_step(once, 0.5), once, "not idempotent at {}", x);
            x += 0.037;
        }
    }

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(round_to_two_decimals(137.5), 137.5);
        assert_eq!(round_to_two_decimals(1.234), 1.23);
        assert_eq!(round_to_two_decimals(1.236), 1.24);
        assert_eq!(round_to_two_decimals(140.0), 140.0);
    }

    #[test]
    fn test_weights_match_tolerance() {
        assert!(weights_match(135.0, 135.005));
        assert!(weights_match(135.0, 134.995));
        assert!(!weights_match(135.0, 135.02));
    }
}
