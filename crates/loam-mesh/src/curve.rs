//! Height remapping curves applied to field values before vertex placement.

use serde::{Deserialize, Serialize};

/// Maps a normalized field value to a height factor.
pub trait HeightCurve {
    fn evaluate(&self, t: f32) -> f32;
}

impl<F> HeightCurve for F
where
    F: Fn(f32) -> f32,
{
    fn evaluate(&self, t: f32) -> f32 {
        self(t)
    }
}

/// The identity curve.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Linear;

impl HeightCurve for Linear {
    #[inline]
    fn evaluate(&self, t: f32) -> f32 {
        t
    }
}

/// A single curve key.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Piecewise-linear curve through a set of keys, clamped beyond the first and
/// last key. An empty curve evaluates to 0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct KeyframeCurve {
    keys: Vec<Keyframe>,
}

impl KeyframeCurve {
    /// Build a curve; keys are sorted by time and non-finite keys dropped.
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        let before = keys.len();
        keys.retain(|k| k.time.is_finite() && k.value.is_finite());
        if keys.len() < before {
            tracing::warn!("Dropped {} non-finite curve keys", before - keys.len());
        }
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Straight line from `(0, 0)` to `(1, 1)`.
    pub fn linear() -> Self {
        Self::new(vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)])
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }
}

impl From<Vec<Keyframe>> for KeyframeCurve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Self::new(keys)
    }
}

impl From<KeyframeCurve> for Vec<Keyframe> {
    fn from(curve: KeyframeCurve) -> Self {
        curve.keys
    }
}

impl HeightCurve for KeyframeCurve {
    fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; t lies in [keys[i-1].time, keys[i].time).
        let i = self.keys.partition_point(|k| k.time <= t);
        // Only a NaN `t` gets here with i == 0.
        if i == 0 {
            return first.value;
        }
        let a = self.keys[i - 1];
        let b = self.keys[i];
        let span = b.time - a.time;
        if span <= 0.0 {
            return b.value;
        }
        let s = (t - a.time) / span;
        a.value + (b.value - a.value) * s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_is_identity() {
        for t in [0.0, 0.3, 1.0, 2.5] {
            assert_eq!(Linear.evaluate(t), t);
        }
    }

    #[test]
    fn test_closure_curve() {
        let squared = |t: f32| t * t;
        assert_eq!(squared.evaluate(0.5), 0.25);
    }

    #[test]
    fn test_keyframe_interpolates_between_keys() {
        let curve = KeyframeCurve::new(vec![
            Keyframe::new(0.0, 0.0),
            Keyframe::new(0.4, 0.0),
            Keyframe::new(1.0, 1.2),
        ]);
        assert_eq!(curve.evaluate(0.2), 0.0, "Flat segment below 0.4");
        assert!((curve.evaluate(0.7) - 0.6).abs() < 1e-6);
        assert!((curve.evaluate(1.0) - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_keyframe_clamps_outside_range() {
        let curve = KeyframeCurve::new(vec![Keyframe::new(0.2, 3.0), Keyframe::new(0.8, 5.0)]);
        assert_eq!(curve.evaluate(-1.0), 3.0);
        assert_eq!(curve.evaluate(4.0), 5.0);
    }

    #[test]
    fn test_keys_are_sorted() {
        let curve = KeyframeCurve::new(vec![Keyframe::new(1.0, 1.0), Keyframe::new(0.0, 0.0)]);
        assert_eq!(curve.keys()[0].time, 0.0);
        assert!((curve.evaluate(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_empty_curve_is_zero() {
        assert_eq!(KeyframeCurve::default().evaluate(0.7), 0.0);
    }

    #[test]
    fn test_curve_reads_from_ron_key_list() {
        let curve: KeyframeCurve =
            ron::from_str("[(time: 1.0, value: 2.0), (time: 0.0, value: 0.0)]").unwrap();
        assert_eq!(curve.keys().len(), 2);
        assert!((curve.evaluate(0.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_keys_are_dropped() {
        let curve = KeyframeCurve::new(vec![
            Keyframe::new(f32::NAN, 0.0),
            Keyframe::new(f32::NAN, 1.0),
            Keyframe::new(0.5, f32::INFINITY),
        ]);
        assert!(curve.keys().is_empty(), "NaN and infinite keys must not survive");
        assert_eq!(curve.evaluate(0.5), 0.0);

        let mixed = KeyframeCurve::new(vec![
            Keyframe::new(f32::NAN, 9.0),
            Keyframe::new(0.0, 0.0),
            Keyframe::new(1.0, 1.0),
        ]);
        assert_eq!(mixed.keys().len(), 2);
        assert!((mixed.evaluate(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_nan_input_does_not_panic() {
        let curve = KeyframeCurve::linear();
        assert_eq!(curve.evaluate(f32::NAN), 0.0, "NaN input falls back to the first key");
    }

    #[test]
    fn test_nan_keys_from_ron_are_dropped() {
        let curve: KeyframeCurve =
            ron::from_str("[(time: NaN, value: 0.0), (time: 0.0, value: 1.0)]").unwrap();
        assert_eq!(curve.keys(), &[Keyframe::new(0.0, 1.0)]);
    }
}
