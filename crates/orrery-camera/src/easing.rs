/// Easing curves for camera transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EasingFunction {
    /// Constant speed, no acceleration.
    Linear,
    /// Slow start, fast end.
    EaseIn,
    /// Fast start, slow end.
    EaseOut,
    /// Quadratic slow start, fast middle, slow end.
    EaseInOut,
    /// Cubic ease in and out; used for all navigation moves.
    #[default]
    CubicInOut,
}

impl EasingFunction {
    /// Map a linear progress value (0.0..=1.0) to an eased value.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseIn => t * t,
            EasingFunction::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingFunction::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 5] = [
        EasingFunction::Linear,
        EasingFunction::EaseIn,
        EasingFunction::EaseOut,
        EasingFunction::EaseInOut,
        EasingFunction::CubicInOut,
    ];

    #[test]
    fn test_all_start_at_zero_end_at_one() {
        for easing in &ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at t=0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at t=1");
        }
    }

    #[test]
    fn test_cubic_in_out_is_symmetric() {
        let e = EasingFunction::CubicInOut;
        assert!((e.apply(0.5) - 0.5).abs() < 1e-6);
        for t in [0.1, 0.2, 0.3, 0.45] {
            assert!((e.apply(t) + e.apply(1.0 - t) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cubic_in_out_starts_slower_than_quadratic() {
        let cubic = EasingFunction::CubicInOut.apply(0.2);
        let quad = EasingFunction::EaseInOut.apply(0.2);
        assert!((cubic - 0.032).abs() < 1e-6);
        assert!(cubic < quad);
    }

    #[test]
    fn test_input_is_clamped() {
        for easing in &ALL {
            assert_eq!(easing.apply(-3.0), easing.apply(0.0));
            assert_eq!(easing.apply(7.0), easing.apply(1.0));
        }
    }

    #[test]
    fn test_monotonic() {
        for easing in &ALL {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v + 1e-6 >= prev, "{easing:?} not monotonic at {i}");
                prev = v;
            }
        }
    }
}
