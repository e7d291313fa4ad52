//! Easing functions: a 4-parameter cubic family with named presets, plus
//! combinators (mirroring, oscillation).
//!
//! Every easing maps a normalized progress fraction in [0, 1] to a shaped
//! fraction. All cubic presets pin `f(0) = 0` and `f(1) = 1`; the bounce
//! presets overshoot [0, 1] mid-curve.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Cubic Bezier basis over four scalar parameters:
/// `u0(1-t)^3 + 3 u1 (1-t)^2 t + 3 u2 (1-t) t^2 + u3 t^3`.
#[inline]
pub fn cubic(params: [f32; 4], t: f32) -> f32 {
    let u = 1.0 - t;
    params[0] * u * u * u
        + 3.0 * params[1] * u * u * t
        + 3.0 * params[2] * u * t * t
        + params[3] * t * t * t
}

/// Identity easing.
#[inline]
pub fn linear(t: f32) -> f32 {
    t
}

/// Full sine period: runs from 0 through 1, 0 and -1, and back to 0.
/// Useful for wobble-style effects that must end where they started.
#[inline]
pub fn oscillate(t: f32) -> f32 {
    (t * std::f32::consts::TAU).sin()
}

/// Runs the given easing to the end in the first half of the duration,
/// then backwards in the second half. `mirror(linear)` is a triangle;
/// `mirror(ease_in)` is more of a spike.
pub fn mirror(f: impl Fn(f32) -> f32) -> impl Fn(f32) -> f32 {
    move |t| {
        if t < 0.5 {
            f(2.0 * t)
        } else {
            f(2.0 * (1.0 - t))
        }
    }
}

/// Named presets bound to fixed cubic parameter tuples.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasePreset {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseOutIn,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

impl EasePreset {
    pub const ALL: [EasePreset; 8] = [
        EasePreset::Linear,
        EasePreset::EaseIn,
        EasePreset::EaseOut,
        EasePreset::EaseInOut,
        EasePreset::EaseOutIn,
        EasePreset::EaseInBounce,
        EasePreset::EaseOutBounce,
        EasePreset::EaseInOutBounce,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EasePreset::Linear => "linear",
            EasePreset::EaseIn => "ease-in",
            EasePreset::EaseOut => "ease-out",
            EasePreset::EaseInOut => "ease-in-out",
            EasePreset::EaseOutIn => "ease-out-in",
            EasePreset::EaseInBounce => "ease-in-bounce",
            EasePreset::EaseOutBounce => "ease-out-bounce",
            EasePreset::EaseInOutBounce => "ease-in-out-bounce",
        }
    }

    /// Registry lookup by name. Unknown names are a usage error.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .iter()
            .find(|p| p.name() == name)
            .copied()
            .ok_or_else(|| CoreError::UnknownEasing(name.to_string()))
    }

    /// Cubic parameters for this preset; `Linear` short-circuits to the
    /// identity instead of evaluating the basis.
    pub fn params(self) -> Option<[f32; 4]> {
        match self {
            EasePreset::Linear => None,
            EasePreset::EaseIn => Some([0.0, 0.05, 0.25, 1.0]),
            EasePreset::EaseOut => Some([0.0, 0.75, 0.95, 1.0]),
            EasePreset::EaseInOut => Some([0.0, 0.05, 0.95, 1.0]),
            EasePreset::EaseOutIn => Some([0.0, 0.75, 0.25, 1.0]),
            EasePreset::EaseInBounce => Some([0.0, -0.5, 0.25, 1.0]),
            EasePreset::EaseOutBounce => Some([0.0, 0.75, 1.5, 1.0]),
            EasePreset::EaseInOutBounce => Some([0.0, -0.5, 1.5, 1.0]),
        }
    }

    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        match self.params() {
            Some(u) => cubic(u, t),
            None => t,
        }
    }
}

/// An easing value usable in tween options: a named preset, a raw cubic
/// parameter tuple, or an arbitrary shaping function.
pub enum Ease {
    Preset(EasePreset),
    Cubic([f32; 4]),
    Custom(Box<dyn Fn(f32) -> f32>),
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Preset(EasePreset::Linear)
    }
}

impl Ease {
    /// Resolve a preset by registry name.
    pub fn by_name(name: &str) -> Result<Self, CoreError> {
        EasePreset::from_name(name).map(Ease::Preset)
    }

    pub fn custom(f: impl Fn(f32) -> f32 + 'static) -> Self {
        Ease::Custom(Box::new(f))
    }

    /// Wrap this easing in the forward-then-reverse mirror combinator.
    pub fn mirrored(self) -> Self {
        Ease::Custom(Box::new(move |t| {
            if t < 0.5 {
                self.apply(2.0 * t)
            } else {
                self.apply(2.0 * (1.0 - t))
            }
        }))
    }

    #[inline]
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Ease::Preset(p) => p.apply(t),
            Ease::Cubic(u) => cubic(*u, t),
            Ease::Custom(f) => f(t),
        }
    }
}

impl fmt::Debug for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Preset(p) => f.debug_tuple("Preset").field(p).finish(),
            Ease::Cubic(u) => f.debug_tuple("Cubic").field(u).finish(),
            Ease::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_pin_boundaries() {
        for preset in EasePreset::ALL {
            assert_eq!(preset.apply(0.0), 0.0, "{} at 0", preset.name());
            assert_eq!(preset.apply(1.0), 1.0, "{} at 1", preset.name());
        }
    }

    #[test]
    fn bounce_presets_overshoot_mid_curve() {
        let out_bounce = EasePreset::EaseOutBounce;
        let peak = (1..20)
            .map(|i| out_bounce.apply(i as f32 / 20.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "got {peak}");
    }

    #[test]
    fn mirror_is_symmetric_around_midpoint() {
        let tri = mirror(linear);
        assert_eq!(tri(0.25), 0.5);
        assert_eq!(tri(0.25), tri(0.75));
        assert_eq!(tri(0.0), 0.0);
    }

    #[test]
    fn oscillate_returns_home() {
        assert!(oscillate(0.0).abs() < 1e-6);
        assert!(oscillate(1.0).abs() < 1e-6);
        assert!((oscillate(0.25) - 1.0).abs() < 1e-6);
        assert!((oscillate(0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn registry_rejects_unknown_names() {
        assert!(EasePreset::from_name("ease-in-out").is_ok());
        let err = EasePreset::from_name("zoom").unwrap_err();
        assert!(err.to_string().contains("zoom"));
    }

    #[test]
    fn preset_names_serialize_kebab_case() {
        let s = serde_json::to_string(&EasePreset::EaseInOutBounce).unwrap();
        assert_eq!(s, "\"ease-in-out-bounce\"");
        let p: EasePreset = serde_json::from_str("\"ease-out-in\"").unwrap();
        assert_eq!(p, EasePreset::EaseOutIn);
    }
}
