//! BT.709 desaturation.
//!
//! Blends a sampled color towards its relative luminance. The blend factor,
//! `mix_amount`, is declared with a default of 1.0 (fully gray) and a valid
//! range of `[0, 1]`. Luminance is computed in whatever space the texture
//! values are in; nothing here linearizes or re-encodes.

use glam::{Vec3, Vec4};

use crate::{
    extract::{Bound, Source, Uniforms, Uv},
    params::{FloatParam, ParamBlock},
    utils::Mix,
};

/// ITU-R BT.709 relative luminance weights.
pub const LUMA_REC709: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

pub fn luminance(rgb: Vec3) -> f32 {
    LUMA_REC709.x * rgb.x + LUMA_REC709.y * rgb.y + LUMA_REC709.z * rgb.z
}

/// `rgb * (1 - mix_amount) + luminance * mix_amount`, alpha untouched.
///
/// `mix_amount` is not validated; values outside `[0, 1]` extrapolate.
pub fn desaturate(color: Vec4, mix_amount: f32) -> Vec4 {
    let rgb = color.truncate();
    let gray = Vec3::splat(luminance(rgb));
    rgb.mix(gray, mix_amount).extend(color.w)
}

/// Uniform block of the desaturation fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Desaturate {
    pub mix_amount: f32,
}

impl Desaturate {
    pub const MIX_AMOUNT: FloatParam = FloatParam {
        name: "mix_amount",
        default: 1.0,
        min: 0.0,
        max: 1.0,
        step: 0.01,
    };

    /// Wrap a raw blend factor as-is. Use [`ParamBlock::from_values`] to get
    /// declared defaults and clamping.
    pub fn new(mix_amount: f32) -> Self {
        Desaturate { mix_amount }
    }
}

impl Default for Desaturate {
    fn default() -> Self {
        Desaturate::new(Self::MIX_AMOUNT.default)
    }
}

impl ParamBlock for Desaturate {
    const DECLARATIONS: &'static [FloatParam] = &[Self::MIX_AMOUNT];

    fn set(&mut self, name: &str, value: f32) -> bool {
        match name {
            "mix_amount" => self.mix_amount = value,
            _ => return false,
        }
        true
    }
}

/// The desaturation fragment: sample the source at this invocation's uv and
/// blend it towards gray.
pub fn fragment(
    Uv(uv): Uv,
    Source(texture): Source,
    Bound(sampler): Bound,
    Uniforms(params): Uniforms<Desaturate>,
) -> Vec4 {
    let color = sampler.sample(&texture, uv);
    desaturate(color, params.mix_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn primaries_luminance() {
        assert_eq!(luminance(Vec3::X), 0.2126);
        assert_eq!(luminance(Vec3::Y), 0.7152);
        assert_eq!(luminance(Vec3::Z), 0.0722);
        assert!((luminance(Vec3::ONE) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_mix_is_identity() {
        let color = Vec4::new(0.8, 0.4, 0.2, 0.6);
        assert_eq!(desaturate(color, 0.0), color);
    }

    #[test]
    fn full_mix_is_gray() {
        let color = Vec4::new(0.8, 0.4, 0.2, 0.6);
        let out = desaturate(color, 1.0);
        let l = luminance(color.truncate());
        assert_eq!(out, Vec4::new(l, l, l, 0.6));
    }

    #[test]
    fn half_mix_reference_pixel() {
        let color = Vec4::new(0.8, 0.4, 0.2, 1.0);
        // 0.17008 + 0.28608 + 0.01444
        assert!((luminance(color.truncate()) - 0.4706).abs() < EPSILON);
        let out = desaturate(color, 0.5);
        let expected = Vec4::new(0.6353, 0.4353, 0.3353, 1.0);
        assert!(out.abs_diff_eq(expected, EPSILON), "{out:?}");
    }

    #[test]
    fn out_of_range_mix_extrapolates() {
        let color = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let out = desaturate(color, 2.0);
        let l = 0.2126;
        assert!((out.x - (2.0 * l - 1.0)).abs() < 1e-6);
        assert!((out.y - 2.0 * l).abs() < 1e-6);
        assert_eq!(out.w, 1.0);
    }

    #[test]
    fn declared_parameter_block() {
        assert_eq!(Desaturate::default().mix_amount, 1.0);
        assert_eq!(Desaturate::DECLARATIONS, &[Desaturate::MIX_AMOUNT]);
        assert_eq!(Desaturate::MIX_AMOUNT, FloatParam::range("mix_amount", 1.0, 0.0, 1.0));
    }

    #[test]
    fn host_values_are_clamped() {
        assert_eq!(Desaturate::from_values(std::iter::empty()), Desaturate::new(1.0));
        assert_eq!(Desaturate::from_values([("mix_amount", 0.3)]), Desaturate::new(0.3));
        assert_eq!(Desaturate::from_values([("mix_amount", 1.5)]), Desaturate::new(1.0));
        assert_eq!(Desaturate::from_values([("mix_amount", -0.5)]), Desaturate::new(0.0));
        assert_eq!(Desaturate::from_values([("strength", 0.1)]), Desaturate::new(1.0));
    }
}
