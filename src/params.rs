//! Parameter declarations for fragment uniforms.
//!
//! A declaration carries the metadata an authoring tool needs to present a
//! control for a scalar input: its name, default and valid range. Clamping
//! and defaulting happen here, on the host side, before a block is bound.
//! Fragment functions never validate their uniforms.

/// Declaration of one scalar input.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FloatParam {
    pub name: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
    /// Suggested UI increment.
    pub step: f32,
}

impl FloatParam {
    /// Declare a parameter whose step is one hundredth of its range.
    pub fn range(name: &'static str, default: f32, min: f32, max: f32) -> Self {
        FloatParam {
            name,
            default,
            min,
            max,
            step: (max - min) / 100.0,
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamp into `[min, max]`. NaN resolves to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn resolve(&self, value: Option<f32>) -> f32 {
        value.map_or(self.default, |value| self.clamp(value))
    }
}

/// A uniform block made of declared scalar parameters.
pub trait ParamBlock: Default {
    const DECLARATIONS: &'static [FloatParam];

    /// Store an already resolved value. Returns `false` for unknown names.
    fn set(&mut self, name: &str, value: f32) -> bool;

    fn declaration(name: &str) -> Option<&'static FloatParam> {
        Self::DECLARATIONS.iter().find(|param| param.name == name)
    }

    /// Build a block from host supplied values.
    ///
    /// Missing parameters keep their declared default, out of range values
    /// are clamped and unknown names are skipped.
    fn from_values<'a>(values: impl IntoIterator<Item = (&'a str, f32)>) -> Self {
        let mut block = Self::default();
        for (name, value) in values {
            let Some(param) = Self::declaration(name) else {
                tracing::warn!(name, "Ignoring unknown parameter");
                continue;
            };
            let resolved = param.clamp(value);
            if resolved != value {
                tracing::warn!(
                    name,
                    value,
                    resolved,
                    min = param.min,
                    max = param.max,
                    "Parameter out of range"
                );
            }
            block.set(name, resolved);
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAIN: FloatParam = FloatParam {
        name: "gain",
        default: 0.5,
        min: 0.0,
        max: 2.0,
        step: 0.02,
    };

    #[derive(Default, Debug, PartialEq)]
    struct Block {
        gain: f32,
    }

    impl ParamBlock for Block {
        const DECLARATIONS: &'static [FloatParam] = &[GAIN];

        fn set(&mut self, name: &str, value: f32) -> bool {
            match name {
                "gain" => self.gain = value,
                _ => return false,
            }
            true
        }
    }

    #[test]
    fn range_derives_step() {
        let param = FloatParam::range("gain", 0.5, 0.0, 2.0);
        assert_eq!(param, GAIN);
    }

    #[test]
    fn clamp_and_resolve() {
        assert_eq!(GAIN.clamp(3.0), 2.0);
        assert_eq!(GAIN.clamp(-1.0), 0.0);
        assert_eq!(GAIN.clamp(1.25), 1.25);
        assert_eq!(GAIN.clamp(f32::NAN), 0.5);
        assert_eq!(GAIN.resolve(None), 0.5);
        assert_eq!(GAIN.resolve(Some(7.0)), 2.0);
    }

    #[test]
    fn contains() {
        assert!(GAIN.contains(0.0));
        assert!(GAIN.contains(2.0));
        assert!(!GAIN.contains(2.01));
        assert!(!GAIN.contains(f32::NAN));
    }

    #[test]
    fn from_values_clamps_and_skips_unknown() {
        let block = Block::from_values([("gain", 9.0), ("bias", 1.0)]);
        assert_eq!(block, Block { gain: 2.0 });
        assert_eq!(Block::declaration("bias"), None);
    }
}
