use glam::{IVec2, UVec2, Vec2, Vec4};

use crate::{texture::Texture, utils::Mix};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

/// How texel indices outside the texture are mapped back inside it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

impl AddressMode {
    /// Map `index` into `0..len`. `len` must be non-zero.
    pub fn apply(self, index: i32, len: u32) -> u32 {
        let len = len.min(i32::MAX as u32) as i32;
        let wrapped = match self {
            AddressMode::ClampToEdge => index.clamp(0, len - 1),
            AddressMode::Repeat => index.rem_euclid(len),
            AddressMode::MirrorRepeat => {
                let period = len.saturating_mul(2);
                let m = index.rem_euclid(period);
                if m < len {
                    m
                } else {
                    period - 1 - m
                }
            }
        };
        wrapped as u32
    }
}

/// Filtering and addressing state used to read a [`Texture`] at a
/// normalized coordinate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sampler {
    pub filter: FilterMode,
    pub address_mode: AddressMode,
}

impl Sampler {
    pub const NEAREST: Sampler = Sampler {
        filter: FilterMode::Nearest,
        address_mode: AddressMode::ClampToEdge,
    };

    pub const LINEAR: Sampler = Sampler {
        filter: FilterMode::Linear,
        address_mode: AddressMode::ClampToEdge,
    };

    pub fn with_address_mode(self, address_mode: AddressMode) -> Self {
        Sampler {
            address_mode,
            ..self
        }
    }

    /// Sample `texture` at `uv`, where `(0, 0)` is the top left corner of the
    /// first texel and `(1, 1)` the bottom right corner of the last one.
    ///
    /// An empty texture samples as transparent black.
    pub fn sample(&self, texture: &Texture, uv: Vec2) -> Vec4 {
        if texture.is_empty() {
            return Vec4::ZERO;
        }
        let size = texture.dimensions();
        let position = uv * size.as_vec2();
        match self.filter {
            FilterMode::Nearest => {
                texture.load(self.address(position.floor().as_ivec2(), size))
            }
            FilterMode::Linear => {
                let position = position - 0.5;
                let base = position.floor();
                let t = position - base;
                let base = base.as_ivec2();
                // Far out of range coordinates saturate at i32::MAX.
                let fetch = |offset: IVec2| {
                    texture.load(self.address(base.saturating_add(offset), size))
                };
                let top = fetch(IVec2::new(0, 0)).mix(fetch(IVec2::new(1, 0)), t.x);
                let bottom = fetch(IVec2::new(0, 1)).mix(fetch(IVec2::new(1, 1)), t.x);
                top.mix(bottom, t.y)
            }
        }
    }

    fn address(&self, texel: IVec2, size: UVec2) -> UVec2 {
        UVec2::new(
            self.address_mode.apply(texel.x, size.x),
            self.address_mode.apply(texel.y, size.y),
        )
    }
}
