/// Shader-style `mix`: `self * (1 - t) + other * t`.
///
/// Unlike `lerp` written as `a + (b - a) * t`, both endpoints are exact:
/// `t = 0` yields `self` and `t = 1` yields `other` bit for bit.
pub trait Mix {
    fn mix(self, other: Self, t: f32) -> Self;
}

/// Clamp every component into `[0, 1]`.
pub trait Saturate {
    fn saturate(self) -> Self;
}

impl Mix for f32 {
    fn mix(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }
}

impl Saturate for f32 {
    fn saturate(self) -> Self {
        self.clamp(0.0, 1.0)
    }
}

impl Mix for glam::Vec2 {
    fn mix(self, other: Self, t: f32) -> Self {
        glam::Vec2::new(self.x.mix(other.x, t), self.y.mix(other.y, t))
    }
}

impl Saturate for glam::Vec2 {
    fn saturate(self) -> Self {
        glam::Vec2::new(self.x.saturate(), self.y.saturate())
    }
}

impl Mix for glam::Vec3 {
    fn mix(self, other: Self, t: f32) -> Self {
        glam::Vec3::new(
            self.x.mix(other.x, t),
            self.y.mix(other.y, t),
            self.z.mix(other.z, t),
        )
    }
}

impl Saturate for glam::Vec3 {
    fn saturate(self) -> Self {
        glam::Vec3::new(self.x.saturate(), self.y.saturate(), self.z.saturate())
    }
}

impl Mix for glam::Vec4 {
    fn mix(self, other: Self, t: f32) -> Self {
        glam::Vec4::new(
            self.x.mix(other.x, t),
            self.y.mix(other.y, t),
            self.z.mix(other.z, t),
            self.w.mix(other.w, t),
        )
    }
}

impl Saturate for glam::Vec4 {
    fn saturate(self) -> Self {
        glam::Vec4::new(
            self.x.saturate(),
            self.y.saturate(),
            self.z.saturate(),
            self.w.saturate(),
        )
    }
}
