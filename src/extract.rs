use glam::{UVec2, Vec2, Vec4};

use crate::{sampler::Sampler, texture::Texture};

/// Everything one fragment invocation can see.
pub struct Context<'a, U> {
    pub(crate) app: &'a crate::App<U>,
    pub(crate) texture: &'a Texture,
    pub(crate) target: UVec2,
    pub(crate) texel: UVec2,
}

pub trait FromContext<'a, U> {
    fn from_context(ctx: &'a Context<'a, U>) -> Self;
}

/// Window-space position of the invocation: the pixel centre.
pub struct Fragcoord(pub Vec2);

impl<'a, U> FromContext<'a, U> for Fragcoord {
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        Fragcoord(ctx.texel.as_vec2() + 0.5)
    }
}

/// Size of the render target in pixels.
pub struct Resolution(pub Vec2);

impl<'a, U> FromContext<'a, U> for Resolution {
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        Resolution(ctx.target.as_vec2())
    }
}

/// Fragment coordinate normalized by the target resolution.
pub struct Uv(pub Vec2);

impl<'a, U> FromContext<'a, U> for Uv {
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        let Fragcoord(fragcoord) = Fragcoord::from_context(ctx);
        let Resolution(res) = Resolution::from_context(ctx);
        Uv(fragcoord / res)
    }
}

pub struct Uniforms<U>(pub U)
where
    U: Clone;

impl<'a, U> FromContext<'a, U> for Uniforms<U>
where
    U: Clone,
{
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        Uniforms(ctx.app.uniforms.clone())
    }
}

/// The unfiltered source texel under this invocation.
pub struct FragColor(pub Vec4);

impl<'a, U> FromContext<'a, U> for FragColor {
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        let size = ctx.texture.dimensions();
        if size == ctx.target {
            return FragColor(ctx.texture.load(ctx.texel));
        }
        let Uv(uv) = Uv::from_context(ctx);
        let texel = (uv * size.as_vec2()).as_uvec2().min(size.saturating_sub(UVec2::ONE));
        FragColor(ctx.texture.load(texel))
    }
}

/// The bound source texture.
pub struct Source(pub Texture);

impl<'a, U> FromContext<'a, U> for Source {
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        Source(ctx.texture.clone())
    }
}

/// The bound sampler.
pub struct Bound(pub Sampler);

impl<'a, U> FromContext<'a, U> for Bound {
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        Bound(ctx.app.sampler)
    }
}

pub trait Handler<T, U> {
    fn handle(&self, ctx: &Context<'_, U>) -> Vec4;
}

macro_rules! impl_handler {
    ($($name:ident),*) => {
        impl<$($name,)* U, F> Handler<($($name,)*), U> for F
        where
            F: Fn($($name),*) -> Vec4,
            $($name: for<'a> FromContext<'a, U>,)*
        {
            fn handle(&self, ctx: &Context<'_, U>) -> Vec4 {
                self($($name::from_context(ctx),)*)
            }
        }
    };
}

impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::App;

    fn context_at<'a>(app: &'a App<f32>, texture: &'a Texture, x: u32, y: u32) -> Context<'a, f32> {
        Context {
            app,
            texture,
            target: texture.dimensions(),
            texel: UVec2::new(x, y),
        }
    }

    #[test]
    fn fragcoord_is_pixel_centre() {
        let app = App::new(0.0);
        let texture = Texture::from_fn(4, 2, |_, _| Vec4::ONE);
        let ctx = context_at(&app, &texture, 3, 1);
        let Fragcoord(fragcoord) = Fragcoord::from_context(&ctx);
        assert_eq!(fragcoord, Vec2::new(3.5, 1.5));
        let Uv(uv) = Uv::from_context(&ctx);
        assert_eq!(uv, Vec2::new(0.875, 0.75));
        let Resolution(res) = Resolution::from_context(&ctx);
        assert_eq!(res, Vec2::new(4.0, 2.0));
    }

    #[test]
    fn frag_color_reads_the_texel() {
        let app = App::new(0.0);
        let texture = Texture::from_fn(2, 1, |x, _| Vec4::splat(x as f32));
        let ctx = context_at(&app, &texture, 1, 0);
        let FragColor(color) = FragColor::from_context(&ctx);
        assert_eq!(color, Vec4::ONE);
    }

    #[test]
    fn frag_color_follows_a_resized_target() {
        let app = App::new(0.0);
        let texture = Texture::from_fn(2, 1, |x, _| Vec4::splat(x as f32));
        let ctx = Context {
            app: &app,
            texture: &texture,
            target: UVec2::new(4, 1),
            texel: UVec2::new(2, 0),
        };
        let FragColor(color) = FragColor::from_context(&ctx);
        assert_eq!(color, Vec4::ONE);
        let Resolution(res) = Resolution::from_context(&ctx);
        assert_eq!(res, Vec2::new(4.0, 1.0));
    }

    #[test]
    fn handlers_receive_extracted_arguments() {
        let app = App::new(0.25).with_sampler(Sampler::NEAREST);
        let texture = Texture::from_fn(1, 1, |_, _| Vec4::ONE);
        let ctx = context_at(&app, &texture, 0, 0);

        let uniform_only = |Uniforms(v): Uniforms<f32>| Vec4::splat(v);
        assert_eq!(uniform_only.handle(&ctx), Vec4::splat(0.25));

        let sampled = |Uv(uv): Uv, Source(tex): Source, Bound(sampler): Bound| {
            sampler.sample(&tex, uv) * 0.5
        };
        assert_eq!(sampled.handle(&ctx), Vec4::splat(0.5));
    }
}
