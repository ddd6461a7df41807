use glam::UVec2;
use image::{DynamicImage, ImageError, Rgba32FImage};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use std::{
    io::{self, BufWriter, Write},
    path::Path,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

pub mod desaturate;
pub mod error;
pub mod extract;
pub mod params;
pub mod sampler;
pub mod texture;
pub mod utils;

pub use error::{Error, Result};
pub use sampler::Sampler;
pub use texture::{Texture, TextureFormat};

pub mod prelude {
    pub use crate::desaturate::{desaturate, luminance, Desaturate, LUMA_REC709};
    pub use crate::extract::{
        Bound, FragColor, Fragcoord, Resolution, Source, Uniforms, Uv,
    };
    pub use crate::params::{FloatParam, ParamBlock};
    pub use crate::sampler::{AddressMode, FilterMode, Sampler};
    pub use crate::texture::{Texture, TextureFormat};
    pub use crate::utils::{Mix, Saturate};
    pub use crate::{App, Image};
    pub use glam::{UVec2, Vec2, Vec3, Vec4};
}

/// A source image, or the error that prevented loading it.
///
/// Lets `run` take a path and report decode failures through its own result.
pub enum Image {
    Handle(Texture),
    Error(ImageError),
}

impl Image {
    fn into_texture(self) -> Result<Texture> {
        match self {
            Image::Handle(texture) => Ok(texture),
            Image::Error(e) => Err(e.into()),
        }
    }
}

impl From<&str> for Image {
    fn from(path: &str) -> Self {
        Image::from(Path::new(path))
    }
}

impl From<&Path> for Image {
    fn from(path: &Path) -> Self {
        match Texture::open(path) {
            Ok(texture) => Image::Handle(texture),
            Err(e) => Image::Error(e),
        }
    }
}

impl From<DynamicImage> for Image {
    fn from(img: DynamicImage) -> Self {
        Image::Handle(img.into())
    }
}

impl From<Rgba32FImage> for Image {
    fn from(img: Rgba32FImage) -> Self {
        Image::Handle(img.into())
    }
}

impl From<Texture> for Image {
    fn from(texture: Texture) -> Self {
        Image::Handle(texture)
    }
}

/// CPU host for fragment functions.
///
/// Holds the bindings a fragment can extract (uniform block and sampler)
/// and evaluates the fragment once per pixel of the render target. The
/// target has the source's size unless [`App::with_dimensions`] says
/// otherwise.
#[derive(Clone)]
pub struct App<U> {
    uniforms: U,
    sampler: Sampler,
    format: TextureFormat,
    dimensions: Option<UVec2>,
    thread_pool: Option<Arc<ThreadPool>>,
}

impl<U> App<U>
where
    U: Send + Sync,
{
    /// Renders on the global rayon pool with the default sampler and 8-bit
    /// output.
    pub fn new(uniforms: U) -> Self {
        App {
            uniforms,
            sampler: Sampler::default(),
            format: TextureFormat::default(),
            dimensions: None,
            thread_pool: None,
        }
    }

    /// Render on a dedicated pool of `num_threads` workers. Zero picks rayon's
    /// default.
    pub fn with_threads(self, num_threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
        Ok(App {
            thread_pool: Some(Arc::new(pool)),
            ..self
        })
    }

    pub fn with_sampler(self, sampler: Sampler) -> Self {
        App { sampler, ..self }
    }

    pub fn with_format(self, format: TextureFormat) -> Self {
        App { format, ..self }
    }

    /// Render into a target of `dimensions` instead of the source size. The
    /// fragment's `Uv` spans the target, so the source is resampled.
    pub fn with_dimensions(self, dimensions: UVec2) -> Self {
        App {
            dimensions: Some(dimensions),
            ..self
        }
    }

    pub fn set_uniforms(self, uniforms: U) -> Self {
        App { uniforms, ..self }
    }

    pub fn uniforms(&self) -> &U {
        &self.uniforms
    }

    pub fn sampler(&self) -> Sampler {
        self.sampler
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn dimensions(&self) -> Option<UVec2> {
        self.dimensions
    }

    /// Evaluate `fragment` for every pixel of the render target.
    ///
    /// The output keeps full `f32` precision.
    pub fn render<A>(
        &self,
        image: impl Into<Image>,
        fragment: impl extract::Handler<A, U> + Send + Sync,
    ) -> Result<Texture> {
        let source = image.into().into_texture()?;
        if source.is_empty() {
            return Err(Error::EmptyImage {
                width: source.width(),
                height: source.height(),
            });
        }
        let target = self.dimensions.unwrap_or(source.dimensions());
        let (width, height) = (target.x, target.y);
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }
        tracing::info!(
            width,
            height,
            source_width = source.width(),
            source_height = source.height(),
            "Rendering"
        );

        let progress = Progress::new(height);
        let mut output = Rgba32FImage::new(width, height);
        let row_len = width as usize * 4;
        let mut shade = || {
            output
                .par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                        let ctx = extract::Context {
                            app: self,
                            texture: &source,
                            target,
                            texel: UVec2::new(x as u32, y as u32),
                        };
                        pixel.copy_from_slice(&fragment.handle(&ctx).to_array());
                    }
                    progress.row_done();
                })
        };
        match &self.thread_pool {
            Some(pool) => pool.install(shade),
            None => shade(),
        }

        tracing::info!("Processing complete");
        Ok(Texture::new(output))
    }

    /// Render and encode the result into `output` using the configured
    /// [`TextureFormat`].
    pub fn run<A>(
        &self,
        image: impl Into<Image>,
        fragment: impl extract::Handler<A, U> + Send + Sync,
        output: impl io::Write + io::Seek,
    ) -> Result<()> {
        let rendered = self.render(image, fragment)?;
        tracing::info!(format = ?self.format, "Writing to output");
        let mut writer = BufWriter::new(output);
        rendered
            .to_dynamic(self.format)
            .write_to(&mut writer, self.format.container())?;
        writer.flush()?;
        Ok(())
    }
}

/// Row counter that logs every tenth of the image.
struct Progress {
    done: AtomicU32,
    total: u32,
}

impl Progress {
    fn new(total: u32) -> Self {
        Progress {
            done: AtomicU32::new(0),
            total,
        }
    }

    fn row_done(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let decile = |rows: u32| u64::from(rows) * 10 / u64::from(self.total);
        if decile(done) != decile(done - 1) {
            tracing::info!(done, total = self.total, "{}%", decile(done) * 10);
        }
    }
}
