use lumamix::{desaturate::fragment, prelude::*};

use rayon::iter::{IntoParallelIterator, ParallelIterator};

// Renders a sweep of mix amounts from the original colors to full gray.
fn main() {
    tracing_subscriber::fmt::init();
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "static/dog.png".to_string());
    let source = Texture::open(&input).expect("failed to open source image");
    std::fs::create_dir_all("static/sweep").expect("failed to create output directory");
    let app = App::new(Desaturate::default());
    let steps = 10;
    (0..=steps)
        .into_par_iter()
        .map(move |idx| {
            let file = std::fs::File::create(format!("static/sweep/frame_{}.png", idx))?;
            app.clone()
                .set_uniforms(Desaturate::new(idx as f32 / steps as f32))
                .run(source.clone(), fragment, file)
        })
        .collect::<Result<Vec<_>, _>>()
        .expect("failed to render frame");
}
