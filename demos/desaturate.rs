use std::fs;

use lumamix::{desaturate::fragment, prelude::*};

// cargo run --example desaturate -- <input> <output.png> [mix_amount]
fn main() -> lumamix::Result<()> {
    tracing_subscriber::fmt::init();
    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "static/dog.png".to_string());
    let output = args
        .next()
        .unwrap_or_else(|| "static/desaturated.png".to_string());
    let mix_amount = args.next().and_then(|arg| arg.parse::<f32>().ok());

    let params = Desaturate::from_values(mix_amount.map(|value| ("mix_amount", value)));
    App::new(params).run(input.as_str(), fragment, fs::File::create(output)?)
}
