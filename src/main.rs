use std::io;

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tabiya::chess::core::Color;
use tabiya::Engine;

/// Side played by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Side {
    White,
    Black,
    None,
}

impl From<Side> for Option<Color> {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Some(Color::White),
            Side::Black => Some(Color::Black),
            Side::None => None,
        }
    }
}

/// Chess rules engine with a greedy move selector, driven by text commands
/// on the standard input.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
    /// Seed for the move selector. Picked from OS entropy if not set.
    #[arg(long)]
    seed: Option<u64>,
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Side that the engine plays automatically.
    #[arg(long, value_enum, default_value_t = Side::None)]
    engine: Side,
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr, stdout is reserved for the protocol.
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, &config.log_level),
    )
    .target(env_logger::Target::Stderr)
    .init();
    log::info!("tabiya {}", tabiya::engine_version());

    let rng = config
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Engine::new(&mut input, &mut output, rng)
        .with_autoplay(config.engine.into())
        .run()
}
