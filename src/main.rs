//! inputedge demo binary.
//!
//! Feeds a scripted sequence of scalar samples through an
//! [`EventDispatcher`] and logs the edge transitions, one sample per tick.
//! Useful for eyeballing the press/hold/release behavior:
//!
//! ```sh
//! cargo run -- --values "0.0,0.005,1.0,1.0,0.0"
//! ```
//!
//! Optionally loads binding overrides from a JSON file to show how a host
//! would resolve its action table before wiring sources.

use clap::Parser;
use std::path::PathBuf;

use inputedge::bindings::ActionBindings;
use inputedge::dispatcher::EventDispatcher;
use inputedge::source::ValueCell;

/// inputedge demo
#[derive(Parser)]
#[command(version, about = "Feed scripted samples through an edge dispatcher")]
struct Cli {
    /// Comma-separated scalar samples, one per tick.
    #[arg(long, default_value = "0.0,1.0,1.0,0.0")]
    values: String,

    /// Optional JSON file with binding overrides to load before the run.
    #[arg(long, value_name = "PATH")]
    bindings: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut bindings = ActionBindings::new().with_default("fire", "key/space");
    if let Some(path) = &cli.bindings {
        if let Err(e) = bindings.load_overrides(path) {
            log::warn!("{e}; keeping default bindings");
        }
    }
    log::info!(
        "fire is bound to {}",
        bindings.control_for("fire").unwrap_or("<unbound>")
    );

    let samples: Vec<f32> = match cli
        .values
        .split(',')
        .map(|token| token.trim().parse::<f32>())
        .collect()
    {
        Ok(samples) => samples,
        Err(e) => {
            eprintln!("Error: bad sample in --values: {e}");
            std::process::exit(1);
        }
    };

    let source = ValueCell::new(0.0f32);
    let mut dispatcher = EventDispatcher::new();
    dispatcher
        .with_source(&source, "demo")
        .on_pressed(|value| log::info!("  fire pressed ({value:.3})"))
        .on_hold(|value| log::info!("  fire held ({value:.3})"))
        .on_released(|| log::info!("  fire released"));

    for (tick, value) in samples.into_iter().enumerate() {
        log::info!("tick {tick}: sample {value:.3}");
        source.set(value);
        dispatcher.tick();
    }
}
