use cfg_if::cfg_if;
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
#[cfg(all(feature = "gui", not(feature = "cli")))]
use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use thiserror::Error;

mod libgeoguess;

#[cfg(feature = "cli")]
mod cli;
#[cfg(feature = "gui")]
mod gui;

use crate::libgeoguess::error::QuizError;
use crate::libgeoguess::landmarks::reference_items;
use crate::libgeoguess::session::Session;

#[derive(Parser, Debug)]
#[command(name = "GeoGuess")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "error")]
    log_level: String,
    /// Seed for a reproducible shuffle.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Directory the landmark images are looked up in.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    assets: PathBuf,
    /// Play in the terminal even when the window is available.
    #[arg(long)]
    cli: bool,
}

#[derive(Debug, Error)]
enum Error {
    #[error("cannot set up the quiz: {0}")]
    Quiz(#[from] QuizError),
    #[cfg(feature = "kittygfx")]
    #[error("Cannot read image")]
    ImageRead(#[from] std::io::Error),
    #[cfg(feature = "kittygfx")]
    #[error("cannot decode image")]
    ImageDecode(#[from] image::ImageError),
    #[cfg(feature = "gui")]
    #[error("window error: {0}")]
    Gui(#[from] eframe::Error),
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let rng = match args.seed {
        Some(seed) => {
            info!("[Setup] Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };
    let items = reference_items()?;
    let session = Session::new(items, rng)?;
    debug!("[Setup] Assets at {:?}", args.assets);

    run(session, args)
}

cfg_if! {
    if #[cfg(all(feature = "gui", feature = "cli"))] {
        fn run(session: Session<StdRng>, args: Args) -> Result<(), Error> {
            if args.cli {
                cli::cli_loop(session, &args.assets, &mut std::io::stdin().lock())
            } else {
                gui::init_gui(session, args.assets)
            }
        }
    } else if #[cfg(feature = "gui")] {
        fn run(session: Session<StdRng>, args: Args) -> Result<(), Error> {
            if args.cli {
                warn!("[Setup] Built without the `cli` feature, opening the window instead");
            }
            gui::init_gui(session, args.assets)
        }
    } else if #[cfg(feature = "cli")] {
        fn run(session: Session<StdRng>, args: Args) -> Result<(), Error> {
            cli::cli_loop(session, &args.assets, &mut std::io::stdin().lock())
        }
    } else {
        compile_error!("enable at least one of the `gui` or `cli` features");
    }
}
