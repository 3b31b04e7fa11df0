//! `tactile` binary.
//!
//! ```text
//! tactile [--config sim.json] [--material NAME] [--replay hands.json]
//!         [--headless TICKS] [--out frame.png]
//! ```
//!
//! Without `--headless` a window opens and the mouse acts as a hand. With
//! it, the simulation runs `TICKS` ticks at a fixed 60 Hz step, feeding one
//! replay frame per tick, and writes the last frame as PNG.

use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use tactile::{HandReplay, SimConfig, Simulation};

const HEADLESS_DELTA: f32 = 1.0 / 60.0;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    material: Option<String>,
    replay: Option<PathBuf>,
    headless: Option<u64>,
    out: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{} needs a value", flag));
        match flag.as_str() {
            "--config" => parsed.config = Some(value()?.into()),
            "--material" => parsed.material = Some(value()?),
            "--replay" => parsed.replay = Some(value()?.into()),
            "--out" => parsed.out = Some(value()?.into()),
            "--headless" => {
                let ticks = value()?;
                parsed.headless = Some(
                    ticks
                        .parse()
                        .map_err(|_| format!("--headless expects a tick count, got '{}'", ticks))?,
                );
            }
            other => return Err(format!("Unknown argument '{}'", other)),
        }
    }
    Ok(parsed)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(material) = args.material {
        config.material = material;
    }

    let mut sim = Simulation::from_config(config)?;

    let Some(ticks) = args.headless else {
        sim.run()?;
        return Ok(());
    };

    let replay = match &args.replay {
        Some(path) => HandReplay::load(path)?,
        None => HandReplay::new(),
    };
    sim = sim.with_fixed_delta(HEADLESS_DELTA);
    for tick in 0..ticks {
        sim.update_hands(replay.frame(tick as usize));
        sim.tick();
    }

    let stats = sim.stats();
    log::info!(
        "Ran {} ticks: {} {} particles, {} fixed",
        stats.frame,
        stats.particle_count,
        stats.material,
        stats.fixed_count
    );

    let out = args.out.unwrap_or_else(|| PathBuf::from("frame.png"));
    sim.save_frame(&out)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Usage: tactile [--config FILE] [--material NAME] [--replay FILE] [--headless TICKS] [--out FILE]");
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
