//! Terminal snowfall demo.
//!
//! Usage: `snowfield [seed] [seconds]`
//!
//! Runs the default 300-flake field at up to 240 FPS and redraws a text
//! frame about 15 times a second. Set `RUST_LOG=debug` for more detail.

use snowfield::prelude::*;
use snowfield::render::{self, TextCanvas};
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

const FPS_CAP: u32 = 240;
const REDRAW_EVERY: Duration = Duration::from_millis(66);
const COLUMNS: usize = 90;
const ROWS: usize = 30;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(10.0);

    match run(seed, seconds) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(seed: Option<u64>, seconds: f64) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = SnowConfig::new();
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let mut simulation = Simulation::new(config)?;
    let screen = simulation.config().screen;
    let mut canvas = TextCanvas::new(COLUMNS, ROWS, screen.width, screen.height);
    let mut clock = FrameClock::new(Some(FPS_CAP));

    let mut stdout = io::stdout().lock();
    let mut since_redraw = Duration::ZERO;
    let (mut top, mut bottom) = (0usize, 0usize);

    while simulation.time() < seconds {
        let dt = clock.tick();
        let stats = simulation.tick(dt)?;
        top += stats.recycled_top;
        bottom += stats.recycled_bottom;

        since_redraw += Duration::from_secs_f32(dt);
        if since_redraw >= REDRAW_EVERY {
            since_redraw = Duration::ZERO;
            render::draw(&mut canvas, &simulation);
            write!(stdout, "\x1b[H\x1b[2J{}", canvas.to_text())?;
            writeln!(stdout, "t = {:6.2}s  fps = {:5.1}", simulation.time(), clock.fps())?;
            stdout.flush()?;
        }
    }

    log::info!(
        "{} frames over {:.2}s, {} flakes recycled to the top, {} to the bottom",
        simulation.frame(),
        simulation.time(),
        top,
        bottom
    );
    Ok(())
}
