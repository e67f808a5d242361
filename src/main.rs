/// Entry point and show loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};
use tracing_subscriber::EnvFilter;

use config::{DuelConfig, LogConfig};
use error::{DuelError, Result};
use sim::choreography::Choreographer;
use sim::event::SceneEvent;
use sim::step;
use sim::world::DuelState;
use ui::input::InputState;
use ui::renderer::Renderer;

const IDLE_SLEEP: Duration = Duration::from_millis(1);
/// Steps run at most per loop pass after a stall.
const MAX_CATCH_UP: u32 = 5;

fn main() {
    let config = DuelConfig::load();

    if let Err(e) = run(&config) {
        eprintln!("cli-duel: {e}");
        std::process::exit(1);
    }
}

fn run(config: &DuelConfig) -> Result<()> {
    init_logging(&config.log)?;
    for w in &config.warnings {
        warn!("{w}");
    }

    let seed = config.sim.seed;
    let mut state = DuelState::new(seed);
    let mut director = Choreographer::new(seed);
    let mut renderer = Renderer::new(
        (config.render.fallback_width, config.render.fallback_height),
        seed,
    );

    let (cols, rows) = renderer.grid();
    info!(cols, rows, seed, fps = config.render.fps, "starting show");

    if config.sim.skip_intro {
        let mut events = Vec::new();
        director.skip(&mut state, &mut events);
        log_events(&events);
    }

    // Restore the terminal even if setup or the loop failed part way.
    let result = renderer
        .init()
        .map_err(DuelError::from)
        .and_then(|()| show_loop(&mut state, &mut director, &mut renderer, config));
    let restored = renderer.cleanup();

    result?;
    restored?;
    info!(elapsed = state.elapsed, phase = ?state.phase, "show ended");
    Ok(())
}

fn init_logging(log: &LogConfig) -> Result<()> {
    let file = File::create(&log.file).map_err(|source| DuelError::LogFile {
        path: log.file.clone(),
        source,
    })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn show_loop(
    state: &mut DuelState,
    director: &mut Choreographer,
    renderer: &mut Renderer,
    config: &DuelConfig,
) -> Result<()> {
    let mut input = InputState::new();
    let dt = config.render.frame_time();
    let tick = Duration::from_secs_f32(dt);
    let mut last = Instant::now();
    let mut accumulator = Duration::ZERO;

    while !state.is_finished() {
        input.drain_events();
        if input.quit_requested() {
            info!(phase = ?state.phase, "quit requested");
            break;
        }
        for _ in 0..input.skips() {
            let mut events = Vec::new();
            director.skip(state, &mut events);
            log_events(&events);
        }

        let now = Instant::now();
        accumulator = (accumulator + (now - last)).min(tick * MAX_CATCH_UP);
        last = now;

        let mut stepped = false;
        while accumulator >= tick {
            accumulator -= tick;
            let events = step::step(state, director, dt);
            log_events(&events);
            stepped = true;
        }

        if stepped {
            renderer.render(state)?;
        } else {
            std::thread::sleep(IDLE_SLEEP);
        }
    }

    Ok(())
}

fn log_events(events: &[SceneEvent]) {
    for event in events {
        match event {
            SceneEvent::PhaseChanged { from, to } => info!(?from, ?to, "phase change"),
            SceneEvent::DebrisLaunched { from, flight_time } => {
                debug!(x = from.x, y = from.y, flight_time, "debris launched")
            }
            SceneEvent::DebrisDeflected { at } => debug!(x = at.x, y = at.y, "debris deflected"),
            SceneEvent::DebrisLanded { at } => debug!(x = at.x, y = at.y, "debris landed"),
            SceneEvent::LightningStruck { from, to } => {
                trace!(from_x = from.x, to_x = to.x, y = to.y, "lightning")
            }
            SceneEvent::Impact { at, sparks } => trace!(x = at.x, y = at.y, sparks, "impact"),
        }
    }
}
