mod audio;
mod clock;
mod config;
mod error;
mod game;
mod input;
mod physics;
mod render;
mod spawner;
mod viewport;
mod world;

use std::env;
use std::fs::File;
use std::io::{self, Stdout, stdout};
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    terminal::{self, ClearType},
};

use audio::Sfx;
use clock::Clock;
use config::{Options, Tuning, USAGE};
use error::{Error, Result};
use game::{Command, Game};
use input::Action;
use render::{Layout, PixelBuf};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("flappy-sky: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let opts = Options::parse(env::args().skip(1))?;
    if opts.help {
        println!("{USAGE}");
        return Ok(());
    }
    let tuning = opts.load_tuning()?;
    if let Some(path) = &opts.log {
        init_logging(path)?;
    }

    let seed = opts.seed.unwrap_or_else(rand::random);
    let sfx = Sfx::new(opts.mute);
    log::info!(
        "seed {seed}, {} fps, sound {}",
        opts.fps,
        if sfx.is_enabled() { "on" } else { "off" }
    );

    // restored on drop, before any error reaches `main`
    let mut term = TerminalGuard::enter()?;
    play(&mut term.out, tuning, seed, &sfx, opts.fps)
}

/// Logs go to a file since the game owns the terminal.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::LogFile {
        path: path.to_path_buf(),
        source,
    })?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();
    Ok(())
}

struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self { out: stdout() };
        execute!(
            guard.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            DisableMouseCapture,
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn play(out: &mut Stdout, tuning: Tuning, seed: u64, sfx: &Sfx, fps: u32) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let (mut layout, viewport) = Layout::compute(cols, rows);
    let (w, h) = layout.pixel_size();
    let mut buf = PixelBuf::new(w, h);
    let mut game = Game::new(tuning, viewport, seed);
    let mut clock = Clock::new();
    let frame_dur = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));

    queue!(out, terminal::Clear(ClearType::All))?;

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            let Some(action) = input::translate(&event::read()?, &layout) else {
                continue;
            };
            match action {
                Action::Quit => {
                    log::info!("quit with best score {}", game.best);
                    return Ok(());
                }
                Action::Game(command) => game.push(command),
                Action::Resize { cols, rows } => {
                    let (resized, viewport) = Layout::compute(cols, rows);
                    layout = resized;
                    let (w, h) = layout.pixel_size();
                    buf.resize(w, h);
                    game.push(Command::Resize(viewport));
                    queue!(out, terminal::Clear(ClearType::All))?;
                }
            }
        }

        // Update
        let dt = clock.advance(frame_start);
        game.update(dt);
        for event in game.take_events() {
            sfx.play(&event);
        }

        // Render
        render::draw(&game, clock.elapsed(), &mut buf);
        render::present(out, &buf, &layout)?;
        render::draw_hud(out, &layout, &game)?;

        // Frame pacing
        let spent = frame_start.elapsed();
        if spent < frame_dur {
            std::thread::sleep(frame_dur - spent);
        }
    }
}
