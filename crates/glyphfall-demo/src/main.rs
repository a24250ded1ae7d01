#![forbid(unsafe_code)]

//! Glyphfall demo binary entry point.
//!
//! Mounts a scrolling page of scramble headings and reveal lists on a
//! [`Stage`], drives it from a [`FrameTicker`] and draws the visible rows
//! with crossterm.

mod cli;
mod input;
mod page;
mod session;

use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, event, queue, terminal};
use glyphfall::{FrameTicker, Stage};
use tracing_subscriber::EnvFilter;
use web_time::Instant;

use crate::input::Action;
use crate::page::Page;

fn main() {
    let opts = cli::Opts::parse();

    if let Some(path) = &opts.log_file
        && let Err(e) = init_logging(path)
    {
        eprintln!("Failed to set up logging to {path}: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&opts) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}

/// Route tracing output to `path`. The terminal belongs to the demo, so
/// nothing is logged unless a file is given.
///
/// Fails when the file cannot be created or a global subscriber is already
/// installed.
fn init_logging(path: &str) -> io::Result<()> {
    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_env("GLYPHFALL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(io::Error::other)
}

fn run(opts: &cli::Opts) -> glyphfall::Result<()> {
    let session = session::TerminalSession::enter(opts.mouse)?;
    let (width, height) = session.size()?;
    let (mut stage, page) = page::build(opts, width, page::viewport_rows(height))?;

    let interval = Duration::from_millis(1000 / u64::from(opts.fps.max(1)));
    let mut ticker = FrameTicker::spawn(interval)?;
    let deadline = (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms));
    let started = Instant::now();
    let mut out = io::BufWriter::new(io::stdout());
    tracing::info!(width, height, fps = opts.fps, speed = opts.speed, "demo started");

    'frames: loop {
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            let Some(action) = input::map_event(&event, stage.viewport().height) else {
                continue;
            };
            match action {
                Action::Quit => break 'frames,
                Action::Scroll(delta) => page.scroll_by(&mut stage, delta),
                Action::ScrollTop => stage.scroll_to(0),
                Action::ScrollBottom => page.scroll_to_end(&mut stage),
                Action::Pointer(column, row) => {
                    if row < stage.viewport().height {
                        stage.pointer_moved(column, row);
                    } else {
                        stage.pointer_left();
                    }
                }
                Action::Resize(columns, rows) => {
                    stage.resize(columns, page::viewport_rows(rows));
                    page.relayout(&mut stage);
                    page.clamp_scroll(&mut stage);
                    queue!(out, terminal::Clear(terminal::ClearType::All))?;
                }
            }
        }

        // One stage frame per tick, including ticks that queued up.
        if let Some(first) = ticker.recv_timeout(interval.saturating_mul(4)) {
            for tick in std::iter::once(first).chain(ticker.drain()) {
                stage.advance(tick.elapsed);
            }
        }
        for (element, milestone) in stage.drain_events() {
            tracing::debug!(element = element.get(), ?milestone, "effect milestone");
        }

        draw(&mut out, &stage, &page)?;

        if deadline.is_some_and(|limit| started.elapsed() >= limit) {
            tracing::info!("exit-after-ms reached");
            break;
        }
    }

    let ticks = ticker.stop();
    tracing::info!(
        ticks,
        frames = stage.frame_count(),
        skipped = stage.skipped_frames(),
        "demo finished"
    );
    drop(session);
    Ok(())
}

fn draw(out: &mut impl Write, stage: &Stage, page: &Page) -> io::Result<()> {
    for (row, line) in (0u16..).zip(page.render(stage)) {
        queue!(out, cursor::MoveTo(0, row), Print(line))?;
    }
    queue!(
        out,
        cursor::MoveTo(0, stage.viewport().height),
        SetAttribute(Attribute::Reverse),
        Print(page.status_line(stage)),
        SetAttribute(Attribute::Reset),
    )?;
    out.flush()
}
