#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args by hand and supports `GLYPHFALL_DEMO_*` environment
//! overrides. Explicit flags win over the environment.

use std::env;
use std::process;

use glyphfall::scramble::engine::DEFAULT_SPEED;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Glyphfall Demo: text-decode headings and staggered reveals in the terminal

USAGE:
    glyphfall-demo [OPTIONS]

OPTIONS:
    --speed=X            Scramble speed, greater than 0 (default: 0.04)
    --fps=N              Frame rate of the ticker, 1-240 (default: 60)
    --seed=N             Seed every scramble for a reproducible run
    --no-mouse           Disable mouse capture (hover headings stay idle)
    --exit-after-ms=N    Quit after N milliseconds (0 = never)
    --log-file=PATH      Write tracing output to PATH
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Up / Down           Scroll one row
    PageUp / PageDown   Scroll one screen
    Home / End          Jump to the top or bottom of the page
    Mouse wheel         Scroll
    Mouse move          Hover a heading to replay it
    q / Esc / Ctrl+C    Quit

ENVIRONMENT VARIABLES:
    GLYPHFALL_DEMO_SPEED          Override --speed
    GLYPHFALL_DEMO_FPS            Override --fps
    GLYPHFALL_DEMO_SEED           Override --seed
    GLYPHFALL_DEMO_NO_MOUSE       Set to disable mouse capture
    GLYPHFALL_DEMO_EXIT_AFTER_MS  Override --exit-after-ms
    GLYPHFALL_DEMO_LOG_FILE       Override --log-file
    GLYPHFALL_LOG                 Log filter directives (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Scramble speed shared by every heading.
    pub speed: f64,
    /// Ticker frequency.
    pub fps: u32,
    /// Fixed seed, or `None` for a fresh run each time.
    pub seed: Option<u64>,
    /// Whether mouse events are captured.
    pub mouse: bool,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
    /// Tracing output file.
    pub log_file: Option<String>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            fps: 60,
            seed: None,
            mouse: true,
            exit_after_ms: 0,
            log_file: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version` or a bad argument.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(|key| env::var(key).ok(), &args) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("glyphfall-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse from an environment lookup and an argument list.
    pub fn parse_from(
        var: impl Fn(&str) -> Option<String>,
        args: &[String],
    ) -> Result<Command, String> {
        let mut opts = Self::default();

        // Environment first; malformed values fall back to the default.
        if let Some(val) = var("GLYPHFALL_DEMO_SPEED")
            && let Ok(x) = val.parse()
        {
            opts.speed = x;
        }
        if let Some(val) = var("GLYPHFALL_DEMO_FPS")
            && let Ok(n) = val.parse()
        {
            opts.fps = n;
        }
        if let Some(val) = var("GLYPHFALL_DEMO_SEED")
            && let Ok(n) = val.parse()
        {
            opts.seed = Some(n);
        }
        if var("GLYPHFALL_DEMO_NO_MOUSE").is_some() {
            opts.mouse = false;
        }
        if let Some(val) = var("GLYPHFALL_DEMO_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            opts.exit_after_ms = n;
        }
        if let Some(val) = var("GLYPHFALL_DEMO_LOG_FILE")
            && !val.is_empty()
        {
            opts.log_file = Some(val);
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--no-mouse" => opts.mouse = false,
                other => {
                    if let Some(val) = other.strip_prefix("--speed=") {
                        opts.speed = parse_value("--speed", val)?;
                    } else if let Some(val) = other.strip_prefix("--fps=") {
                        opts.fps = parse_value("--fps", val)?;
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = Some(parse_value("--seed", val)?);
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = parse_value("--exit-after-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = Some(val.to_string());
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        if !(1..=240).contains(&opts.fps) {
            return Err(format!("Invalid --fps value: {} (expected 1-240)", opts.fps));
        }
        Ok(Command::Run(opts))
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T, String> {
    val.parse()
        .map_err(|_| format!("Invalid {flag} value: {val}"))
}
