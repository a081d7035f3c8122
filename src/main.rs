//! Command-line entry point.

use std::process;

use log::error;

use gearling::frontend;
use gearling::input::InputScript;
use gearling::{GameGear, Rom};

const USAGE: &str = "\
usage: gearling [options] <rom>

Run a Sega Game Gear ROM image (.gg, .sms, .bin, or a zip of one).

options:
  -s, --scale N          window scale factor (default 3)
  -f, --fullscreen       borderless fullscreen
      --headless         run without a window
      --frames N         stop after N frames (headless)
      --input-script F   play back a JSON button script
  -h, --help             print this help
      --version          print the version";

/// Parsed command line. `error` carries the first complaint so `main` can
/// print usage and exit with the bad-invocation code.
#[derive(Debug, Default, PartialEq)]
struct Config {
    rom_path: Option<String>,
    scale: u32,
    fullscreen: bool,
    headless: bool,
    frames: Option<u64>,
    script_path: Option<String>,
    show_help: bool,
    show_version: bool,
    error: Option<String>,
}

impl Config {
    fn new() -> Self {
        Self {
            scale: 3,
            ..Self::default()
        }
    }

    fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::new();
        let mut iter = args.into_iter().skip(1);

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" => config.show_help = true,
                "--version" => config.show_version = true,
                "-f" | "--fullscreen" => config.fullscreen = true,
                "--headless" => config.headless = true,
                "-s" | "--scale" => match iter.next().and_then(|v| v.parse().ok()) {
                    Some(scale) if scale > 0 => config.scale = scale,
                    _ => {
                        config.error = Some("--scale needs a positive integer".into());
                        break;
                    }
                },
                "--frames" => match iter.next().and_then(|v| v.parse().ok()) {
                    Some(frames) => config.frames = Some(frames),
                    None => {
                        config.error = Some("--frames needs an integer".into());
                        break;
                    }
                },
                "--input-script" => match iter.next() {
                    Some(path) => config.script_path = Some(path),
                    None => {
                        config.error = Some("--input-script needs a file path".into());
                        break;
                    }
                },
                _ if arg.starts_with('-') => {
                    config.error = Some(format!("unknown option {}", arg));
                    break;
                }
                _ => {
                    if config.rom_path.is_some() {
                        config.error = Some("more than one ROM given".into());
                        break;
                    }
                    config.rom_path = Some(arg);
                }
            }
        }
        config
    }
}

#[cfg(feature = "gui")]
fn run_machine(gg: &mut GameGear, config: &Config, script: Option<InputScript>) -> bool {
    if config.headless {
        frontend::run_headless(gg, script, config.frames)
    } else {
        frontend::run_windowed(gg, config.scale, config.fullscreen, script)
    }
}

#[cfg(not(feature = "gui"))]
fn run_machine(gg: &mut GameGear, config: &Config, script: Option<InputScript>) -> bool {
    frontend::run_headless(gg, script, config.frames)
}

/// Exit codes: 0 = clean shutdown, 1 = machine exception or presentation
/// failure, 2 = bad invocation.
fn run(config: Config) -> i32 {
    if let Some(message) = &config.error {
        eprintln!("error: {}", message);
        eprintln!("{}", USAGE);
        return 2;
    }
    if config.show_help {
        println!("{}", USAGE);
        return 0;
    }
    if config.show_version {
        println!("gearling {}", env!("CARGO_PKG_VERSION"));
        return 0;
    }
    let Some(rom_path) = &config.rom_path else {
        eprintln!("{}", USAGE);
        return 2;
    };

    let rom = match Rom::from_file(rom_path) {
        Ok(rom) => rom,
        Err(err) => {
            error!("failed to load ROM {}: {}", rom_path, err);
            return 2;
        }
    };
    let script = match &config.script_path {
        Some(path) => match InputScript::from_file(path) {
            Ok(script) => Some(script),
            Err(err) => {
                error!("failed to load input script {}: {}", path, err);
                return 2;
            }
        },
        None => None,
    };

    let mut gg = GameGear::new();
    gg.load(&rom);

    if run_machine(&mut gg, &config, script) {
        1
    } else {
        0
    }
}

fn main() {
    env_logger::init();
    let config = Config::from_args(std::env::args());
    process::exit(run(config));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut full = vec!["gearling".to_string()];
        full.extend(args.iter().map(|s| s.to_string()));
        Config::from_args(full)
    }

    #[test]
    fn defaults() {
        let config = parse(&["rom.gg"]);
        assert_eq!(config.rom_path.as_deref(), Some("rom.gg"));
        assert_eq!(config.scale, 3);
        assert!(!config.fullscreen);
        assert!(!config.headless);
        assert!(config.error.is_none());
    }

    #[test]
    fn flags_and_values() {
        let config = parse(&["-s", "4", "-f", "--headless", "rom.gg"]);
        assert_eq!(config.scale, 4);
        assert!(config.fullscreen);
        assert!(config.headless);
        assert_eq!(config.rom_path.as_deref(), Some("rom.gg"));
    }

    #[test]
    fn frames_and_script() {
        let config = parse(&["--frames", "120", "--input-script", "in.json", "rom.gg"]);
        assert_eq!(config.frames, Some(120));
        assert_eq!(config.script_path.as_deref(), Some("in.json"));
    }

    #[test]
    fn help_flag() {
        assert!(parse(&["--help"]).show_help);
        assert!(parse(&["-h"]).show_help);
    }

    #[test]
    fn bad_scale_is_an_error() {
        assert!(parse(&["--scale", "zero"]).error.is_some());
        assert!(parse(&["--scale", "0"]).error.is_some());
        assert!(parse(&["--scale"]).error.is_some());
    }

    #[test]
    fn unknown_option_is_an_error() {
        assert!(parse(&["--bogus"]).error.is_some());
    }

    #[test]
    fn two_roms_are_an_error() {
        assert!(parse(&["a.gg", "b.gg"]).error.is_some());
    }

    #[test]
    fn missing_rom_exits_with_usage() {
        assert_eq!(run(parse(&[])), 2);
    }

    #[test]
    fn unreadable_rom_is_a_bad_invocation() {
        assert_eq!(run(parse(&["/nonexistent/rom.gg"])), 2);
    }

    #[test]
    fn help_exits_cleanly() {
        assert_eq!(run(parse(&["--help"])), 0);
    }
}
