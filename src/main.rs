//! tracksplit
//!
//! # What this program is
//! A small command-line tool that cuts one long recording (a DJ mix, a live
//! album) into numbered MP3 files, using a hand-written tracklist:
//!
//! ```text
//! 0:00
//! Artist A
//! Song One
//! 0:02:30
//! Artist B
//! Song Two
//! ```
//!
//! Each output file (`01.mp3`, `02.mp3`, ...) gets ID3 artist/title tags.
//!
//! # Flow
//! - `config` loads settings (env + optional TOML), `cli` applies flags on top.
//! - `core` does all the work: decode once, parse, plan, then per track
//!   slice -> encode -> tag.
//! - Anything that stops the run is reported here and exits 1.
//!   A single track failing to export/tag is logged and does not change the exit code.

mod cli;
mod config;
mod core;

use std::io::Write;

use anyhow::{Context, anyhow, bail};
use env_logger::{Env, Target};
use log::{Level, error};

use crate::cli::{apply_overrides, build_cli};
use crate::config::{Settings, resolve_config_path};
use crate::core::{SplitConfig, plan_split, split_audio};

fn main() {
    init_logging();

    if let Err(err) = run() {
        error!("{err:#}");
        std::process::exit(1);
    }
}

/// Progress goes to stdout: plain text for info, `level: message` for the rest.
/// `RUST_LOG` still controls the filter.
fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(
                buf,
                "{}: {}",
                level.as_str().to_ascii_lowercase(),
                record.args()
            ),
        })
        .init();
}

fn run() -> anyhow::Result<()> {
    // Usage errors go to stdout like every other fatal message; --help/--version are unchanged.
    let matches = match build_cli().try_get_matches() {
        Ok(m) => m,
        Err(e) if e.use_stderr() => {
            print!("{}", e.render());
            std::process::exit(e.exit_code());
        }
        Err(e) => e.exit(),
    };

    let mut settings = Settings::load().with_context(|| match resolve_config_path() {
        Some(path) => format!("failed to load settings (config file: {})", path.display()),
        None => "failed to load settings".to_string(),
    })?;
    apply_overrides(&mut settings, &matches);
    settings
        .validate()
        .map_err(|e| anyhow!("invalid settings: {e}"))?;

    let input_path = matches
        .get_one::<std::path::PathBuf>("input")
        .context("missing input path")?;
    let tracklist_path = matches
        .get_one::<std::path::PathBuf>("tracklist")
        .context("missing tracklist path")?;

    if !input_path.is_file() {
        bail!("input file does not exist: {}", input_path.display());
    }

    let config = SplitConfig {
        input_path: input_path.clone(),
        tracklist_path: tracklist_path.clone(),
        output_dir: settings.output_dir.clone(),
        bitrate_kbps: settings.bitrate_kbps,
        tag_version: settings.tag_version,
    };

    if matches.get_flag("dry-run") {
        let plan = plan_split(&config)
            .with_context(|| format!("failed to plan tracks for '{}'", input_path.display()))?;

        if plan.is_empty() {
            println!("Dry run: no tracks would be generated.");
        } else {
            println!("Dry run: would generate {} track(s):", plan.len());
            for track in plan {
                let path = config.output_dir.join(&track.file_name);
                let note = if track.is_empty() { "  (skipped: empty)" } else { "" };
                println!(
                    "  {}  [{:.2}s - {:.2}s]  {} - {}{note}",
                    path.display(),
                    track.start_ms as f64 / 1000.0,
                    track.end_ms as f64 / 1000.0,
                    track.record.artist,
                    track.record.title,
                );
            }
        }

        return Ok(());
    }

    split_audio(&config).with_context(|| format!("failed to split '{}'", input_path.display()))?;

    Ok(())
}
