use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::config::Settings;

pub fn build_cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .about("Split a recorded mix into tagged MP3 tracks using a timestamped tracklist")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT_DIR")
                .help("Directory for the numbered MP3 files [default: output_tracks]")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("bitrate")
                .short('b')
                .long("bitrate")
                .value_name("KBPS")
                .help("Constant MP3 bitrate in kbps [default: 192]")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Show the planned tracks without writing files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("Path to the recording to split")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("tracklist")
                .value_name("TRACKLIST")
                .help("Path to the tracklist (time / artist / title per entry)")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
}

/// Apply command-line overrides on top of loaded settings.
pub fn apply_overrides(settings: &mut Settings, matches: &ArgMatches) {
    if let Some(dir) = matches.get_one::<PathBuf>("output") {
        settings.output_dir = dir.clone();
    }
    if let Some(&kbps) = matches.get_one::<u32>("bitrate") {
        settings.bitrate_kbps = kbps;
    }
}
