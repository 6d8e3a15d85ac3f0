use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, error};
use std::process::ExitCode;
use version_sync::{
    arguments::Arguments,
    coordinator::{self, RunOutcome},
};

fn main() -> ExitCode {
    let args = Arguments::parse();
    pretty_env_logger::env_logger::builder()
        .filter_level(if args.verbose { LevelFilter::Debug } else { LevelFilter::Info })
        .format_timestamp(None)
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Arguments) -> Result<bool> {
    let outcome = coordinator::run(&args.to_config())?;

    println!("Versions found:");
    for (file, version) in outcome.report().entries() {
        println!("  - {}: '{}'", file.path.display(), version);
    }

    match &outcome {
        RunOutcome::Matched { version, .. } => {
            println!("Versions match: {version}");
        }
        RunOutcome::Synced { summary, .. } if summary.skipped.is_empty() => {
            println!(
                "Synchronization complete. All file versions set to {}",
                summary.target
            );
        }
        RunOutcome::Synced { summary, .. } => {
            println!(
                "Synchronization complete. File versions set to {}, except for files with no field to update:",
                summary.target
            );
            for path in &summary.skipped {
                println!("  - {}", path.display());
            }
        }
        RunOutcome::Mismatch { files, .. } => {
            eprintln!("Error: Versions are not consistent across all files.");
            for (path, version) in files {
                eprintln!("  - {}: '{}'", path.display(), version);
            }
        }
    }

    Ok(outcome.is_success())
}
