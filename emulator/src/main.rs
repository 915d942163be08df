use std::{
    fs::{self, File},
    io::BufWriter,
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use libemulator::Emulator;
use log::{debug, info};

/// Runs a binary program and writes a range of its memory to a result file.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Path to the binary program.
    binary_path: PathBuf,

    /// Path of the result file to write.
    result_path: PathBuf,

    /// First memory address of the result.
    #[arg(allow_negative_numbers = true)]
    first_index: i64,

    /// Last memory address of the result, inclusive.
    #[arg(allow_negative_numbers = true)]
    last_index: i64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let program = fs::read(&args.binary_path)
        .with_context(|| format!("Failed to read program {}", args.binary_path.display()))?;

    let mut emulator = Emulator::new(program)?;

    // A fatal fault leaves no result file behind.
    let snapshot = emulator
        .run(args.first_index..=args.last_index)
        .context("Program aborted")?;

    for (addr, value) in &snapshot.entries {
        debug!("memory[{}] = {}", addr, value);
    }

    let result = File::create(&args.result_path)
        .with_context(|| format!("Failed to create result file {}", args.result_path.display()))?;
    snapshot.write_csv(BufWriter::new(result))?;

    info!(
        "Executed {} instructions, wrote {} addresses to {}",
        emulator.word_count(),
        snapshot.entries.len(),
        args.result_path.display()
    );

    Ok(())
}
