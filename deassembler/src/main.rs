use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use libdeassembler::Deassembler;

/// Prints a listing of a binary program.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Path to the binary program.
    binary_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let program = fs::read(&args.binary_path)
        .with_context(|| format!("Error reading program file {}", args.binary_path.display()))?;

    let deassembler = Deassembler::new(program.iter());
    print!("{}", deassembler.deassemble_text());

    Ok(())
}
