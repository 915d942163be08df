use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use libisa::{
    instruction::{
        assembler::{self, TraceRecord, LOG_HEADER},
        EncodeMode,
    },
    source,
};
use log::info;

/// Assembles an instruction list into a binary program.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Path to the comma separated instruction list.
    instructions_path: PathBuf,

    /// Path of the binary program to write.
    binary_path: PathBuf,

    /// Path of the operation log to write.
    log_path: PathBuf,

    /// Don't mask operands to their field widths, producing the exact bytes of the legacy assembler.
    #[arg(long)]
    compat: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut log = BufWriter::new(
        File::create(&args.log_path)
            .with_context(|| format!("Couldn't create log file {}", args.log_path.display()))?,
    );
    writeln!(log, "{}", LOG_HEADER)?;

    let source = fs::read_to_string(&args.instructions_path).with_context(|| {
        format!(
            "Couldn't read instruction list {}",
            args.instructions_path.display()
        )
    })?;

    let rows = source::parse(&source)?;

    let mode = if args.compat {
        EncodeMode::Compatible
    } else {
        EncodeMode::Masked
    };

    let mut trace: Vec<TraceRecord> = Vec::new();
    let machine_code = assembler::assemble_source(&rows, mode, &mut trace)?;

    write_trace(&mut log, &trace)
        .with_context(|| format!("Couldn't write log file {}", args.log_path.display()))?;
    write_program(&args.binary_path, &machine_code)?;

    info!(
        "Assembled {} instructions ({} bytes) into {}",
        rows.len(),
        machine_code.len(),
        args.binary_path.display()
    );

    Ok(())
}

fn write_trace<W>(mut writer: W, trace: &[TraceRecord]) -> std::io::Result<()>
where
    W: Write,
{
    for record in trace {
        writeln!(writer, "{}", record)?;
    }

    writer.flush()
}

fn write_program(path: &Path, machine_code: &[u8]) -> anyhow::Result<()> {
    fs::write(path, machine_code)
        .with_context(|| format!("Couldn't write binary program {}", path.display()))
}
