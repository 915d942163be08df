use std::fmt::Display;

use log::{debug, warn};

use crate::{source::SourceInstruction, Word, BYTES_PER_WORD};

use super::{AssemblyError, EncodeMode, Instruction};

/// Header line written once at the top of an operation log.
pub const LOG_HEADER: &str = "Operation code,Constant/Address,Address";

/// Operation log entry for one assembled instruction.
///
/// Only the first two arguments are kept no matter how many the instruction takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceRecord {
    pub opcode: u8,
    pub arg0: Word,
    pub arg1: Word,
}

impl Display for TraceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("A={},B={},C={}", self.opcode, self.arg0, self.arg1))
    }
}

pub trait TraceSink {
    fn record(&mut self, opcode: u8, arg0: Word, arg1: Word);
}

impl TraceSink for () {
    fn record(&mut self, _: u8, _: Word, _: Word) {}
}

impl TraceSink for Vec<TraceRecord> {
    fn record(&mut self, opcode: u8, arg0: Word, arg1: Word) {
        self.push(TraceRecord { opcode, arg0, arg1 });
    }
}

impl<T> TraceSink for &mut T
where
    T: TraceSink + ?Sized,
{
    fn record(&mut self, opcode: u8, arg0: Word, arg1: Word) {
        (**self).record(opcode, arg0, arg1);
    }
}

/// Field names in argument order, as used in operation logs.
const OPERAND_NAMES: [&str; 4] = ["B", "C", "D", "E"];

/// Encodes `instructions` back to back into one flat program.
///
/// Every instruction is encoded before anything is handed to `sink`, so a failing instruction leaves both the
/// output and the trace untouched.
pub fn assemble<'a, I, S>(instructions: I, mode: EncodeMode, sink: S) -> Result<Vec<u8>, AssemblyError>
where
    I: IntoIterator<Item = &'a Instruction>,
    S: TraceSink,
{
    assemble_numbered(
        instructions.into_iter().map(|instruction| (None, instruction)),
        mode,
        sink,
    )
}

/// Validates every source row and then assembles them. Errors and warnings carry the offending source line.
pub fn assemble_source<S>(rows: &[SourceInstruction], mode: EncodeMode, sink: S) -> Result<Vec<u8>, AssemblyError>
where
    S: TraceSink,
{
    let instructions = rows
        .iter()
        .map(SourceInstruction::to_instruction)
        .collect::<Result<Vec<_>, _>>()?;

    assemble_numbered(
        rows.iter().map(|row| Some(row.line)).zip(&instructions),
        mode,
        sink,
    )
}

fn assemble_numbered<'a, I, S>(instructions: I, mode: EncodeMode, mut sink: S) -> Result<Vec<u8>, AssemblyError>
where
    I: IntoIterator<Item = (Option<usize>, &'a Instruction)>,
    S: TraceSink,
{
    let encoded = instructions
        .into_iter()
        .map(|(line, instruction)| {
            warn_oversized(line, instruction, mode);

            instruction
                .encode(mode)
                .map(|word| (instruction, word))
                .map_err(|e| match line {
                    Some(line) => e.at_line(line),
                    None => e,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut machine_code = Vec::with_capacity(encoded.len() * BYTES_PER_WORD);

    for (instruction, word) in encoded {
        let operands = instruction.operands();
        let arg = |index: usize| operands.get(index).copied().unwrap_or(0);

        sink.record(instruction.code(), arg(0), arg(1));
        debug!("{:>6}: {}", machine_code.len(), instruction);

        machine_code.extend(word);
    }

    Ok(machine_code)
}

fn warn_oversized(line: Option<usize>, instruction: &Instruction, mode: EncodeMode) {
    let consequence = match mode {
        EncodeMode::Masked => "truncated",
        EncodeMode::Compatible => "spills into the next field",
    };

    for (index, value) in instruction.oversized_operands() {
        let name = OPERAND_NAMES.get(index).copied().unwrap_or("?");

        match line {
            Some(line) => warn!(
                "Line {}: {}: operand {} = {} is too wide and {}",
                line, instruction, name, value, consequence
            ),
            None => warn!(
                "{}: operand {} = {} is too wide and {}",
                instruction, name, value, consequence
            ),
        }
    }
}
