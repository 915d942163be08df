use libisa::{instruction::Instruction, Word, BYTES_PER_WORD};
use log::{error, warn};
use thiserror::Error;

use crate::{observer::Observer, Emulator, State};

mod parsed;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOk {
    Normal,
    /// The instruction faulted and had no effect. Execution continues with the next word.
    Skipped(Fault),
    /// The end of the program was reached.
    Halted,
}

/// Faults that are reported and then skipped over.
///
/// Instruction faults cost the faulting instruction its effect but never stop the program. Snapshot faults only
/// leave addresses out of the snapshot.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error("Invalid register index {index}")]
    InvalidRegister { index: Word },

    #[error("Invalid memory address {address}")]
    InvalidMemoryAddress { address: Word },

    #[error("Addresses {first}..={last} are outside of memory")]
    SnapshotRangeOutOfMemory { first: i64, last: i64 },
}

/// Fatal faults. The program is aborted and its memory is never reported.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteErr {
    #[error("Division by zero at {pc} (register {register} is zero)")]
    DivisionByZero { pc: usize, register: Word },
}

impl<O> Emulator<O>
where
    O: Observer,
{
    pub fn execute_instruction(&mut self) -> Result<ExecuteOk, ExecuteErr> {
        match self.state {
            State::Faulted(err) => return Err(err),
            State::Halted => return Ok(ExecuteOk::Halted),
            State::Ready | State::Running => {}
        }

        let Some(instruction) = self.fetch() else {
            self.state = State::Halted;
            return Ok(ExecuteOk::Halted);
        };

        self.state = State::Running;

        let pc = self.pc;
        self.pc += BYTES_PER_WORD;

        match self.execute_parsed_instruction(pc, instruction) {
            Ok(ExecuteOk::Skipped(fault)) => {
                warn!("{:>4}: {}: {}", pc, instruction, fault);
                self.observer.on_fault(pc, &fault);

                Ok(ExecuteOk::Skipped(fault))
            }

            Err(err) => {
                error!("{:>4}: {}: {}", pc, instruction, err);
                self.observer.on_fatal(pc, &err);
                self.state = State::Faulted(err);

                Err(err)
            }

            ok => ok,
        }
    }

    /// Runs the remaining program and returns the number of executed words.
    pub fn execute_to_halt(&mut self) -> Result<usize, ExecuteErr> {
        let mut executed = 0;

        loop {
            match self.execute_instruction()? {
                ExecuteOk::Halted => return Ok(executed),
                ExecuteOk::Normal | ExecuteOk::Skipped(_) => executed += 1,
            }
        }
    }

    fn fetch(&self) -> Option<Instruction> {
        let bytes = self.program.get(self.pc..self.pc + BYTES_PER_WORD)?;
        Some(Instruction::decode(bytes.try_into().ok()?))
    }
}
