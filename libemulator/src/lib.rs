use libisa::BYTES_PER_WORD;
use memory::Memory;
use observer::{none::NoObserver, Observer};
use regfile::RegFile;
use thiserror::Error;

pub mod execute;
pub mod memory;
pub mod observer;
pub mod regfile;
pub mod snapshot;

pub use execute::{ExecuteErr, ExecuteOk, Fault};

/// Contents of one register or memory cell.
pub type Value = libisa::Word;

pub const REGISTER_COUNT: usize = 32;
pub const MEMORY_SIZE: usize = 64;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProgramError {
    #[error("Program is {len} bytes long, which isn't a whole number of 6 byte words")]
    TruncatedWord { len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Ready,
    Running,
    /// The whole program was executed.
    Halted,
    /// Execution was aborted by a fatal fault.
    Faulted(ExecuteErr),
}

/// Executes one program against its own register file and memory.
pub struct Emulator<O = NoObserver>
where
    O: Observer,
{
    pub reg_file: RegFile,
    pub memory: Memory,
    /// Byte offset of the next word to execute.
    pub pc: usize,
    pub state: State,
    pub observer: O,
    program: Vec<u8>,
}

impl Emulator {
    pub fn new(program: Vec<u8>) -> Result<Self, ProgramError> {
        Self::with_observer(program, NoObserver)
    }
}

impl<O> Emulator<O>
where
    O: Observer,
{
    pub fn with_observer(program: Vec<u8>, observer: O) -> Result<Self, ProgramError> {
        if program.len() % BYTES_PER_WORD != 0 {
            return Err(ProgramError::TruncatedWord { len: program.len() });
        }

        Ok(Self {
            reg_file: RegFile::new(),
            memory: Memory::new(),
            pc: 0,
            state: State::Ready,
            observer,
            program,
        })
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    pub fn word_count(&self) -> usize {
        self.program.len() / BYTES_PER_WORD
    }
}
