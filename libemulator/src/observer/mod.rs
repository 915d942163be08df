use std::fmt::Display;

use libisa::Word;

use crate::{ExecuteErr, Fault, Value};

pub mod none;
pub mod recorder;

#[cfg(test)]
mod tests;

/// State change caused by one executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Register { index: Word, value: Value },
    Memory { address: Word, value: Value },
    Nop { opcode: u8 },
}

impl Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register { index, value } => f.write_fmt(format_args!("r{} = {}", index, value)),
            Self::Memory { address, value } => f.write_fmt(format_args!("m{} = {}", address, value)),
            Self::Nop { opcode } => f.write_fmt(format_args!("nop ({})", opcode)),
        }
    }
}

/// Gets told about everything an emulator does. `pc` is the byte offset of the instruction involved, or the final
/// program counter for faults raised while taking a snapshot.
pub trait Observer {
    fn on_effect(&mut self, _pc: usize, _effect: &Effect) {}

    fn on_fault(&mut self, _pc: usize, _fault: &Fault) {}

    fn on_fatal(&mut self, _pc: usize, _err: &ExecuteErr) {}
}

impl<T> Observer for &mut T
where
    T: Observer + ?Sized,
{
    fn on_effect(&mut self, pc: usize, effect: &Effect) {
        (**self).on_effect(pc, effect);
    }

    fn on_fault(&mut self, pc: usize, fault: &Fault) {
        (**self).on_fault(pc, fault);
    }

    fn on_fatal(&mut self, pc: usize, err: &ExecuteErr) {
        (**self).on_fatal(pc, err);
    }
}
