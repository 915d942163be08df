use libisa::{instruction::Instruction, Word};
use log::debug;

use crate::{
    observer::{Effect, Observer},
    Emulator, Value,
};

use super::{ExecuteErr, ExecuteOk, Fault};

/// Why an instruction didn't take effect.
enum Interrupt {
    Fault(Fault),
    Fatal(ExecuteErr),
}

impl From<Fault> for Interrupt {
    fn from(fault: Fault) -> Self {
        Self::Fault(fault)
    }
}

impl<O> Emulator<O>
where
    O: Observer,
{
    /// Executes `instruction` as if it had been fetched from `pc`, without touching the program counter.
    pub fn execute_parsed_instruction(
        &mut self,
        pc: usize,
        instruction: Instruction,
    ) -> Result<ExecuteOk, ExecuteErr> {
        match self.apply(pc, instruction) {
            Ok(effect) => {
                debug!("{:>4}: {} -> {}", pc, instruction, effect);
                self.observer.on_effect(pc, &effect);

                Ok(ExecuteOk::Normal)
            }

            Err(Interrupt::Fault(fault)) => Ok(ExecuteOk::Skipped(fault)),
            Err(Interrupt::Fatal(err)) => Err(err),
        }
    }

    fn apply(&mut self, pc: usize, instruction: Instruction) -> Result<Effect, Interrupt> {
        match instruction {
            Instruction::LoadConst { register, constant } => {
                *self.reg_mut(register)? = constant;

                Ok(Effect::Register {
                    index: register,
                    value: constant,
                })
            }

            Instruction::ReadMem { register, address } => {
                self.reg(register)?;
                let value = self.mem(address)?;

                *self.reg_mut(register)? = value;

                Ok(Effect::Register {
                    index: register,
                    value,
                })
            }

            Instruction::WriteMem {
                offset,
                address,
                register,
            } => {
                let target = address.saturating_add(offset);
                self.mem(target)?;
                let value = self.reg(register)?;

                *self.mem_mut(target)? = value;

                Ok(Effect::Memory {
                    address: target,
                    value,
                })
            }

            Instruction::ModMem {
                offset,
                address,
                dividend,
                divisor,
            } => {
                let target = address.saturating_add(offset);
                self.mem(target)?;

                let dividend_addr = self.reg(dividend)?;
                let divisor_value = self.reg(divisor)?;

                if divisor_value == 0 {
                    return Err(Interrupt::Fatal(ExecuteErr::DivisionByZero {
                        pc,
                        register: divisor,
                    }));
                }

                let value = self.mem(dividend_addr)? % divisor_value;
                *self.mem_mut(target)? = value;

                Ok(Effect::Memory {
                    address: target,
                    value,
                })
            }

            Instruction::Unrecognized { opcode } => Ok(Effect::Nop { opcode }),
        }
    }

    fn reg(&self, index: Word) -> Result<Value, Fault> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.reg_file.register(i))
            .ok_or(Fault::InvalidRegister { index })
    }

    fn reg_mut(&mut self, index: Word) -> Result<&mut Value, Fault> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.reg_file.register_mut(i))
            .ok_or(Fault::InvalidRegister { index })
    }

    fn mem(&self, addr: Word) -> Result<Value, Fault> {
        usize::try_from(addr)
            .ok()
            .and_then(|a| self.memory.cell(a))
            .ok_or(Fault::InvalidMemoryAddress { address: addr })
    }

    fn mem_mut(&mut self, addr: Word) -> Result<&mut Value, Fault> {
        usize::try_from(addr)
            .ok()
            .and_then(|a| self.memory.cell_mut(a))
            .ok_or(Fault::InvalidMemoryAddress { address: addr })
    }
}
