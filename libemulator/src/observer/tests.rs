use libisa::instruction::{EncodeMode, Instruction};

use crate::{Emulator, ExecuteErr, Fault};

use super::{
    recorder::{Event, Recorder},
    Effect,
};

fn program(instructions: &[Instruction]) -> anyhow::Result<Vec<u8>> {
    Ok(libisa::instruction::assembler::assemble(
        instructions,
        EncodeMode::Masked,
        (),
    )?)
}

#[test]
fn events_follow_execution_order() -> anyhow::Result<()> {
    let program = program(&[
        Instruction::LoadConst {
            register: 4,
            constant: 9,
        },
        Instruction::ReadMem {
            register: 0,
            address: 64,
        },
        Instruction::Unrecognized { opcode: 1 },
        Instruction::WriteMem {
            offset: 1,
            address: 2,
            register: 4,
        },
    ])?;

    let mut recorder = Recorder::default();
    {
        let mut emulator = Emulator::with_observer(program, &mut recorder)?;
        emulator.execute_to_halt()?;
    }

    assert_eq!(
        recorder.events,
        [
            Event::Effect {
                pc: 0,
                effect: Effect::Register { index: 4, value: 9 }
            },
            Event::Fault {
                pc: 6,
                fault: Fault::InvalidMemoryAddress { address: 64 }
            },
            Event::Effect {
                pc: 12,
                effect: Effect::Nop { opcode: 1 }
            },
            Event::Effect {
                pc: 18,
                effect: Effect::Memory {
                    address: 3,
                    value: 9
                }
            },
        ]
    );

    Ok(())
}

#[test]
fn fatal_fault_is_the_last_event() -> anyhow::Result<()> {
    let program = program(&[
        Instruction::ModMem {
            offset: 0,
            address: 0,
            dividend: 0,
            divisor: 7,
        },
        Instruction::LoadConst {
            register: 0,
            constant: 1,
        },
    ])?;

    let mut emulator = Emulator::with_observer(program, Recorder::default())?;
    assert!(emulator.execute_to_halt().is_err());

    assert_eq!(
        emulator.observer.events,
        [Event::Fatal {
            pc: 0,
            err: ExecuteErr::DivisionByZero { pc: 0, register: 7 }
        }]
    );

    Ok(())
}

#[test]
fn effects_are_found_by_pc() -> anyhow::Result<()> {
    let program = program(&[
        Instruction::LoadConst {
            register: 1,
            constant: 2,
        },
        Instruction::LoadConst {
            register: 3,
            constant: 4,
        },
    ])?;

    let mut emulator = Emulator::with_observer(program, Recorder::default())?;
    emulator.execute_to_halt()?;

    let effects: Vec<_> = emulator.observer.effects_at(6).collect();
    assert_eq!(effects, [&Effect::Register { index: 3, value: 4 }]);
    assert_eq!(emulator.observer.faults().count(), 0);

    Ok(())
}
