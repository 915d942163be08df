use libisa::{
    instruction::{assembler, EncodeMode, Instruction},
    source,
};

use crate::{observer::recorder::Recorder, Emulator, ProgramError, State, MEMORY_SIZE};

use super::{ExecuteErr, ExecuteOk, Fault};

fn assemble(source: &str) -> anyhow::Result<Vec<u8>> {
    let rows = source::parse(source)?;
    Ok(assembler::assemble_source(&rows, EncodeMode::Masked, ())?)
}

fn exec(source: &str) -> anyhow::Result<Emulator<Recorder>> {
    let mut emulator = Emulator::with_observer(assemble(source)?, Recorder::default())?;
    emulator.execute_to_halt()?;

    Ok(emulator)
}

#[test]
fn load_const_sets_register() -> anyhow::Result<()> {
    let emulator = exec("load_const,31,1048575")?;

    assert_eq!(emulator.reg_file.register(31), Some(0xFFFFF));
    assert_eq!(emulator.state, State::Halted);

    Ok(())
}

#[test]
fn write_then_read_back() -> anyhow::Result<()> {
    let emulator = exec(
        "load_const,0,42
         write_mem,60,3,0
         read_mem,5,63",
    )?;

    assert_eq!(emulator.memory.cell(63), Some(42));
    assert_eq!(emulator.reg_file.register(5), Some(42));

    Ok(())
}

#[test]
fn remainder_reads_dividend_indirectly() -> anyhow::Result<()> {
    let mut emulator = Emulator::new(assemble(
        "load_const,0,17
         write_mem,0,3,0
         load_const,1,3
         load_const,2,5
         mod_mem,1,4,1,2",
    )?)?;

    let snapshot = emulator.run(3..=5)?;

    // memory[4 + 1] = memory[registers[1]] % registers[2] = memory[3] % 5
    assert_eq!(snapshot.entries, [(3, 17), (4, 0), (5, 2)]);

    Ok(())
}

#[test]
fn zero_divisor_aborts_without_snapshot() -> anyhow::Result<()> {
    let mut emulator = Emulator::new(assemble(
        "load_const,0,5
         load_const,1,0
         write_mem,0,0,0
         write_mem,1,1,1
         mod_mem,2,0,1,1
         load_const,3,9",
    )?)?;

    let expected = ExecuteErr::DivisionByZero { pc: 24, register: 1 };

    assert_eq!(emulator.run(0..=3), Err(expected));
    assert_eq!(emulator.state, State::Faulted(expected));
    assert_eq!(emulator.snapshot(0..=3), Err(expected));

    // Nothing after the faulting word runs, not even on a retry.
    assert_eq!(emulator.execute_instruction(), Err(expected));
    assert_eq!(emulator.reg_file.register(3), Some(0));
    assert_eq!(emulator.pc, 30);

    Ok(())
}

#[test]
fn invalid_accesses_are_skipped() -> anyhow::Result<()> {
    let mut emulator = Emulator::with_observer(
        assemble(
            "read_mem,0,64
             write_mem,40,30,0
             mod_mem,63,31,0,0
             load_const,0,7
             write_mem,0,0,0
             load_const,1,11
             write_mem,0,1,1
             load_const,2,4
             mod_mem,2,0,3,2",
        )?,
        Recorder::default(),
    )?;

    let snapshot = emulator.run(0..=2)?;

    // memory[2] = memory[registers[3]] % registers[2] = memory[0] % 4
    assert_eq!(snapshot.entries, [(0, 7), (1, 11), (2, 3)]);

    let faults: Vec<_> = emulator.observer.faults().copied().collect();

    assert_eq!(
        faults,
        [
            Fault::InvalidMemoryAddress { address: 64 },
            Fault::InvalidMemoryAddress { address: 70 },
            Fault::InvalidMemoryAddress { address: 94 },
        ]
    );

    Ok(())
}

#[test]
fn indirect_dividend_out_of_memory() -> anyhow::Result<()> {
    let emulator = exec(
        "load_const,0,64
         load_const,1,3
         mod_mem,0,0,0,1
         write_mem,0,1,1",
    )?;

    let faults: Vec<_> = emulator.observer.faults().copied().collect();

    assert_eq!(faults, [Fault::InvalidMemoryAddress { address: 64 }]);
    assert_eq!(emulator.memory.cell(1), Some(3));

    Ok(())
}

#[test]
fn invalid_register_index() -> anyhow::Result<()> {
    // Register fields decode to at most 31, so out of range indices only reach the emulator directly.
    let mut emulator = Emulator::new(vec![])?;

    for instruction in [
        Instruction::LoadConst {
            register: 32,
            constant: 1,
        },
        Instruction::ReadMem {
            register: 40,
            address: 0,
        },
        Instruction::WriteMem {
            offset: 0,
            address: 0,
            register: 32,
        },
        Instruction::ModMem {
            offset: 0,
            address: 0,
            dividend: 0,
            divisor: 99,
        },
    ] {
        assert!(matches!(
            emulator.execute_parsed_instruction(0, instruction),
            Ok(ExecuteOk::Skipped(Fault::InvalidRegister { .. }))
        ));
    }

    assert!(emulator.memory.iter().all(|value| *value == 0));

    Ok(())
}

#[test]
fn unrecognized_opcode_is_a_nop() -> anyhow::Result<()> {
    let mut program = vec![0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
    program.extend(assemble("load_const,2,3")?);

    let mut emulator = Emulator::with_observer(program, Recorder::default())?;

    assert_eq!(emulator.execute_instruction(), Ok(ExecuteOk::Normal));
    assert_eq!(emulator.execute_instruction(), Ok(ExecuteOk::Normal));
    assert_eq!(emulator.execute_instruction(), Ok(ExecuteOk::Halted));
    assert_eq!(emulator.execute_instruction(), Ok(ExecuteOk::Halted));

    assert_eq!(emulator.reg_file.register(2), Some(3));
    assert_eq!(emulator.observer.faults().count(), 0);

    Ok(())
}

#[test]
fn one_step_per_word() -> anyhow::Result<()> {
    let mut emulator = Emulator::new(assemble(
        "load_const,0,1
         read_mem,1,99
         load_const,2,3",
    )?)?;

    assert_eq!(emulator.state, State::Ready);
    assert_eq!(emulator.word_count(), 3);
    assert_eq!(emulator.execute_to_halt(), Ok(3));
    assert_eq!(emulator.pc, 18);

    Ok(())
}

#[test]
fn truncated_program_is_rejected() {
    assert_eq!(
        Emulator::new(vec![0; 7]).err(),
        Some(ProgramError::TruncatedWord { len: 7 })
    );
}

#[test]
fn snapshot_skips_out_of_range_addresses() -> anyhow::Result<()> {
    // 31 + 32 reaches the last cell, the 5 bit address field alone can't.
    let mut emulator = Emulator::with_observer(
        assemble("load_const,0,5\nwrite_mem,32,31,0")?,
        Recorder::default(),
    )?;
    let last = MEMORY_SIZE as i64;

    let snapshot = emulator.run(-1..=last)?;

    assert_eq!(snapshot.entries.len(), MEMORY_SIZE);
    assert_eq!(snapshot.entries.first(), Some(&(0, 0)));
    assert_eq!(snapshot.entries.last(), Some(&(63, 5)));

    let faults: Vec<_> = emulator.observer.faults().copied().collect();
    assert_eq!(
        faults,
        [
            Fault::SnapshotRangeOutOfMemory { first: -1, last: -1 },
            Fault::SnapshotRangeOutOfMemory { first: last, last },
        ]
    );

    Ok(())
}

/// Two interleaved vectors, reduced element-wise with `mod_mem`.
fn vector_program() -> String {
    let vector_a = [12, 15, 20, 25, 30, 35];
    let vector_b = [3, 4, 5, 6, 7, 8];

    let mut lines = Vec::new();

    for (i, value) in vector_a.iter().enumerate() {
        lines.push(format!("load_const,{},{}", i, value));
        lines.push(format!("write_mem,{},{},{}", i * 2, i, i));
    }

    for (i, value) in vector_b.iter().enumerate().map(|(i, value)| (i + 6, value)) {
        lines.push(format!("load_const,{},{}", i, value));
        lines.push(format!("write_mem,{},{},{}", (i - 6) * 2 + 1, i, i));
    }

    for i in 0..6 {
        lines.push(format!("mod_mem,{},{},{},{}", i * 2 + 2, i * 2, i * 2 + 1, i + 6));
    }

    lines.join("\n")
}

#[test]
fn vector_program_result() -> anyhow::Result<()> {
    let mut emulator = Emulator::new(assemble(&vector_program())?)?;
    let snapshot = emulator.run(0..=20)?;

    let expected = [12, 0, 2, 15, 0, 0, 0, 3, 0, 25, 0, 0, 30, 5, 0, 35, 6, 0, 0, 7, 0];
    let expected: Vec<(usize, u64)> = expected.into_iter().enumerate().collect();

    assert_eq!(snapshot.entries, expected);

    Ok(())
}

#[test]
fn runs_are_deterministic() -> anyhow::Result<()> {
    let program = assemble(&vector_program())?;

    let mut outputs = Vec::new();
    let mut traces = Vec::new();

    for _ in 0..2 {
        let mut emulator = Emulator::with_observer(program.clone(), Recorder::default())?;

        let mut csv = Vec::new();
        emulator.run(-5..=70)?.write_csv(&mut csv)?;

        outputs.push(csv);
        traces.push(emulator.observer);
    }

    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(traces[0], traces[1]);

    Ok(())
}
