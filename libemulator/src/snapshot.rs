use std::{
    io::{self, Write},
    ops::RangeInclusive,
};

use log::warn;

use crate::{observer::Observer, Emulator, ExecuteErr, Fault, State, Value, MEMORY_SIZE};

pub const SNAPSHOT_HEADER: &str = "Address,Value";

/// Memory contents over a range of addresses, in increasing address order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub entries: Vec<(usize, Value)>,
}

impl Snapshot {
    pub fn value(&self, addr: usize) -> Option<Value> {
        self.entries
            .iter()
            .find(|(entry_addr, _)| *entry_addr == addr)
            .map(|(_, value)| *value)
    }

    pub fn write_csv<W>(&self, mut writer: W) -> io::Result<()>
    where
        W: Write,
    {
        writeln!(writer, "{}", SNAPSHOT_HEADER)?;

        for (addr, value) in &self.entries {
            writeln!(writer, "{},{}", addr, value)?;
        }

        writer.flush()
    }
}

impl<O> Emulator<O>
where
    O: Observer,
{
    /// Reads every in-bounds address of `range`. Each run of addresses outside of memory, below or above it, is
    /// reported once and left out.
    ///
    /// Fails if the program was aborted, since its memory is in an undefined state.
    pub fn snapshot(&mut self, range: RangeInclusive<i64>) -> Result<Snapshot, ExecuteErr> {
        if let State::Faulted(err) = self.state {
            return Err(err);
        }

        let mut snapshot = Snapshot::default();

        if range.is_empty() {
            return Ok(snapshot);
        }

        let (first, last) = (*range.start(), *range.end());
        let memory_end = MEMORY_SIZE as i64;

        if first < 0 {
            self.report_out_of_memory(first, last.min(-1));
        }

        let (low, high) = (first.max(0), last.min(memory_end - 1));
        if low <= high {
            for addr in low as usize..=high as usize {
                if let Some(value) = self.memory.cell(addr) {
                    snapshot.entries.push((addr, value));
                }
            }
        }

        if last >= memory_end {
            self.report_out_of_memory(first.max(memory_end), last);
        }

        Ok(snapshot)
    }

    fn report_out_of_memory(&mut self, first: i64, last: i64) {
        let fault = Fault::SnapshotRangeOutOfMemory { first, last };
        warn!("{}", fault);
        self.observer.on_fault(self.pc, &fault);
    }

    /// Executes the whole program and takes a snapshot of `range` afterwards.
    pub fn run(&mut self, range: RangeInclusive<i64>) -> Result<Snapshot, ExecuteErr> {
        self.execute_to_halt()?;
        self.snapshot(range)
    }
}
