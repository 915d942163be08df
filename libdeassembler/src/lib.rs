use std::iter::Peekable;

use libisa::{instruction::Instruction, BYTES_PER_WORD};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeassemblyError {
    #[error("Incomplete word at byte {offset}")]
    IncompleteWord { offset: usize },
}

pub struct Deassembler<'a, I>
where
    I: Iterator<Item = &'a u8>,
{
    code_iter: Peekable<I>,
    offset: usize,
}

impl<'a, I> Deassembler<'a, I>
where
    I: Iterator<Item = &'a u8>,
{
    pub fn new(code_iter: I) -> Self {
        Self {
            code_iter: code_iter.peekable(),
            offset: 0,
        }
    }

    pub fn deassemble(mut self) -> Result<Vec<Instruction>, DeassemblyError> {
        let mut output = Vec::new();

        while let Some(instruction) = self.deassemble_instruction() {
            output.push(instruction?);
        }

        Ok(output)
    }

    /// One `offset: instruction` line per word. A trailing partial word ends the listing with an error line.
    pub fn deassemble_text(mut self) -> String {
        let mut text = String::new();

        while let Some(instruction) = self.deassemble_instruction_text() {
            text.push_str(&instruction);
            text.push('\n');
        }

        text
    }

    pub fn deassemble_instruction(&mut self) -> Option<Result<Instruction, DeassemblyError>> {
        self.code_iter.peek()?;

        Some(self.next_word().map(Instruction::decode))
    }

    pub fn deassemble_instruction_text(&mut self) -> Option<String> {
        let offset = self.offset;

        Some(match self.deassemble_instruction()? {
            Ok(instr) => format!("{:>6}: {}", offset, instr),
            Err(e) => format!("<{}>", e),
        })
    }

    fn next_word(&mut self) -> Result<[u8; BYTES_PER_WORD], DeassemblyError> {
        let offset = self.offset;
        let mut word = [0; BYTES_PER_WORD];

        for byte in &mut word {
            *byte = *self
                .code_iter
                .next()
                .ok_or(DeassemblyError::IncompleteWord { offset })?;
            self.offset += 1;
        }

        Ok(word)
    }
}
