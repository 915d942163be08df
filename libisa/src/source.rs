//! Reader for the comma separated instruction list the assembler consumes.
//!
//! ```text
//! load_const,0,803
//! # comments and blank lines are skipped
//! write_mem,0,1,0
//! ```

use thiserror::Error;

use crate::{
    instruction::{AssemblyError, Instruction},
    Word,
};

const COMMENT_PREFIX: char = '#';
const SEPARATOR: char = ',';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Line {line}: missing mnemonic")]
    MissingMnemonic { line: usize },

    #[error("Line {line}: invalid argument \"{argument}\" ({reason})")]
    InvalidArgument {
        line: usize,
        argument: String,
        reason: String,
    },
}

/// One row of the instruction list, not yet checked against the instruction set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInstruction {
    /// 1-based line number in the source text.
    pub line: usize,
    pub mnemonic: String,
    pub args: Vec<Word>,
}

impl SourceInstruction {
    pub fn to_instruction(&self) -> Result<Instruction, AssemblyError> {
        Instruction::from_mnemonic(&self.mnemonic, &self.args).map_err(|e| e.at_line(self.line))
    }
}

pub fn parse(source: &str) -> Result<Vec<SourceInstruction>, SourceError> {
    source
        .lines()
        .enumerate()
        .map(|(index, text)| (index + 1, text.trim()))
        .filter(|(_, text)| !text.is_empty() && !text.starts_with(COMMENT_PREFIX))
        .map(|(line, text)| parse_line(line, text))
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<SourceInstruction, SourceError> {
    let mut fields = text.split(SEPARATOR).map(str::trim);

    let mnemonic = fields
        .next()
        .filter(|mnemonic| !mnemonic.is_empty())
        .ok_or(SourceError::MissingMnemonic { line })?;

    let args = fields
        .map(|argument| {
            argument
                .parse::<Word>()
                .map_err(|e| SourceError::InvalidArgument {
                    line,
                    argument: argument.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect::<Result<_, _>>()?;

    Ok(SourceInstruction {
        line,
        mnemonic: mnemonic.to_string(),
        args,
    })
}
