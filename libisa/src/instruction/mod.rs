use std::fmt::Display;

use kind::Opcode;
use thiserror::Error;

use crate::{Word, BYTES_PER_WORD, OPCODE_MASK, WORD_MASK};

pub mod assembler;
pub mod kind;


#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("Unknown mnemonic \"{0}\"")]
    UnknownMnemonic(String),

    #[error("{mnemonic} takes {expected} arguments, got {actual}")]
    ArityMismatch {
        mnemonic: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Encoded word 0x{0:x} doesn't fit into a 6 byte word")]
    WordOverflow(u128),

    #[error("Line {line}: {source}")]
    AtLine {
        line: usize,
        source: Box<AssemblyError>,
    },
}

impl AssemblyError {
    pub fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

/// How operand values wider than their field are treated when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodeMode {
    /// Every operand is truncated to its field width, so fields can't bleed into each other.
    #[default]
    Masked,

    /// Operands are OR-ed in unmasked. Oversized values spill into neighbouring fields exactly like programs built
    /// by the legacy assembler.
    Compatible,
}

/// One instruction. Operand names follow the field order `B`, `C`, `D`, `E` of the word layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `registers[register] = constant`
    LoadConst { register: Word, constant: Word },

    /// `registers[register] = memory[address]`
    ReadMem { register: Word, address: Word },

    /// `memory[address + offset] = registers[register]`
    WriteMem {
        offset: Word,
        address: Word,
        register: Word,
    },

    /// `memory[address + offset] = memory[registers[dividend]] % registers[divisor]`
    ModMem {
        offset: Word,
        address: Word,
        dividend: Word,
        divisor: Word,
    },

    /// Any opcode nibble without an operation, executed as a no-op.
    Unrecognized { opcode: u8 },
}

impl Instruction {
    pub fn from_parts(opcode: Opcode, args: &[Word]) -> Result<Self, AssemblyError> {
        Ok(match (opcode, args) {
            (Opcode::LoadConst, &[register, constant]) => Self::LoadConst { register, constant },
            (Opcode::ReadMem, &[register, address]) => Self::ReadMem { register, address },
            (Opcode::WriteMem, &[offset, address, register]) => Self::WriteMem {
                offset,
                address,
                register,
            },
            (Opcode::ModMem, &[offset, address, dividend, divisor]) => Self::ModMem {
                offset,
                address,
                dividend,
                divisor,
            },
            _ => {
                return Err(AssemblyError::ArityMismatch {
                    mnemonic: opcode.mnemonic(),
                    expected: opcode.arity(),
                    actual: args.len(),
                })
            }
        })
    }

    pub fn from_mnemonic(mnemonic: &str, args: &[Word]) -> Result<Self, AssemblyError> {
        let opcode = Opcode::from_mnemonic(mnemonic)
            .ok_or_else(|| AssemblyError::UnknownMnemonic(mnemonic.to_string()))?;

        Self::from_parts(opcode, args)
    }

    pub fn opcode(&self) -> Option<Opcode> {
        match self {
            Self::LoadConst { .. } => Some(Opcode::LoadConst),
            Self::ReadMem { .. } => Some(Opcode::ReadMem),
            Self::WriteMem { .. } => Some(Opcode::WriteMem),
            Self::ModMem { .. } => Some(Opcode::ModMem),
            Self::Unrecognized { .. } => None,
        }
    }

    /// The raw 4-bit operation code, including unrecognized ones.
    pub fn code(&self) -> u8 {
        match self {
            Self::Unrecognized { opcode } => opcode & OPCODE_MASK as u8,
            _ => self.opcode().map_or(0, Opcode::code),
        }
    }

    pub fn operands(&self) -> Vec<Word> {
        match *self {
            Self::LoadConst { register, constant } => vec![register, constant],
            Self::ReadMem { register, address } => vec![register, address],
            Self::WriteMem {
                offset,
                address,
                register,
            } => vec![offset, address, register],
            Self::ModMem {
                offset,
                address,
                dividend,
                divisor,
            } => vec![offset, address, dividend, divisor],
            Self::Unrecognized { .. } => vec![],
        }
    }

    /// Argument positions and values that don't fit their field and would be altered by encoding.
    pub fn oversized_operands(&self) -> Vec<(usize, Word)> {
        let Some(opcode) = self.opcode() else {
            return vec![];
        };

        opcode
            .fields()
            .iter()
            .zip(self.operands())
            .enumerate()
            .filter(|(_, (field, value))| !field.fits(*value))
            .map(|(index, (_, value))| (index, value))
            .collect()
    }

    pub fn encode(&self, mode: EncodeMode) -> Result<[u8; BYTES_PER_WORD], AssemblyError> {
        self.encode_word(mode).map(crate::word_to_bytes)
    }

    pub fn encode_word(&self, mode: EncodeMode) -> Result<Word, AssemblyError> {
        let Some(opcode) = self.opcode() else {
            return Ok(self.code() as Word);
        };

        let operands = opcode.fields().iter().zip(self.operands());

        match mode {
            EncodeMode::Masked => Ok(operands
                .fold(opcode.code() as Word, |word, (field, value)| {
                    word | field.place(value)
                })),

            EncodeMode::Compatible => {
                let word = operands.fold(opcode.code() as u128, |word, (field, value)| {
                    word | (value as u128) << field.offset
                });

                if word > WORD_MASK as u128 {
                    return Err(AssemblyError::WordOverflow(word));
                }

                Ok(word as Word)
            }
        }
    }

    pub fn decode(bytes: [u8; BYTES_PER_WORD]) -> Self {
        Self::decode_word(crate::bytes_to_word(bytes))
    }

    pub fn decode_word(word: Word) -> Self {
        let code = (word & OPCODE_MASK) as u8;

        let Some(opcode) = Opcode::from_code(code) else {
            return Self::Unrecognized { opcode: code };
        };

        let fields = opcode.fields();
        let [b, c, d, e] =
            [0, 1, 2, 3].map(|index| fields.get(index).map_or(0, |field| field.extract(word)));

        match opcode {
            Opcode::LoadConst => Self::LoadConst {
                register: b,
                constant: c,
            },
            Opcode::ReadMem => Self::ReadMem {
                register: b,
                address: c,
            },
            Opcode::WriteMem => Self::WriteMem {
                offset: b,
                address: c,
                register: d,
            },
            Opcode::ModMem => Self::ModMem {
                offset: b,
                address: c,
                dividend: d,
                divisor: e,
            },
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.opcode() {
            Some(opcode) => f.write_str(opcode.mnemonic())?,
            None => return f.write_fmt(format_args!("??({})", self.code())),
        }

        for (index, operand) in self.operands().iter().enumerate() {
            let separator = if index == 0 { " " } else { ", " };
            f.write_fmt(format_args!("{}{}", separator, operand))?;
        }

        Ok(())
    }
}
