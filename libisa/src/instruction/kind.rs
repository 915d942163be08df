use std::fmt::Display;

use bimap::BiMap;
use lazy_static::lazy_static;

use crate::Word;

lazy_static! {
    static ref OPCODE_MNEMONIC_BIMAP: BiMap<Opcode, &'static str> = BiMap::from_iter([
        (Opcode::LoadConst, "load_const"),
        (Opcode::ReadMem, "read_mem"),
        (Opcode::WriteMem, "write_mem"),
        (Opcode::ModMem, "mod_mem"),
    ]);
}

/// A bit range of a word carrying one operand.
///
/// `width` is the number of bits the decoder reads back. For `WriteMem` and `ModMem` the `B` field is read as 6 bits
/// although the next field only starts 7 bits later, so bit 10 of those words is never decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    pub offset: u32,
    pub width: u32,
}

impl Field {
    pub const fn new(offset: u32, width: u32) -> Self {
        Self { offset, width }
    }

    pub const fn mask(&self) -> Word {
        (1 << self.width) - 1
    }

    pub const fn extract(&self, word: Word) -> Word {
        (word >> self.offset) & self.mask()
    }

    /// Places `value` at the field's offset after truncating it to the field's width.
    pub const fn place(&self, value: Word) -> Word {
        (value & self.mask()) << self.offset
    }

    pub const fn fits(&self, value: Word) -> bool {
        value <= self.mask()
    }
}

const REGISTER_AND_CONSTANT: [Field; 2] = [Field::new(4, 5), Field::new(10, 20)];

const OFFSET_ADDRESS_REGISTER: [Field; 3] = [Field::new(4, 6), Field::new(11, 5), Field::new(17, 5)];

const OFFSET_ADDRESS_REGISTER_PAIR: [Field; 4] = [
    Field::new(4, 6),
    Field::new(11, 5),
    Field::new(17, 5),
    Field::new(23, 5),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    LoadConst = 6,
    ReadMem = 10,
    WriteMem = 12,
    ModMem = 14,
}

impl Opcode {
    pub const ALL: [Opcode; 4] = [Self::LoadConst, Self::ReadMem, Self::WriteMem, Self::ModMem];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            6 => Some(Self::LoadConst),
            10 => Some(Self::ReadMem),
            12 => Some(Self::WriteMem),
            14 => Some(Self::ModMem),
            _ => None,
        }
    }

    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        OPCODE_MNEMONIC_BIMAP.get_by_right(mnemonic).copied()
    }

    pub fn mnemonic(&self) -> &'static str {
        OPCODE_MNEMONIC_BIMAP
            .get_by_left(self)
            .copied()
            .unwrap_or("??")
    }

    /// Operand fields in argument order (`B`, `C`, `D`, `E`).
    pub const fn fields(self) -> &'static [Field] {
        match self {
            Self::LoadConst | Self::ReadMem => &REGISTER_AND_CONSTANT,
            Self::WriteMem => &OFFSET_ADDRESS_REGISTER,
            Self::ModMem => &OFFSET_ADDRESS_REGISTER_PAIR,
        }
    }

    pub const fn arity(self) -> usize {
        self.fields().len()
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
