use byteorder::{ByteOrder, LittleEndian};

pub mod instruction;
pub mod source;

/// A decoded machine word. Only the low `WORD_BITS` bits are ever set.
pub type Word = u64;

pub const BYTES_PER_WORD: usize = 6;
pub const WORD_BITS: u32 = (BYTES_PER_WORD * 8) as u32;
pub const WORD_MASK: Word = (1 << WORD_BITS) - 1;

pub const OPCODE_MASK: Word = 0x0F;

pub fn word_to_bytes(word: Word) -> [u8; BYTES_PER_WORD] {
    let mut bytes = [0; BYTES_PER_WORD];
    LittleEndian::write_uint(&mut bytes, word & WORD_MASK, BYTES_PER_WORD);
    bytes
}

pub fn bytes_to_word(bytes: [u8; BYTES_PER_WORD]) -> Word {
    LittleEndian::read_uint(&bytes, BYTES_PER_WORD)
}
