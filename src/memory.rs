use crate::error::{Chip8Error, Result};
use crate::registers::{IndexRegister, ProgramCounter};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; 5 * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const ADDR_MASK: TypeAddr = 0x0FFF;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_ROM_SIZE: usize = (ADDR_MASK - PROGRAM_START) as usize;
pub const FONT_START: TypeAddr = 0x000;
pub const FONT_GLYPH_SIZE: TypeAddr = 5;
pub const STACK_SIZE: usize = 16;

pub const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the 5-byte glyph for hex digit `digit` (only the low nibble is used).
pub fn glyph_addr(digit: u8) -> TypeAddr {
    FONT_START + (digit & 0xF) as TypeAddr * FONT_GLYPH_SIZE
}

pub struct Memory {
    // 4k bytes
    // font data stored from 000 -> 04F, programs from 200
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
            pc: ProgramCounter(PROGRAM_START),
            index: IndexRegister(0x0),
            stack: Stack::new(),
        };
        mem.load_font();
        mem
    }

    fn load_font(&mut self) {
        let start = FONT_START as usize;
        self.bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
    }

    /// Addresses are always masked to 12 bits, so every access stays in range.
    pub fn set(&mut self, addr: TypeAddr, val: u8) {
        self.bytes[(addr & ADDR_MASK) as usize] = val;
    }

    pub fn get(&self, addr: TypeAddr) -> u8 {
        self.bytes[(addr & ADDR_MASK) as usize]
    }

    /// Reads `len` bytes starting at `addr`, wrapping past the end of memory.
    pub fn read_wrapping(&self, addr: TypeAddr, len: usize) -> Vec<u8> {
        (0..len)
            .map(|offset| self.get(addr.wrapping_add(offset as TypeAddr)))
            .collect()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Big-endian opcode at the program counter. The counter must be in range.
    pub fn fetch(&self) -> Result<u16> {
        let pc = ProgramCounter::check(self.pc.0)?;
        Ok(u16::from_be_bytes([self.get(pc), self.get(pc + 1)]))
    }

    pub fn set_pc(&mut self, addr: TypeAddr) -> Result<()> {
        self.pc.set_addr(addr)
    }

    pub fn increment_pc(&mut self) -> Result<()> {
        self.pc.increment()
    }

    pub fn set_index(&mut self, addr: TypeAddr) {
        self.index.set_addr(addr);
    }

    // loads program instructions starting at address 0x200
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: bytes.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start_index = PROGRAM_START as usize;
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Stack {
    addresses: Vec<TypeAddr>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: Vec::with_capacity(STACK_SIZE),
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<()> {
        if self.addresses.len() >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow(STACK_SIZE));
        }
        self.addresses.push(addr);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr> {
        self.addresses.pop().ok_or(Chip8Error::StackUnderflow)
    }

    /// Most recent return address, left on the stack.
    pub fn top(&self) -> Result<TypeAddr> {
        self.addresses.last().copied().ok_or(Chip8Error::StackUnderflow)
    }

    pub fn is_full(&self) -> bool {
        self.addresses.len() >= STACK_SIZE
    }

    pub fn as_slice(&self) -> &[TypeAddr] {
        &self.addresses
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
