use std::path::PathBuf;

use crate::memory::TypeAddr;

pub type Result<T> = std::result::Result<T, Chip8Error>;

#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    // call depth is capped at 16 return addresses
    #[error("stack overflow: more than {0} nested calls")]
    StackOverflow(usize),

    #[error("program counter out of range: {0:#05X}")]
    ProgramCounterOutOfRange(TypeAddr),

    #[error("unknown opcode: {0:#06X}")]
    UnknownOpcode(u16),

    #[error("ROM file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PartialEq for Chip8Error {
    fn eq(&self, other: &Self) -> bool {
        use Chip8Error::*;
        match (self, other) {
            (RomTooLarge { size: a, max: b }, RomTooLarge { size: c, max: d }) => a == c && b == d,
            (StackUnderflow, StackUnderflow) => true,
            (StackOverflow(a), StackOverflow(b)) => a == b,
            (ProgramCounterOutOfRange(a), ProgramCounterOutOfRange(b)) => a == b,
            (UnknownOpcode(a), UnknownOpcode(b)) => a == b,
            (FileNotFound(a), FileNotFound(b)) => a == b,
            (Io(a), Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
