//! CHIP-8 interpreter core: 35 two-byte big-endian opcodes, decoded once
//! into [`Instruction`] and executed by [`Emulator`].

pub mod decode;
pub mod disassembler;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod rom;
pub mod settings;
pub mod timer;

pub use decode::Instruction;
pub use emulator::Emulator;
pub use error::{Chip8Error, Result};
pub use rom::Rom;
pub use settings::Settings;
