use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Chip8Error, Result};
use crate::memory::{TypeAddr, PROGRAM_START};

/// Raw program image: a headerless stream of big-endian opcodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rom {
    bytes: Vec<u8>,
}

impl Rom {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read(path) {
            Ok(bytes) => {
                log::debug!("read {} bytes from {}", bytes.len(), path.display());
                Ok(Self::from_bytes(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(Chip8Error::FileNotFound(path.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// (address, opcode) pairs as the program would sit in memory. A trailing
    /// odd byte becomes the high byte of a final opcode.
    pub fn opcodes(&self) -> impl Iterator<Item = (TypeAddr, u16)> + '_ {
        self.bytes.chunks(2).enumerate().map(|(i, pair)| {
            let addr = PROGRAM_START.wrapping_add((i * 2) as TypeAddr);
            let lo = pair.get(1).copied().unwrap_or(0);
            (addr, u16::from_be_bytes([pair[0], lo]))
        })
    }
}
