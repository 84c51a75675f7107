use crate::error::{Chip8Error, Result};
use crate::memory::{TypeAddr, PROGRAM_START};

pub const REGISTER_COUNT: usize = 16;
/// VF doubles as the carry, borrow and collision flag.
pub const FLAG: u8 = 0xF;

/// Highest address an instruction can be fetched from.
pub const PC_MAX: TypeAddr = 0xFFE;

pub struct Registers {
    registers: [u8; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
        }
    }

    // register numbers come from a nibble; mask anyway so a bad index can't escape the file
    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn set_flag(&mut self, on: bool) {
        self.set_register(FLAG, on as u8);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn as_array(&self) -> &[u8; REGISTER_COUNT] {
        &self.registers
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn check(addr: TypeAddr) -> Result<TypeAddr> {
        if (PROGRAM_START..=PC_MAX).contains(&addr) {
            Ok(addr)
        } else {
            Err(Chip8Error::ProgramCounterOutOfRange(addr))
        }
    }

    /// Moves to the next instruction; the counter is left untouched on error.
    pub fn increment(&mut self) -> Result<()> {
        self.set_addr(self.0.wrapping_add(2))
    }

    pub fn set_addr(&mut self, addr: TypeAddr) -> Result<()> {
        self.0 = Self::check(addr)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_wraps_without_touching_flag() {
        let mut regs = Registers::new();
        regs.set_register(FLAG, 0xA);
        regs.set_register(3, 0xF0);
        regs.add_to_register(3, 0x11);
        assert_eq!(regs.get(3), 0x01);
        assert_eq!(regs.get(FLAG), 0xA);
    }

    #[test]
    fn register_index_is_masked() {
        let mut regs = Registers::new();
        regs.set_register(0x12, 7);
        assert_eq!(regs.get(0x2), 7);
    }

    #[test]
    fn program_counter_range() {
        let mut pc = ProgramCounter(PROGRAM_START);
        assert!(pc.set_addr(0x1FE).is_err());
        assert_eq!(pc.0, PROGRAM_START);
        pc.set_addr(PC_MAX).unwrap();
        assert_eq!(
            pc.increment(),
            Err(Chip8Error::ProgramCounterOutOfRange(0x1000))
        );
        assert_eq!(pc.0, PC_MAX);
    }
}
