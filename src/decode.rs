use std::fmt;

use crate::error::{Chip8Error, Result};
use crate::memory::TypeAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // n is starting digit (1-based, from the left), m is length
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask = (1u32 << (m * 4)) - 1;
        ((self.code as u32 >> shift_places) & mask) as u16
    }

    pub fn identifier(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn kk(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

impl PartialEq<u16> for RawInstruction {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.code)
    }
}

/// A decoded instruction. Register operands are indices into V0..VF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // 0NNN
    // machine code routine on the original hardware, ignored here
    Sys(TypeAddr),
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    // set register VX to value NN
    SetRegister(u8, u8),
    // 7XNN
    // add value NN to VX, VF untouched
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    /// 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    // set index register I to address NNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I
    // at coordinates (VX, VY), XOR onto the screen
    // VF = 1 if any lit pixel was switched off
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),
}

impl Instruction {
    pub fn decode(ins: u16) -> Result<Self> {
        let raw = RawInstruction::new(ins);
        let (x, y) = (raw.x(), raw.y());

        let decoded = match raw.identifier() {
            0x0 => match ins {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => Self::Sys(raw.nnn()),
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::PushSubroutine(raw.nnn()),
            0x3 => Self::SkipEqualConstant(x, raw.kk()),
            0x4 => Self::SkipNotEqualConstant(x, raw.kk()),
            0x5 if raw.n() == 0 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, raw.kk()),
            0x7 => Self::AddToRegister(x, raw.kk()),
            0x8 => match raw.n() {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => return Err(Chip8Error::UnknownOpcode(ins)),
            },
            0x9 if raw.n() == 0 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(x, raw.kk()),
            0xD => Self::Display(x, y, raw.n()),
            0xE => match raw.kk() {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => return Err(Chip8Error::UnknownOpcode(ins)),
            },
            0xF => match raw.kk() {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => return Err(Chip8Error::UnknownOpcode(ins)),
            },
            _ => return Err(Chip8Error::UnknownOpcode(ins)),
        };
        Ok(decoded)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Sys(addr) => write!(f, "SYS {addr:#05X}"),
            ClearScreen => write!(f, "CLS"),
            PopSubroutine => write!(f, "RET"),
            Jump(addr) => write!(f, "JP {addr:#05X}"),
            PushSubroutine(addr) => write!(f, "CALL {addr:#05X}"),
            SkipEqualConstant(x, kk) => write!(f, "SE V{x:X}, {kk:#04X}"),
            SkipNotEqualConstant(x, kk) => write!(f, "SNE V{x:X}, {kk:#04X}"),
            SkipEqualRegister(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            SkipNotEqualRegister(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            SetRegister(x, kk) => write!(f, "LD V{x:X}, {kk:#04X}"),
            AddToRegister(x, kk) => write!(f, "ADD V{x:X}, {kk:#04X}"),
            CopyRegister(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            XOr(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            Add(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            SubtractForward(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            RightShift(x, _) => write!(f, "SHR V{x:X}"),
            SubtractBackward(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            LeftShift(x, _) => write!(f, "SHL V{x:X}"),
            SetIndexRegister(addr) => write!(f, "LD I, {addr:#05X}"),
            JumpWithOffset(addr) => write!(f, "JP V0, {addr:#05X}"),
            Random(x, kk) => write!(f, "RND V{x:X}, {kk:#04X}"),
            Display(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            SkipIfPressed(x) => write!(f, "SKP V{x:X}"),
            SkipIfNotPressed(x) => write!(f, "SKNP V{x:X}"),
            CopyDelayToRegister(x) => write!(f, "LD V{x:X}, DT"),
            GetKey(x) => write!(f, "LD V{x:X}, K"),
            CopyRegisterToDelay(x) => write!(f, "LD DT, V{x:X}"),
            CopyRegisterToSound(x) => write!(f, "LD ST, V{x:X}"),
            AddToIndex(x) => write!(f, "ADD I, V{x:X}"),
            PointChar(x) => write!(f, "LD F, V{x:X}"),
            ToDecimal(x) => write!(f, "LD B, V{x:X}"),
            StoreRegisterToMemory(x) => write!(f, "LD [I], V{x:X}"),
            LoadRegisterFromMemory(x) => write!(f, "LD V{x:X}, [I]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_manip() {
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 1), 0xC);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(3, 1), 0xE);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 1), 0x4);

        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 2), 0x4C);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 2), 0xCE);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 4), 0x4CEE);
    }

    #[test]
    fn operand_fields() {
        let raw = RawInstruction::new(0xD12F);
        assert_eq!(raw.identifier(), 0xD);
        assert_eq!(raw.x(), 0x1);
        assert_eq!(raw.y(), 0x2);
        assert_eq!(raw.n(), 0xF);
        assert_eq!(raw.kk(), 0x2F);
        assert_eq!(raw.nnn(), 0x12F);
        assert!(raw == 0xD12F);
    }

    #[test]
    fn decode_table() {
        use Instruction::*;
        let cases = [
            (0x00E0, ClearScreen),
            (0x00EE, PopSubroutine),
            (0x0123, Sys(0x123)),
            (0x0000, Sys(0x000)),
            (0x1ABC, Jump(0xABC)),
            (0x2ABC, PushSubroutine(0xABC)),
            (0x3A12, SkipEqualConstant(0xA, 0x12)),
            (0x4A12, SkipNotEqualConstant(0xA, 0x12)),
            (0x5AB0, SkipEqualRegister(0xA, 0xB)),
            (0x6A12, SetRegister(0xA, 0x12)),
            (0x7A12, AddToRegister(0xA, 0x12)),
            (0x8AB0, CopyRegister(0xA, 0xB)),
            (0x8AB1, Or(0xA, 0xB)),
            (0x8AB2, And(0xA, 0xB)),
            (0x8AB3, XOr(0xA, 0xB)),
            (0x8AB4, Add(0xA, 0xB)),
            (0x8AB5, SubtractForward(0xA, 0xB)),
            (0x8AB6, RightShift(0xA, 0xB)),
            (0x8AB7, SubtractBackward(0xA, 0xB)),
            (0x8ABE, LeftShift(0xA, 0xB)),
            (0x9AB0, SkipNotEqualRegister(0xA, 0xB)),
            (0xA123, SetIndexRegister(0x123)),
            (0xB123, JumpWithOffset(0x123)),
            (0xCA12, Random(0xA, 0x12)),
            (0xDAB5, Display(0xA, 0xB, 5)),
            (0xEA9E, SkipIfPressed(0xA)),
            (0xEAA1, SkipIfNotPressed(0xA)),
            (0xFA07, CopyDelayToRegister(0xA)),
            (0xFA0A, GetKey(0xA)),
            (0xFA15, CopyRegisterToDelay(0xA)),
            (0xFA18, CopyRegisterToSound(0xA)),
            (0xFA1E, AddToIndex(0xA)),
            (0xFA29, PointChar(0xA)),
            (0xFA33, ToDecimal(0xA)),
            (0xFA55, StoreRegisterToMemory(0xA)),
            (0xFA65, LoadRegisterFromMemory(0xA)),
        ];
        for (code, expected) in cases {
            assert_eq!(Instruction::decode(code), Ok(expected), "{code:04X}");
        }
    }

    #[test]
    fn decode_unknown() {
        for code in [0x5AB1, 0x8AB8, 0x8ABF, 0x9AB1, 0xEA00, 0xFA00, 0xFAFF] {
            assert_eq!(
                Instruction::decode(code),
                Err(Chip8Error::UnknownOpcode(code))
            );
        }
    }

    #[test]
    fn decode_is_total() {
        for code in 0..=u16::MAX {
            match Instruction::decode(code) {
                Ok(_) => {}
                Err(Chip8Error::UnknownOpcode(c)) => assert_eq!(c, code),
                Err(e) => panic!("unexpected error for {code:04X}: {e}"),
            }
        }
    }

    #[test]
    fn mnemonics() {
        let text = |code| Instruction::decode(code).unwrap().to_string();
        assert_eq!(text(0x600A), "LD V0, 0x0A");
        assert_eq!(text(0x8014), "ADD V0, V1");
        assert_eq!(text(0x2ABC), "CALL 0xABC");
        assert_eq!(text(0xB200), "JP V0, 0x200");
        assert_eq!(text(0xD125), "DRW V1, V2, 5");
        assert_eq!(text(0xF355), "LD [I], V3");
        assert_eq!(text(0xF365), "LD V3, [I]");
        assert_eq!(text(0x00EE), "RET");
    }
}
