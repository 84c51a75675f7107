//! Text listings of a ROM. Purely presentational; nothing here touches an
//! emulator.

use std::io::Write;

use crate::decode::Instruction;
use crate::error::Result;
use crate::rom::Rom;

const DUMP_WIDTH: usize = 16;

/// One line for an opcode: `PPP  HH LL  MNEMONIC operands`.
pub fn format_line(addr: u16, opcode: u16) -> String {
    let [hi, lo] = opcode.to_be_bytes();
    match Instruction::decode(opcode) {
        Ok(ins) => format!("{addr:03X}  {hi:02X} {lo:02X}  {ins}"),
        Err(_) => format!("{addr:03X}  {hi:02X} {lo:02X}  {opcode:04X}"),
    }
}

pub fn disassemble(rom: &Rom, out: &mut impl Write) -> Result<()> {
    for (addr, opcode) in rom.opcodes() {
        writeln!(out, "{}", format_line(addr, opcode))?;
    }
    Ok(())
}

/// 16 bytes per line, each line prefixed by its file offset.
pub fn hex_dump(rom: &Rom, out: &mut impl Write) -> Result<()> {
    for (line, chunk) in rom.bytes().chunks(DUMP_WIDTH).enumerate() {
        let bytes: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        writeln!(out, "{:04x}: {}", line * DUMP_WIDTH, bytes.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(bytes: &[u8]) -> String {
        let mut out = Vec::new();
        disassemble(&Rom::from_bytes(bytes.to_vec()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn lists_known_opcodes() {
        let text = listing(&[0x60, 0x0A, 0x61, 0x05, 0x80, 0x14, 0x00, 0xE0]);
        assert_eq!(
            text,
            "200  60 0A  LD V0, 0x0A\n\
             202  61 05  LD V1, 0x05\n\
             204  80 14  ADD V0, V1\n\
             206  00 E0  CLS\n"
        );
    }

    #[test]
    fn unknown_opcodes_are_raw() {
        assert_eq!(format_line(0x20A, 0x800F), "20A  80 0F  800F");
        assert_eq!(format_line(0x20C, 0xE1FF), "20C  E1 FF  E1FF");
    }

    #[test]
    fn hex_dump_lines() {
        let rom = Rom::from_bytes((0u8..20).collect());
        let mut out = Vec::new();
        hex_dump(&rom, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0000: 00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f\n\
             0010: 10 11 12 13\n"
        );
    }
}
