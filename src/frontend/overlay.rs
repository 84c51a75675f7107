use yac8::display::HEIGHT;
use yac8::memory::{DEFAULT_FONT, FONT_GLYPH_SIZE};
use yac8::Emulator;

// glyphs are 4x5, plus a one cell gap
const GLYPH_W: usize = 5;
const GLYPH_H: usize = 6;
const MARGIN: usize = 2;
const COLUMNS: usize = 12;
const ROWS: usize = 11;

pub const PANEL_CELLS_WIDE: usize = COLUMNS * GLYPH_W + 2 * MARGIN;
const PANEL_CELLS_TALL: usize = ROWS * GLYPH_H + 2 * MARGIN;

/// Register/stack/history panel drawn beside the game screen, written with
/// the interpreter's own hex font.
pub struct DebugPanel {
    cell: usize,
    x_origin: usize,
}

impl DebugPanel {
    pub fn new(scale: usize, x_origin: usize) -> Self {
        Self {
            cell: (HEIGHT * scale / PANEL_CELLS_TALL).max(1),
            x_origin,
        }
    }

    pub fn width_px(&self) -> usize {
        PANEL_CELLS_WIDE * self.cell
    }

    /// Text lines of hex digits; anything else is left blank.
    pub fn lines(emu: &Emulator) -> Vec<String> {
        let mut lines = vec![format!(
            "{:03X} {:04X} {:X}",
            emu.pc(),
            emu.index(),
            emu.stack().len()
        )];
        for regs in emu.registers().chunks(4) {
            let row: Vec<String> = regs.iter().map(|v| format!("{v:02X}")).collect();
            lines.push(row.join(" "));
        }
        lines.push(format!("{:02X} {:02X}", emu.delay_timer(), emu.sound_timer()));
        let history: Vec<String> = emu
            .history()
            .map(|(_, opcode)| format!("{opcode:04X}"))
            .collect();
        for pair in history.rchunks(2).rev() {
            lines.push(pair.join(" "));
        }
        lines
    }

    pub fn draw(&self, emu: &Emulator, buffer: &mut [u32], stride: usize, fg: u32, bg: u32) {
        let height = buffer.len() / stride;
        for y in 0..height {
            for x in self.x_origin..stride {
                buffer[y * stride + x] = bg;
            }
        }

        for (row, line) in Self::lines(emu).iter().enumerate().take(ROWS) {
            for (col, ch) in line.chars().enumerate().take(COLUMNS) {
                if let Some(digit) = ch.to_digit(16) {
                    let cx = MARGIN + col * GLYPH_W;
                    let cy = MARGIN + row * GLYPH_H;
                    self.draw_glyph(digit as usize, cx, cy, buffer, stride, fg);
                }
            }
        }
    }

    fn draw_glyph(
        &self,
        digit: usize,
        cx: usize,
        cy: usize,
        buffer: &mut [u32],
        stride: usize,
        fg: u32,
    ) {
        let start = digit * FONT_GLYPH_SIZE as usize;
        let glyph = &DEFAULT_FONT[start..start + FONT_GLYPH_SIZE as usize];
        for (gy, bits) in glyph.iter().enumerate() {
            for gx in 0..4 {
                if (bits >> (7 - gx)) & 1 == 0 {
                    continue;
                }
                self.fill_cell(cx + gx, cy + gy, buffer, stride, fg);
            }
        }
    }

    fn fill_cell(&self, cx: usize, cy: usize, buffer: &mut [u32], stride: usize, colour: u32) {
        let x0 = self.x_origin + cx * self.cell;
        let y0 = cy * self.cell;
        for y in y0..y0 + self.cell {
            for x in x0..(x0 + self.cell).min(stride) {
                if let Some(px) = buffer.get_mut(y * stride + x) {
                    *px = colour;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_show_machine_state() {
        let mut emu = Emulator::new();
        emu.load_rom(&[0x60, 0xAB, 0xA1, 0x23, 0x12, 0x00]).unwrap();
        emu.run(3).unwrap();
        let lines = DebugPanel::lines(&emu);
        assert_eq!(lines[0], "200 0123 0");
        assert_eq!(lines[1], "AB 00 00 00");
        assert_eq!(lines[5], "00 00");
        // newest pairs stay together at the bottom
        assert_eq!(lines[6], "60AB");
        assert_eq!(lines[7], "A123 1200");
        assert!(lines.len() <= ROWS);
    }

    #[test]
    fn draw_stays_inside_panel() {
        let emu = Emulator::new();
        let panel = DebugPanel::new(10, 640);
        let stride = 640 + panel.width_px();
        let mut buffer = vec![7u32; stride * 320];
        panel.draw(&emu, &mut buffer, stride, 1, 0);
        // the game screen half is untouched
        assert!(buffer.chunks(stride).all(|row| row[..640].iter().all(|&px| px == 7)));
        assert!(buffer.iter().any(|&px| px == 1));
    }
}
