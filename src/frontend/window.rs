use minifb::{Key, Window, WindowOptions};
use yac8::display::{FrameBuffer, HEIGHT, WIDTH};
use yac8::Emulator;

use super::overlay::DebugPanel;

const TITLE: &str = "yac8 - ESC to exit";

pub struct Screen {
    pixel_buffer: Vec<u32>,
    width: usize,
    height: usize,
    scale: usize,
    panel: Option<DebugPanel>,
    pub window: Window,
}

pub fn from_u16_rgb(r: u16, g: u16, b: u16) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

impl Screen {
    pub fn new(scale: usize, debug: bool) -> Result<Self, minifb::Error> {
        let game_width = WIDTH * scale;
        let panel = debug.then(|| DebugPanel::new(scale, game_width));
        let width = game_width + panel.as_ref().map_or(0, DebugPanel::width_px);
        let height = HEIGHT * scale;

        let mut window = Window::new(TITLE, width, height, WindowOptions::default())?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            pixel_buffer: vec![background(); width * height],
            width,
            height,
            scale,
            panel,
            window,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn set_status(&mut self, status: Option<&str>) {
        match status {
            Some(status) => self.window.set_title(&format!("{TITLE} [{status}]")),
            None => self.window.set_title(TITLE),
        }
    }

    fn paint(&mut self, fb: &FrameBuffer) {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let colour = if fb.get(x, y) {
                    foreground()
                } else {
                    background()
                };
                for sy in 0..self.scale {
                    let row = (y * self.scale + sy) * self.width;
                    let start = row + x * self.scale;
                    self.pixel_buffer[start..start + self.scale].fill(colour);
                }
            }
        }
    }

    /// Repaints what changed and pushes the buffer to the window.
    pub fn sync(&mut self, emu: &mut Emulator) -> Result<(), minifb::Error> {
        if emu.take_redraw() {
            self.paint(emu.framebuffer());
        }
        if let Some(panel) = &self.panel {
            panel.draw(emu, &mut self.pixel_buffer, self.width, foreground(), background());
        }
        self.window
            .update_with_buffer(&self.pixel_buffer, self.width, self.height)
    }
}

fn foreground() -> u32 {
    from_u16_rgb(0, 127, 255)
}

fn background() -> u32 {
    from_u16_rgb(0, 0, 0)
}
