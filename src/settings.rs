use std::path::PathBuf;

use crate::timer::TIMER_DEC_PER_SECOND;

pub const DEFAULT_SCALE: usize = 10;
pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;

/// Front-end configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rom_path: PathBuf,
    pub scale: usize,
    pub instructions_per_second: u32,
    pub debug: bool,
}

impl Settings {
    pub fn new(rom_path: impl Into<PathBuf>) -> Self {
        Self {
            rom_path: rom_path.into(),
            scale: DEFAULT_SCALE,
            instructions_per_second: DEFAULT_INSTRUCTIONS_PER_SECOND,
            debug: false,
        }
    }

    pub fn with_scale(mut self, scale: usize) -> Self {
        self.scale = scale.max(1);
        self
    }

    pub fn with_speed(mut self, instructions_per_second: u32) -> Self {
        self.instructions_per_second = instructions_per_second;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Instructions to run per 60 Hz frame, at least one.
    pub fn steps_per_frame(&self) -> usize {
        let per_frame = self.instructions_per_second as u64 / TIMER_DEC_PER_SECOND;
        per_frame.max(1) as usize
    }
}
