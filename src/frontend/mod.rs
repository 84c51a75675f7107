//! minifb window, keyboard and debug panel around the interpreter.

mod input;
mod overlay;
mod window;

use anyhow::Context;
use minifb::Key;
use yac8::timer::TimerClock;
use yac8::{Emulator, Rom, Settings};

use window::Screen;

pub fn run(settings: &Settings, rom: &Rom) -> anyhow::Result<()> {
    let mut emu = Emulator::new();
    emu.load(rom)?;

    let mut screen =
        Screen::new(settings.scale, settings.debug).context("could not open a window")?;
    let mut clock = TimerClock::new();
    let steps_per_frame = settings.steps_per_frame();

    // F2 toggles between running and single stepping with F1 (debug only)
    let mut running = true;
    let mut halted = false;

    while screen.is_open() {
        input::sync_keypad(&screen.window, emu.keypad_mut());

        let mut steps = 0;
        if !halted {
            if settings.debug && input::was_pressed(&screen.window, Key::F2) {
                running = !running;
                screen.set_status((!running).then_some("paused"));
            }
            steps = if running {
                steps_per_frame
            } else if settings.debug && input::was_pressed(&screen.window, Key::F1) {
                1
            } else {
                0
            };
        }

        for _ in 0..steps {
            if let Err(e) = emu.step() {
                log::error!("emulation stopped: {e}");
                screen.set_status(Some(&format!("halted: {e}")));
                halted = true;
                break;
            }
        }

        let ticks = clock.poll();
        if running && !halted {
            for _ in 0..ticks {
                emu.tick_timers();
            }
        }

        screen.sync(&mut emu)?;
    }
    Ok(())
}
