use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::{
    decode::Instruction,
    display::FrameBuffer,
    error::{Chip8Error, Result},
    keyboard::Keypad,
    memory::{glyph_addr, Memory, TypeAddr, STACK_SIZE},
    registers::{ProgramCounter, Registers, FLAG},
    rom::Rom,
    timer::Timer,
};

/// How many executed instructions `history` remembers.
pub const HISTORY_LEN: usize = 10;

/// What an executed instruction does to the program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Skip,
    Jump(TypeAddr),
    // stay on the current instruction
    Hold,
}

impl Flow {
    fn skip_if(cond: bool) -> Self {
        if cond {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

pub struct Emulator {
    fb: FrameBuffer,
    regs: Registers,
    mem: Memory,
    keypad: Keypad,
    delay_timer: Timer,
    sound_timer: Timer,
    rng: Box<dyn RngCore>,
    // register waiting for FX0A to see a key press
    awaiting_key: Option<u8>,
    history: VecDeque<(TypeAddr, u16)>,
}

impl Emulator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: impl RngCore + 'static) -> Self {
        Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            keypad: Keypad::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            rng: Box::new(rng),
            awaiting_key: None,
            history: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    /// Back to power-on state: memory holds only the font, registers and
    /// timers are zero, PC is 0x200, the stack and screen are empty.
    pub fn reset(&mut self) {
        self.fb = FrameBuffer::new();
        self.regs = Registers::new();
        self.mem = Memory::new();
        self.keypad.reset();
        self.delay_timer = Timer::default();
        self.sound_timer = Timer::default();
        self.awaiting_key = None;
        self.history.clear();
        log::debug!("emulator reset");
    }

    /// Resets, then copies the program to 0x200.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        self.reset();
        self.mem.load_rom(bytes)?;
        log::debug!("loaded {} byte program", bytes.len());
        Ok(())
    }

    pub fn load(&mut self, rom: &Rom) -> Result<()> {
        self.load_rom(rom.bytes())
    }

    pub fn fetch_decode(&self) -> Result<(u16, Instruction)> {
        let ins = self.mem.fetch()?;
        Ok((ins, Instruction::decode(ins)?))
    }

    /// One fetch/decode/execute cycle.
    pub fn step(&mut self) -> Result<()> {
        self.try_step().map_err(|e| {
            log::warn!("halted at {:#05X}: {}", self.mem.pc.0, e);
            e
        })
    }

    fn try_step(&mut self) -> Result<()> {
        if let Some(vx) = self.awaiting_key {
            return self.poll_key(vx);
        }

        let pc = self.mem.pc.0;
        let (raw, operation) = self.fetch_decode()?;
        log::trace!("{pc:#05X}  {raw:04X}  {operation}");

        // where execution continues is validated before anything is written
        let next_pc = match self.flow(pc, operation)? {
            Flow::Next => Some(pc.wrapping_add(2)),
            Flow::Skip => Some(pc.wrapping_add(4)),
            Flow::Jump(addr) => Some(addr),
            Flow::Hold => None,
        };
        if let Some(addr) = next_pc {
            ProgramCounter::check(addr)?;
        }

        self.execute_ins(pc, operation)?;
        if let Some(addr) = next_pc {
            self.mem.set_pc(addr)?;
        }

        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back((pc, raw));
        Ok(())
    }

    /// Runs until an error or until `max_steps` cycles have executed.
    pub fn run(&mut self, max_steps: usize) -> Result<usize> {
        for _ in 0..max_steps {
            self.step()?;
        }
        Ok(max_steps)
    }

    fn poll_key(&mut self, vx: u8) -> Result<()> {
        if let Some(key) = self.keypad.first_pressed() {
            self.mem.increment_pc()?;
            self.regs.set_register(vx, key);
            self.awaiting_key = None;
        }
        Ok(())
    }

    /// Control flow of `ins` at `pc`. Reads state only.
    fn flow(&self, pc: TypeAddr, ins: Instruction) -> Result<Flow> {
        let flow = match ins {
            Instruction::PopSubroutine => Flow::Jump(self.mem.stack.top()?),
            Instruction::Jump(addr) => Flow::Jump(addr),
            Instruction::PushSubroutine(addr) => {
                // the return address has to be a valid PC too
                ProgramCounter::check(pc.wrapping_add(2))?;
                if self.mem.stack.is_full() {
                    return Err(Chip8Error::StackOverflow(STACK_SIZE));
                }
                Flow::Jump(addr)
            }
            Instruction::SkipEqualConstant(vx, nn) => Flow::skip_if(self.regs.get(vx) == nn),
            Instruction::SkipNotEqualConstant(vx, nn) => Flow::skip_if(self.regs.get(vx) != nn),
            Instruction::SkipEqualRegister(vx, vy) => {
                Flow::skip_if(self.regs.get(vx) == self.regs.get(vy))
            }
            Instruction::SkipNotEqualRegister(vx, vy) => {
                Flow::skip_if(self.regs.get(vx) != self.regs.get(vy))
            }
            Instruction::JumpWithOffset(addr) => {
                Flow::Jump(addr.wrapping_add(self.regs.get(0) as TypeAddr))
            }
            Instruction::SkipIfPressed(vx) => {
                Flow::skip_if(self.keypad.is_pressed(self.regs.get(vx)))
            }
            Instruction::SkipIfNotPressed(vx) => {
                Flow::skip_if(!self.keypad.is_pressed(self.regs.get(vx)))
            }
            Instruction::GetKey(_) if self.keypad.first_pressed().is_none() => Flow::Hold,
            _ => Flow::Next,
        };
        Ok(flow)
    }

    fn execute_ins(&mut self, pc: TypeAddr, ins: Instruction) -> Result<()> {
        match ins {
            Instruction::Sys(_)
            | Instruction::Jump(_)
            | Instruction::JumpWithOffset(_)
            | Instruction::SkipEqualConstant(..)
            | Instruction::SkipNotEqualConstant(..)
            | Instruction::SkipEqualRegister(..)
            | Instruction::SkipNotEqualRegister(..)
            | Instruction::SkipIfPressed(_)
            | Instruction::SkipIfNotPressed(_) => {}
            Instruction::ClearScreen => self.fb.clear_buffer(),
            Instruction::PopSubroutine => {
                self.mem.stack.pop()?;
            }
            // store the instruction to return back to
            Instruction::PushSubroutine(_) => self.mem.stack.push(pc.wrapping_add(2))?,
            Instruction::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            Instruction::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            Instruction::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            Instruction::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            Instruction::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            Instruction::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            Instruction::Add(vx, vy) => {
                let (sum, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.regs.set_register(vx, sum);
                self.regs.set_flag(carry);
            }
            Instruction::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, x.wrapping_sub(y));
                self.regs.set_flag(x > y); // no borrow
            }
            Instruction::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, y.wrapping_sub(x));
                self.regs.set_flag(y > x); // no borrow
            }
            // shifts act on VX in place, VY is ignored
            Instruction::RightShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(vx, vx_value >> 1);
                self.regs.set_register(FLAG, vx_value & 1);
            }
            Instruction::LeftShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(vx, vx_value << 1);
                self.regs.set_register(FLAG, (vx_value >> 7) & 1);
            }
            Instruction::SetIndexRegister(addr) => {
                self.mem.set_index(addr);
            }
            Instruction::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            Instruction::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                let sprite = self.mem.read_wrapping(self.mem.index.0, height as usize);
                let collision = self.fb.paint(x, y, &sprite);
                self.regs.set_flag(collision);
            }
            Instruction::CopyDelayToRegister(vx) => {
                self.regs.set_register(vx, self.delay_timer.get());
            }
            Instruction::CopyRegisterToDelay(vx) => {
                self.delay_timer.set(self.regs.get(vx));
            }
            Instruction::CopyRegisterToSound(vx) => {
                self.sound_timer.set(self.regs.get(vx));
            }
            Instruction::GetKey(vx) => match self.keypad.first_pressed() {
                Some(key) => self.regs.set_register(vx, key),
                None => self.awaiting_key = Some(vx),
            },
            Instruction::AddToIndex(vx) => {
                let index = self.mem.index.0.wrapping_add(self.regs.get(vx) as TypeAddr);
                self.mem.set_index(index);
            }
            Instruction::PointChar(vx) => {
                self.mem.set_index(glyph_addr(self.regs.get(vx)));
            }
            Instruction::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let index = self.mem.index.0;
                for (i, digit) in [value / 100, (value / 10) % 10, value % 10]
                    .into_iter()
                    .enumerate()
                {
                    self.mem.set(index.wrapping_add(i as TypeAddr), digit);
                }
            }
            Instruction::StoreRegisterToMemory(vx) => {
                let index = self.mem.index.0;
                for reg in 0..=vx {
                    self.mem
                        .set(index.wrapping_add(reg as TypeAddr), self.regs.get(reg));
                }
            }
            Instruction::LoadRegisterFromMemory(vx) => {
                let index = self.mem.index.0;
                for reg in 0..=vx {
                    let reg_val = self.mem.get(index.wrapping_add(reg as TypeAddr));
                    self.regs.set_register(reg, reg_val);
                }
            }
        }
        Ok(())
    }

    /// The 60 Hz hook: decrements both timers towards zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    pub fn pc(&self) -> TypeAddr {
        self.mem.pc.0
    }

    pub fn index(&self) -> TypeAddr {
        self.mem.index.0
    }

    pub fn register(&self, reg_num: u8) -> u8 {
        self.regs.get(reg_num)
    }

    pub fn registers(&self) -> &[u8; 16] {
        self.regs.as_array()
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.get()
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.get()
    }

    pub fn is_sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    pub fn stack(&self) -> &[TypeAddr] {
        self.mem.stack.as_slice()
    }

    pub fn memory(&self) -> &[u8] {
        self.mem.as_slice()
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    /// Checks and clears the redraw flag
    pub fn take_redraw(&mut self) -> bool {
        self.fb.take_dirty()
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn is_awaiting_key(&self) -> bool {
        self.awaiting_key.is_some()
    }

    /// Instruction the next `step` would execute.
    pub fn current_instruction(&self) -> Result<Instruction> {
        self.fetch_decode().map(|(_, ins)| ins)
    }

    /// Most recent executed (pc, opcode) pairs, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &(TypeAddr, u16)> + '_ {
        self.history.iter()
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
