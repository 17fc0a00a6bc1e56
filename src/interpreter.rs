//! The CHIP-8 state machine: fetch, decode, execute.
//!
//! The interpreter owns all architectural state (RAM, V registers, index
//! register, program counter, call stack, timers, framebuffer, key state) and
//! exposes two primitives for a driver loop to call:
//!
//! * `step()` runs exactly one instruction
//! * `tick_timers()` decrements the two countdown timers, to be called at a
//!   fixed 60 Hz cadence
//!
//! The interpreter never paces itself and never blocks. The one "wait" in the
//! instruction set (FX0A, wait for a key press) is modelled as an explicit
//! awaiting-key state: while it is set, `step()` polls the key array and
//! makes no other progress, so the driver's normal call pattern doubles as
//! the busy-wait.
//!
//! Flag-register writes happen *before* the arithmetic result is stored, as
//! on the original interpreter. Programs that name VF as an operand of
//! add/sub/shift therefore see the flag value, not the stale register; some
//! existing software depends on that aliasing.

use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::memory::{self, Memory};
use log::warn;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
pub const DISPLAY_CELLS: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

const STACK_DEPTH: usize = 16;
const NUM_KEYS: usize = 16;

/// VF doubles as the carry/borrow/collision flag
const FLAG: usize = 0xf;

pub struct Chip8Interpreter {
    memory: Memory,
    v: [u8; 16],
    i: u16,
    pc: u16,
    stack: [u16; STACK_DEPTH],
    sp: usize,
    delay_timer: u8,
    sound_timer: u8,
    keys: [bool; NUM_KEYS],
    framebuffer: [u8; DISPLAY_CELLS],
    redraw: bool,
    /// destination register of an in-flight FX0A, if any
    awaiting_key: Option<u8>,
    halted: bool,
}

impl Chip8Interpreter {
    pub fn new() -> Self {
        Chip8Interpreter {
            memory: Memory::new(),
            v: [0; 16],
            i: 0,
            pc: memory::PROGRAM_ADDR,
            stack: [0; STACK_DEPTH],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            keys: [false; NUM_KEYS],
            framebuffer: [0; DISPLAY_CELLS],
            redraw: false,
            awaiting_key: None,
            halted: false,
        }
    }

    /// back to power-on state; the font survives, nothing else does
    pub fn reset(&mut self) {
        self.memory.reset();
        self.v = [0; 16];
        self.i = 0;
        self.pc = memory::PROGRAM_ADDR;
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.keys = [false; NUM_KEYS];
        self.framebuffer = [0; DISPLAY_CELLS];
        self.redraw = false;
        self.awaiting_key = None;
        self.halted = false;
    }

    /// load a chip8 program image at 0x200
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), Chip8Error> {
        self.memory.load_program(image)
    }

    /// Execute exactly one instruction.
    ///
    /// Returns `UnknownOpcode` (non-fatal, the PC has been advanced past the
    /// bad word) when decode fails. Any other error halts the interpreter;
    /// subsequent calls fail with `Halted`.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        if self.halted {
            return Err(Chip8Error::Halted);
        }
        if let Some(x) = self.awaiting_key {
            if let Some(key) = self.last_pressed_key() {
                self.v[usize::from(x)] = key;
                self.awaiting_key = None;
                self.pc = self.pc.wrapping_add(2);
            }
            return Ok(());
        }
        let result = self.fetch_execute();
        if let Err(e) = &result {
            if e.is_fatal() {
                self.halted = true;
            }
        }
        result
    }

    /// Advance the delay and sound timers by one tick, clamping at zero.
    ///
    /// Returns true while the sound timer is audible for this tick, i.e. it
    /// was nonzero before the decrement. The driver turns that into a beep.
    pub fn tick_timers(&mut self) -> bool {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        let audible = self.sound_timer > 0;
        if audible {
            self.sound_timer -= 1;
        }
        audible
    }

    pub fn framebuffer(&self) -> &[u8; DISPLAY_CELLS] {
        &self.framebuffer
    }

    /// has the framebuffer changed since the driver last cleared this?
    pub fn redraw(&self) -> bool {
        self.redraw
    }

    pub fn clear_redraw(&mut self) {
        self.redraw = false;
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.keys[usize::from(key) % NUM_KEYS] = pressed;
    }

    pub fn set_keys(&mut self, keys: [bool; NUM_KEYS]) {
        self.keys = keys;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn fetch_execute(&mut self) -> Result<(), Chip8Error> {
        let pc = self.pc;
        let opcode = self.memory.read_word(pc)?;
        let instruction = match Instruction::decode(opcode) {
            Some(i) => i,
            None => {
                // move past the malformed word so we don't spin on it
                self.pc = pc.wrapping_add(2);
                warn!("unknown opcode {:#06x} at {:#05x}", opcode, pc);
                return Err(Chip8Error::UnknownOpcode { opcode, pc });
            }
        };
        // default advance; control transfers below overwrite this
        self.pc = pc.wrapping_add(2);
        self.execute(instruction, pc)
    }

    fn execute(&mut self, instruction: Instruction, pc: u16) -> Result<(), Chip8Error> {
        use Instruction::*;
        match instruction {
            ClearScreen => {
                self.framebuffer = [0; DISPLAY_CELLS];
                self.redraw = true;
            }
            Return => {
                if self.sp == 0 {
                    return Err(Chip8Error::StackUnderflow { pc });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp].wrapping_add(2);
            }
            Jump(nnn) => self.pc = nnn,
            Call(nnn) => {
                if self.sp == STACK_DEPTH {
                    return Err(Chip8Error::StackOverflow { pc });
                }
                self.stack[self.sp] = pc;
                self.sp += 1;
                self.pc = nnn;
            }
            SkipEqImm { x, nn } => {
                if self.v[usize::from(x)] == nn {
                    self.skip();
                }
            }
            SkipNeqImm { x, nn } => {
                if self.v[usize::from(x)] != nn {
                    self.skip();
                }
            }
            SkipEqReg { x, y } => {
                if self.v[usize::from(x)] == self.v[usize::from(y)] {
                    self.skip();
                }
            }
            SetImm { x, nn } => self.v[usize::from(x)] = nn,
            AddImm { x, nn } => {
                let x = usize::from(x);
                // wrapping add, VF untouched
                self.v[x] = self.v[x].wrapping_add(nn);
            }
            SetReg { x, y } => self.v[usize::from(x)] = self.v[usize::from(y)],
            Or { x, y } => self.v[usize::from(x)] |= self.v[usize::from(y)],
            And { x, y } => self.v[usize::from(x)] &= self.v[usize::from(y)],
            Xor { x, y } => self.v[usize::from(x)] ^= self.v[usize::from(y)],
            AddReg { x, y } => {
                let (x, y) = (usize::from(x), usize::from(y));
                // flag first, then the sum over the possibly-updated file
                self.v[FLAG] = u8::from(self.v[y] > 0xff - self.v[x]);
                self.v[x] = self.v[x].wrapping_add(self.v[y]);
            }
            SubReg { x, y } => {
                let (x, y) = (usize::from(x), usize::from(y));
                self.v[FLAG] = u8::from(self.v[y] <= self.v[x]);
                self.v[x] = self.v[x].wrapping_sub(self.v[y]);
            }
            ShiftRight { x } => {
                let x = usize::from(x);
                self.v[FLAG] = self.v[x] & 0x01;
                self.v[x] >>= 1;
            }
            SubRegReversed { x, y } => {
                let (x, y) = (usize::from(x), usize::from(y));
                self.v[FLAG] = u8::from(self.v[x] <= self.v[y]);
                self.v[x] = self.v[y].wrapping_sub(self.v[x]);
            }
            ShiftLeft { x } => {
                let x = usize::from(x);
                self.v[FLAG] = self.v[x] >> 7;
                self.v[x] <<= 1;
            }
            SkipNeqReg { x, y } => {
                if self.v[usize::from(x)] != self.v[usize::from(y)] {
                    self.skip();
                }
            }
            SetIndex(nnn) => self.i = nnn,
            JumpOffset(nnn) => self.pc = nnn.wrapping_add(u16::from(self.v[0])),
            RandMask { x, nn } => self.v[usize::from(x)] = rand::random::<u8>() & nn,
            DrawSprite { x, y, n } => self.draw_sprite(x, y, n)?,
            SkipKeyPressed { x } => {
                if self.keys[usize::from(self.v[usize::from(x)] & 0x0f)] {
                    self.skip();
                }
            }
            SkipKeyNotPressed { x } => {
                if !self.keys[usize::from(self.v[usize::from(x)] & 0x0f)] {
                    self.skip();
                }
            }
            GetDelay { x } => self.v[usize::from(x)] = self.delay_timer,
            WaitKey { x } => match self.last_pressed_key() {
                Some(key) => self.v[usize::from(x)] = key,
                None => {
                    // stay on this instruction until a key arrives
                    self.pc = pc;
                    self.awaiting_key = Some(x);
                }
            },
            SetDelay { x } => self.delay_timer = self.v[usize::from(x)],
            SetSound { x } => self.sound_timer = self.v[usize::from(x)],
            AddToIndex { x } => {
                let sum = u32::from(self.i) + u32::from(self.v[usize::from(x)]);
                self.v[FLAG] = u8::from(sum > 0xfff);
                // the upper bits are architecturally unused but not masked
                self.i = sum as u16;
            }
            FontCharAddress { x } => {
                self.i = memory::FONT_ADDR
                    + u16::from(self.v[usize::from(x)]) * memory::FONT_GLYPH_BYTES;
            }
            StoreBcd { x } => {
                let vx = self.v[usize::from(x)];
                self.memory.write_byte(self.i, vx / 100)?;
                self.memory.write_byte(self.i.wrapping_add(1), (vx / 10) % 10)?;
                self.memory.write_byte(self.i.wrapping_add(2), vx % 10)?;
            }
            RegDump { x } => {
                for r in 0..=u16::from(x) {
                    self.memory
                        .write_byte(self.i.wrapping_add(r), self.v[usize::from(r)])?;
                }
                self.i = self.i.wrapping_add(u16::from(x) + 1);
            }
            RegLoad { x } => {
                for r in 0..=u16::from(x) {
                    self.v[usize::from(r)] = self.memory.read_byte(self.i.wrapping_add(r))?;
                }
                self.i = self.i.wrapping_add(u16::from(x) + 1);
            }
        }
        Ok(())
    }

    /// skip the next instruction (the PC already points at it)
    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /// XOR-composite an 8-wide, `n`-row sprite from memory[I] at (VX, VY).
    ///
    /// Coordinates wrap modulo the display size, so a sprite drawn at the
    /// right or bottom edge continues on the opposite side. VF reports
    /// whether any set pixel was toggled off.
    fn draw_sprite(&mut self, x: u8, y: u8, n: u8) -> Result<(), Chip8Error> {
        let origin_x = usize::from(self.v[usize::from(x)]) % DISPLAY_WIDTH;
        let origin_y = usize::from(self.v[usize::from(y)]) % DISPLAY_HEIGHT;
        self.v[FLAG] = 0;
        for row in 0..usize::from(n) {
            let bits = self.memory.read_byte(self.i.wrapping_add(row as u16))?;
            for col in 0..8 {
                if bits & (0x80 >> col) != 0 {
                    let px = (origin_x + col) % DISPLAY_WIDTH;
                    let py = (origin_y + row) % DISPLAY_HEIGHT;
                    let cell = py * DISPLAY_WIDTH + px;
                    if self.framebuffer[cell] == 1 {
                        self.v[FLAG] = 1;
                    }
                    self.framebuffer[cell] ^= 1;
                }
            }
        }
        self.redraw = true;
        Ok(())
    }

    /// ascending scan where the last pressed key found wins, matching the
    /// original interpreter's tie-break for simultaneous presses
    fn last_pressed_key(&self) -> Option<u8> {
        let mut found = None;
        for (key, &pressed) in self.keys.iter().enumerate() {
            if pressed {
                found = Some(key as u8);
            }
        }
        found
    }
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
