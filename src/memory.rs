use crate::error::Chip8Error;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// how much RAM we have
pub const RAM_SIZE: usize = 4096;

/// where the program is loaded
pub const PROGRAM_ADDR: u16 = 0x0200;

/// where the font glyphs live, one glyph per hex digit
pub const FONT_ADDR: u16 = 0x0000;

/// height in bytes of one font glyph
pub const FONT_GLYPH_BYTES: u16 = 5;

/// The CHIP-8 address space: 4096 bytes, byte-addressable.
///
/// 0x000-0x04f holds the built-in font set, 0x200 upward holds the loaded
/// program image. Every access is range-checked; an address outside RAM is an
/// `OutOfBounds` error rather than a panic, so the interpreter can surface it
/// to the driver.
pub struct Memory {
    bytes: Box<[u8; RAM_SIZE]>,
}

impl Memory {
    pub fn new() -> Self {
        let mut m = Memory {
            bytes: Box::new([0u8; RAM_SIZE]),
        };
        m.reset();
        m
    }

    /// zero everything, then bake the font back in
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        let base = FONT_ADDR as usize;
        self.bytes[base..base + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
    }

    /// copy a program image in at 0x200
    ///
    /// An image that does not fit below the top of RAM is rejected outright;
    /// loading a truncated program and executing into garbage is worse than
    /// refusing to start.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), Chip8Error> {
        let max = RAM_SIZE - PROGRAM_ADDR as usize;
        if image.len() > max {
            return Err(Chip8Error::ProgramTooLarge {
                len: image.len(),
                max,
            });
        }
        let base = PROGRAM_ADDR as usize;
        self.bytes[base..base + image.len()].copy_from_slice(image);
        Ok(())
    }

    pub fn read_byte(&self, addr: u16) -> Result<u8, Chip8Error> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Chip8Error::OutOfBounds { addr })
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Chip8Error> {
        match self.bytes.get_mut(addr as usize) {
            Some(b) => {
                *b = value;
                Ok(())
            }
            None => Err(Chip8Error::OutOfBounds { addr }),
        }
    }

    /// get a two-byte big-endian word (instruction fetch)
    pub fn read_word(&self, addr: u16) -> Result<u16, Chip8Error> {
        let hi = self.read_byte(addr)?;
        let lo = self.read_byte(addr.wrapping_add(1))?;
        Ok(u16::from(hi) << 8 | u16::from(lo))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// 16 glyphs x 5 bytes, one glyph per hex digit 0-F
const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
