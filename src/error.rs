use thiserror::Error;

/// Everything that can go wrong inside the interpreter.
///
/// Only `UnknownOpcode` is recoverable: the program counter has already been
/// advanced past the malformed word, so the caller may keep stepping. Every
/// other variant latches the interpreter into a halted state and further
/// `step()` calls fail with `Halted`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip8Error {
    /// program image does not fit between 0x200 and the top of RAM
    #[error("program image of {len} bytes exceeds the {max} bytes of program RAM")]
    ProgramTooLarge { len: usize, max: usize },

    /// decode matched no known instruction family
    #[error("unknown opcode {opcode:#06x} at {pc:#05x}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    /// a 17th nested call
    #[error("call stack overflow at {pc:#05x}")]
    StackOverflow { pc: u16 },

    /// return with an empty call stack
    #[error("call stack underflow at {pc:#05x}")]
    StackUnderflow { pc: u16 },

    /// instruction fetch or index-relative access outside 0x000..=0xFFF
    #[error("memory access out of bounds: {addr:#06x}")]
    OutOfBounds { addr: u16 },

    /// a previous fatal error already stopped execution
    #[error("interpreter is halted after a fatal error")]
    Halted,
}

impl Chip8Error {
    /// Fatal errors stop the instruction stream; non-fatal ones must not.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Chip8Error::UnknownOpcode { .. })
    }
}
