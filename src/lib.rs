//! A CHIP-8 virtual machine.
//!
//! ## Design
//!
//! * the interpreter core is a plain state machine with two entry points:
//!   `step()` (one instruction) and `tick_timers()` (one 60 Hz tick); it
//!   never paces itself and never blocks
//! * decode is an explicit step from the raw 16-bit word to a tagged
//!   `Instruction` variant, so decode and execution are testable apart
//! * instruction side effects are bit-exact with the contemporary
//!   interpreters, including the flag-before-result write order and the
//!   wait-key tie-break
//! * display, input and audio are traits so the core doesn't need to know
//!   how the outside world works; the bundled driver renders to a terminal
//! * errors are values: a bad program image, a blown call stack or an
//!   out-of-bounds access halts the machine with a distinguishable error
//!   instead of corrupting it, and unknown opcodes are reported but skipped

pub mod display;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod sound;

pub use error::Chip8Error;
pub use instruction::Instruction;
pub use interpreter::{Chip8Interpreter, DISPLAY_CELLS, DISPLAY_HEIGHT, DISPLAY_WIDTH};
