use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use log::warn;

/// map of keyboard characters to the chip8 keypad, using the left-hand side
/// of a qwerty keyboard
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// how long a keypress counts as "held"; terminals only report presses, so
/// each one is stretched to cover the auto-repeat gap
const KEY_HOLD: Duration = Duration::from_millis(150);

/// Produces the 16-key pad state the interpreter reads.
pub trait Input {
    /// current state of all 16 keys, true = pressed
    fn poll(&mut self) -> Result<[bool; 16], io::Error>;

    /// has the user asked to leave the emulator?
    fn quit_requested(&self) -> bool {
        false
    }
}

/// simple implementation of Input, using terminal key events
pub struct StdinInput {
    keymap: HashMap<char, u8>,
    last_seen: [Option<Instant>; 16],
    quit: bool,
}

impl StdinInput {
    pub fn new() -> Self {
        terminal::enable_raw_mode().unwrap();
        StdinInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            last_seen: [None; 16],
            quit: false,
        }
    }

    fn drain_events(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Char(key) => match self.keymap.get(&key) {
                        Some(mapped_key) => {
                            self.last_seen[usize::from(*mapped_key)] = Some(Instant::now());
                        }
                        None => {
                            warn!("can't map {:?} to a chip8 key", key);
                        }
                    },
                    KeyCode::Esc => self.quit = true,
                    _ => {
                        warn!("unknown key event received");
                    }
                },
                _ => {
                    warn!("unknown event received");
                }
            }
        }
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        terminal::disable_raw_mode().unwrap();
    }
}

impl Input for StdinInput {
    fn poll(&mut self) -> Result<[bool; 16], io::Error> {
        self.drain_events()?;
        let now = Instant::now();
        let mut keys = [false; 16];
        for (key, seen) in self.last_seen.iter().enumerate() {
            if let Some(at) = seen {
                keys[key] = now.duration_since(*at) < KEY_HOLD;
            }
        }
        Ok(keys)
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing
pub struct DummyInput {
    keys: [bool; 16],
}

impl DummyInput {
    pub fn new() -> Self {
        DummyInput { keys: [false; 16] }
    }

    pub fn press(&mut self, key: u8) {
        self.keys[usize::from(key)] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[usize::from(key)] = false;
    }
}

impl Input for DummyInput {
    fn poll(&mut self) -> Result<[bool; 16], io::Error> {
        Ok(self.keys)
    }
}
