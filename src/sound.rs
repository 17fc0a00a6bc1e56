use beep::beep;
use std::error::Error;

/// Renders the sound timer's "audible" signal. `update` is called once per
/// timer tick with whether the beep should currently be heard; only the
/// transitions touch the audio device.
pub trait Sound {
    fn update(&mut self, audible: bool) -> Result<(), Box<dyn Error>>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Sound for SimpleBeep {
    fn update(&mut self, audible: bool) -> Result<(), Box<dyn Error>> {
        if audible && !self.is_beeping {
            beep(SIMPLEBEEP_PITCH)?;
        } else if !audible && self.is_beeping {
            beep(0)?;
        }
        self.is_beeping = audible;
        Ok(())
    }
}

impl Drop for SimpleBeep {
    fn drop(&mut self) {
        // leave the speaker quiet whatever happens
        let _ = beep(0);
    }
}

pub struct Mute {
    pub is_beeping: bool,
}

impl Mute {
    pub fn new() -> Self {
        Mute { is_beeping: false }
    }
}

impl Sound for Mute {
    fn update(&mut self, audible: bool) -> Result<(), Box<dyn Error>> {
        self.is_beeping = audible;
        Ok(())
    }
}
