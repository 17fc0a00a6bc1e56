use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info};

use chip8vm::display::{Display, MonoTermDisplay};
use chip8vm::input::{Input, StdinInput};
use chip8vm::sound::{Mute, SimpleBeep, Sound};
use chip8vm::Chip8Interpreter;

/// timers tick, keys are polled and frames are drawn at this rate
const FRAMES_PER_SECOND: u32 = 60;

#[derive(Parser)]
#[command(about = "CHIP-8 emulator in the terminal")]
struct Args {
    /// path to the program image to run
    rom: PathBuf,

    /// instructions executed per second
    #[arg(long, default_value_t = 700)]
    ips: u32,

    /// disable the beep
    #[arg(long)]
    mute: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let image = fs::read(&args.rom)?;
    info!("loaded {} ({} bytes)", args.rom.display(), image.len());

    let mut interpreter = Chip8Interpreter::new();
    interpreter.load_program(&image)?;

    let mut display = MonoTermDisplay::new()?;
    let mut input = StdinInput::new();
    let mut sound: Box<dyn Sound> = if args.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let steps_per_frame = (args.ips / FRAMES_PER_SECOND).max(1);
    let frame = Duration::from_secs_f64(1.0 / f64::from(FRAMES_PER_SECOND));
    let sleeper = spin_sleep::SpinSleeper::default();

    'frames: loop {
        let frame_start = Instant::now();

        interpreter.set_keys(input.poll()?);
        if input.quit_requested() {
            break;
        }

        for _ in 0..steps_per_frame {
            if let Err(e) = interpreter.step() {
                if e.is_fatal() {
                    error!("{}", e);
                    break 'frames;
                }
                // unknown opcodes are already logged by the core; carry on
            }
        }

        let audible = interpreter.tick_timers();
        sound.update(audible)?;

        if interpreter.redraw() {
            display.draw(interpreter.framebuffer())?;
            interpreter.clear_redraw();
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            sleeper.sleep(frame - elapsed);
        }
    }

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..12 {
        println!();
    }
    Ok(())
}
