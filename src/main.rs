use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use octet::interpreter::{Interpreter, RunState};

type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The path of the rom to load
    #[arg(short, long, value_name = "FILE")]
    rom_path: PathBuf,

    /// Instructions executed per 60Hz frame
    #[arg(long, default_value_t = 10)]
    cycles_per_frame: u32,

    /// Seed for the random number generator, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,

    /// Run without a window and print the screen when done
    #[arg(long)]
    headless: bool,

    /// Number of frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,
}

/// Runs one 60Hz frame: a batch of instructions followed by a timer tick.
fn run_frame(interpreter: &mut Interpreter, cycles: u32) -> Result<()> {
    for _ in 0..cycles {
        match interpreter.step() {
            Ok(_) => {}
            // Already logged by the interpreter, keep going.
            Err(err) if !err.is_fatal() => {}
            Err(err) => return Err(err.into()),
        }
    }

    interpreter.tick_timers();

    Ok(())
}

fn run_headless(interpreter: &mut Interpreter, cli: &Cli) -> Result<()> {
    for _ in 0..cli.frames {
        run_frame(interpreter, cli.cycles_per_frame)?;
    }

    if let RunState::AwaitingKey { .. } = interpreter.state() {
        info!("Program was waiting for a key, giving up");
        interpreter.cancel_key_wait();
    }

    println!("{}", interpreter.display().to_text());

    Ok(())
}

#[cfg(feature = "gui")]
mod window {
    use minifb::{Key, Scale, Window, WindowOptions};

    use octet::interpreter::Interpreter;
    use octet::keyboard::KEY_COUNT;

    use super::{run_frame, Result};

    /// The usual layout of the hexadecimal keypad on a QWERTY keyboard.
    const KEYMAP: [(Key, u8); KEY_COUNT] = [
        (Key::Key1, 0x1),
        (Key::Key2, 0x2),
        (Key::Key3, 0x3),
        (Key::Key4, 0xC),
        (Key::Q, 0x4),
        (Key::W, 0x5),
        (Key::E, 0x6),
        (Key::R, 0xD),
        (Key::A, 0x7),
        (Key::S, 0x8),
        (Key::D, 0x9),
        (Key::F, 0xE),
        (Key::Z, 0xA),
        (Key::X, 0x0),
        (Key::C, 0xB),
        (Key::V, 0xF),
    ];

    pub fn run(interpreter: &mut Interpreter, cycles_per_frame: u32) -> Result<()> {
        let width = interpreter.display().width();
        let height = interpreter.display().height();
        let mut buffer: Vec<u32> = vec![0; width * height];

        let mut opts = WindowOptions::default();
        opts.scale = Scale::X8;

        let mut window = Window::new("Chip-8 - ESC to exit", width, height, opts)?;

        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));

        while window.is_open() && !window.is_key_down(Key::Escape) {
            let mut keys = [false; KEY_COUNT];
            for (key, code) in KEYMAP.iter() {
                keys[usize::from(*code)] = window.is_key_down(*key);
            }
            interpreter.keyboard_mut().set_state(keys);

            run_frame(interpreter, cycles_per_frame)?;

            if interpreter.take_redraw() {
                for (i, p) in buffer.iter_mut().zip(interpreter.display().pixels()) {
                    *i = if *p { 0xFFFFFF } else { 0 };
                }

                window.update_with_buffer(&buffer, width, height)?;
            } else {
                window.update();
            }
        }

        interpreter.cancel_key_wait();

        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    SimpleLogger::new().with_level(cli.log_level).init()?;

    let bytes = std::fs::read(&cli.rom_path)
        .with_context(|| format!("Cannot read rom {}", cli.rom_path.display()))?;

    let mut interpreter = match cli.seed {
        Some(seed) => Interpreter::with_seed(seed),
        None => Interpreter::new(),
    };
    interpreter.load(&bytes)?;

    info!("Running {}", cli.rom_path.display());

    if cli.headless {
        return run_headless(&mut interpreter, &cli);
    }

    run_windowed(&mut interpreter, &cli)
}

#[cfg(feature = "gui")]
fn run_windowed(interpreter: &mut Interpreter, cli: &Cli) -> Result<()> {
    window::run(interpreter, cli.cycles_per_frame)
}

#[cfg(not(feature = "gui"))]
fn run_windowed(interpreter: &mut Interpreter, cli: &Cli) -> Result<()> {
    log::warn!("Built without the `gui` feature, running headless");
    run_headless(interpreter, cli)
}
