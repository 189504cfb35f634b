// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits)
//
// Delay timer & Sound timer: Count down at 60 times / s until 0
// Beep when sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// Separately:
// CPU: --ips times per second (700 by default)
// Display: 60 times per second
// Timer: 60 times per second

use std::fs;

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};

use chipvm::display::Screen;
use chipvm::keyboard::{poll_keys, Control};
use chipvm::sound::Sound;
use chipvm::{Emulator, RunState, Settings, StepOutcome, TickClock};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_module("chipvm", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let settings = Settings::parse();
    let rom = fs::read(&settings.rom)
        .with_context(|| format!("could not read rom {}", settings.rom.display()))?;

    let mut emu = match settings.seed {
        Some(seed) => Emulator::with_seed(seed),
        None => Emulator::new(),
    };
    emu.load_rom(&rom)
        .with_context(|| format!("could not load rom {}", settings.rom.display()))?;
    info!("running {} ({} bytes)", settings.rom.display(), rom.len());

    let mut screen = Screen::new(&settings).context("could not open window")?;
    let sound = Sound::new(&settings).context("could not open audio output")?;
    let mut clock = TickClock::new();
    let per_tick = settings.instructions_per_tick();

    while emu.run_state() != RunState::Quit {
        for control in poll_keys(&screen.window, &mut emu.keypad) {
            match control {
                Control::Quit => emu.quit(),
                Control::TogglePause => {
                    emu.toggle_pause();
                    clock.restart();
                    if emu.run_state() == RunState::Paused {
                        println!("==== PAUSED ====");
                    }
                }
                Control::Reset => emu.reset(),
            }
        }

        for _ in 0..per_tick {
            match emu.step()? {
                StepOutcome::AwaitingKey | StepOutcome::Idle(_) => break,
                StepOutcome::Executed(_) | StepOutcome::Ignored(_) => {}
            }
        }

        for _ in 0..clock.sync() {
            sound.set_active(emu.tick_timers());
        }
        if !emu.is_running() {
            sound.set_active(false);
        }

        match emu.take_frame() {
            Some(fb) => screen.sync(fb).context("could not present frame")?,
            None => screen.idle(),
        }
        if !screen.is_open() {
            emu.quit();
        }
    }

    Ok(())
}
