//! A CHIP-8 interpreter.
//!
//! The [`Emulator`] owns all machine state and is driven from outside: the host calls
//! [`Emulator::step`] as often as it likes and [`Emulator::tick_timers`] at 60Hz, feeds
//! the [`Keypad`], and renders the [`FrameBuffer`]. Window, keyboard, and audio hosts
//! live behind the `frontend` feature.

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
#[cfg(feature = "frontend")]
pub mod sound;
pub mod timer;

pub use config::Settings;
pub use decode::{decode, Instruction, OpCodes};
pub use display::FrameBuffer;
pub use emulator::{Activity, Emulator, RunState, StepOutcome};
pub use error::Chip8Error;
pub use keyboard::Keypad;
pub use timer::{TickClock, Timers};
