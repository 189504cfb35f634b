use log::{debug, error, trace, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    decode::OpCodes,
    display::FrameBuffer,
    error::Chip8Error,
    keyboard::Keypad,
    memory::{Memory, Stack, TypeAddr, STACK_DEPTH},
    registers::Registers,
    timer::Timers,
};

/// Externally driven run state. Only `Running` lets `step` and `tick_timers` do anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    /// Stopped by a stack fault; only `reset` leaves this state.
    Halted,
    Quit,
}

/// What the interpreter is doing inside `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Executing,
    /// FX0A with no key down. PC stays on the FX0A until a key arrives for V[register].
    AwaitingKey { register: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Executed(OpCodes),
    /// Unrecognized opcode, skipped.
    Ignored(u16),
    AwaitingKey,
    /// Not running; nothing happened.
    Idle(RunState),
}

pub struct Emulator {
    pub regs: Registers,
    pub mem: Memory,
    pub stack: Stack,
    pub fb: FrameBuffer,
    pub keypad: Keypad,
    pub timers: Timers,
    run_state: RunState,
    activity: Activity,
    draw_flag: bool,
    rng: StdRng,
}

impl Emulator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Fixed CXNN sequence, for tests and reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            stack: Stack::new(),
            fb: FrameBuffer::new(),
            keypad: Keypad::new(),
            timers: Timers::new(),
            run_state: RunState::Running,
            activity: Activity::Executing,
            draw_flag: false,
            rng,
        }
    }

    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), Chip8Error> {
        self.mem.load_rom(bytes)
    }

    /// Back to power-on state with the current rom reloaded. The rng keeps its stream.
    pub fn reset(&mut self) {
        self.regs = Registers::new();
        self.mem.reset();
        self.stack = Stack::new();
        self.fb.clear_buffer();
        self.keypad.reset();
        self.timers = Timers::new();
        self.run_state = RunState::Running;
        self.activity = Activity::Executing;
        self.draw_flag = true;
        debug!("reset");
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn pause(&mut self) {
        if self.run_state == RunState::Running {
            self.set_run_state(RunState::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.run_state == RunState::Paused {
            self.set_run_state(RunState::Running);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.run_state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn quit(&mut self) {
        self.set_run_state(RunState::Quit);
    }

    fn set_run_state(&mut self, state: RunState) {
        debug!("run state {:?} -> {:?}", self.run_state, state);
        self.run_state = state;
    }

    /// The frame buffer, if it changed since the last call.
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.draw_flag {
            self.draw_flag = false;
            Some(&self.fb)
        } else {
            None
        }
    }

    /// One 60Hz tick. Returns whether the tone should be playing.
    pub fn tick_timers(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.timers.tick()
    }

    pub fn fetch(&self) -> u16 {
        self.mem.word(self.regs.pc.0)
    }

    /// Advances one instruction. A stack fault rolls the PC back onto the faulting
    /// instruction, halts the machine, and is returned.
    pub fn step(&mut self) -> Result<StepOutcome, Chip8Error> {
        if !self.is_running() {
            return Ok(StepOutcome::Idle(self.run_state));
        }
        if let Activity::AwaitingKey { register } = self.activity {
            return Ok(self.poll_key(register));
        }

        let pc = self.regs.pc.0;
        let raw = self.fetch();
        self.regs.pc.increment();
        let op = OpCodes::decode_raw(raw);
        trace!("{pc:#05X}: {raw:04X} {op}");

        self.execute_ins(op, pc).map_err(|err| {
            error!("{err}");
            self.regs.pc.set_addr(pc);
            self.set_run_state(RunState::Halted);
            err
        })
    }

    fn poll_key(&mut self, register: u8) -> StepOutcome {
        match self.keypad.first_pressed() {
            Some(key) => {
                self.regs.set_register(register, key);
                self.regs.pc.increment();
                self.activity = Activity::Executing;
                debug!("key {key:X} -> V{register:X}");
                StepOutcome::Executed(OpCodes::GetKey(register))
            }
            None => StepOutcome::AwaitingKey,
        }
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.regs.pc.increment();
        }
    }

    pub fn execute_ins(&mut self, ins: OpCodes, pc: TypeAddr) -> Result<StepOutcome, Chip8Error> {
        match ins {
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
                self.draw_flag = true;
            }
            OpCodes::PopSubroutine => {
                let addr = self.stack.pop().ok_or(Chip8Error::StackUnderflow { pc })?;
                self.regs.pc.set_addr(addr);
            }
            OpCodes::Jump(addr) => {
                self.regs.pc.set_addr(addr);
            }
            OpCodes::PushSubroutine(addr) => {
                // return to the instruction after the call
                self.stack
                    .push(self.regs.pc.0)
                    .map_err(|_| Chip8Error::StackOverflow {
                        pc,
                        depth: STACK_DEPTH,
                    })?;
                self.regs.pc.set_addr(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                self.skip_if(self.regs.get(vx) == nn);
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                self.skip_if(self.regs.get(vx) != nn);
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) == self.regs.get(vy));
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) != self.regs.get(vy));
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            // flag first, result second: with X = F the result wins
            OpCodes::Add(vx, vy) => {
                let (sum, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.regs.set_flag(carry);
                self.regs.set_register(vx, sum);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag(x >= y); // no borrow
                self.regs.set_register(vx, x.wrapping_sub(y));
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag(y >= x);
                self.regs.set_register(vx, y.wrapping_sub(x));
            }
            OpCodes::RightShift(vx) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(0xF, vx_value & 1);
                self.regs.set_register(vx, vx_value >> 1);
            }
            OpCodes::LeftShift(vx) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(0xF, (vx_value & 0x80) >> 7);
                self.regs.set_register(vx, vx_value << 1);
            }
            OpCodes::SetIndexRegister(addr) => {
                self.regs.index.set_addr(addr);
            }
            OpCodes::JumpWithOffset(addr) => {
                self.regs.pc.set_addr(addr + self.regs.get(0) as TypeAddr);
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, ransuu & nn);
            }
            OpCodes::Display(vx, vy, height) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                let index = self.regs.index.0;
                let sprite: Vec<u8> = (0..height as TypeAddr)
                    .map(|row| self.mem.get(index.wrapping_add(row)))
                    .collect();
                let vf = self.fb.paint(x, y, &sprite);
                self.regs.set_flag(vf);
                self.draw_flag = true;
            }
            OpCodes::SkipIfPressed(vx) => {
                self.skip_if(self.keypad.is_pressed(self.regs.get(vx)));
            }
            OpCodes::SkipIfNotPressed(vx) => {
                self.skip_if(!self.keypad.is_pressed(self.regs.get(vx)));
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.timers.delay),
            OpCodes::CopyRegisterToDelay(vx) => self.timers.delay = self.regs.get(vx),
            OpCodes::CopyRegisterToSound(vx) => self.timers.sound = self.regs.get(vx),
            OpCodes::GetKey(vx) => match self.keypad.first_pressed() {
                Some(key) => self.regs.set_register(vx, key),
                None => {
                    self.regs.pc.decrement();
                    self.activity = Activity::AwaitingKey { register: vx };
                    debug!("waiting for key at {pc:#05X}");
                    return Ok(StepOutcome::AwaitingKey);
                }
            },
            OpCodes::AddToIndex(vx) => {
                let index = self.regs.index.0.wrapping_add(self.regs.get(vx) as TypeAddr);
                self.regs.index.set_addr(index);
            }
            OpCodes::PointChar(vx) => {
                self.regs.index.set_addr(Memory::glyph_addr(self.regs.get(vx)));
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let index = self.regs.index.0;
                for (i, digit) in [value / 100, (value / 10) % 10, value % 10].into_iter().enumerate() {
                    self.mem.set(index.wrapping_add(i as TypeAddr), digit);
                }
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let index = self.regs.index.0;
                for reg in 0..=vx {
                    self.mem.set(index.wrapping_add(reg as TypeAddr), self.regs.get(reg));
                }
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let index = self.regs.index.0;
                for reg in 0..=vx {
                    let reg_val = self.mem.get(index.wrapping_add(reg as TypeAddr));
                    self.regs.set_register(reg, reg_val);
                }
            }
            OpCodes::Unimplemented(raw) => {
                warn!("ignoring unrecognized opcode {raw:04X} at {pc:#05X}");
                return Ok(StepOutcome::Ignored(raw));
            }
        }
        Ok(StepOutcome::Executed(ins))
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
