use std::time::Duration;

use chipvm::memory::MAX_ROM_SIZE;
use chipvm::{Chip8Error, Emulator, OpCodes, RunState, StepOutcome, TickClock};

fn assemble(program: &[u16]) -> Vec<u8> {
    program.iter().flat_map(|op| op.to_be_bytes()).collect()
}

fn boot(program: &[u16]) -> Emulator {
    let mut emu = Emulator::with_seed(42);
    emu.load_rom(&assemble(program)).unwrap();
    emu
}

#[test]
fn oversized_rom_is_rejected_before_running() {
    let mut emu = Emulator::with_seed(0);
    let err = emu.load_rom(&vec![0; MAX_ROM_SIZE + 2]).unwrap_err();
    assert_eq!(
        err,
        Chip8Error::RomTooLarge {
            size: MAX_ROM_SIZE + 2,
            max: 4096 - 0x200
        }
    );
    assert!(!err.is_fatal());
}

#[test]
fn subroutine_round_trip() {
    // 0x200 CALL 0x208
    // 0x202 LD V1, 0x01
    // 0x204 JP 0x204
    // 0x206 (pad)
    // 0x208 LD V2, 0x02
    // 0x20A RET
    let mut emu = boot(&[0x2208, 0x6101, 0x1204, 0x0000, 0x6202, 0x00EE]);
    for _ in 0..4 {
        emu.step().unwrap();
    }
    assert_eq!(emu.regs.pc.0, 0x204);
    assert_eq!(emu.regs.get(1), 1);
    assert_eq!(emu.regs.get(2), 2);
    assert!(emu.stack.is_empty());
}

#[test]
fn counting_loop() {
    // count V0 up to 10 with a 3XNN exit test
    // 0x200 ADD V0, 1
    // 0x202 SE V0, 10
    // 0x204 JP 0x200
    // 0x206 JP 0x206
    let mut emu = boot(&[0x7001, 0x300A, 0x1200, 0x1206]);
    for _ in 0..40 {
        emu.step().unwrap();
    }
    assert_eq!(emu.regs.get(0), 10);
    assert_eq!(emu.regs.pc.0, 0x206);
}

#[test]
fn clear_draw_clear_leaves_blank_screen() {
    let mut emu = boot(&[0x00E0, 0x6A0A, 0xFA29, 0xD00F, 0x00E0]);
    for _ in 0..4 {
        emu.step().unwrap();
    }
    assert!(!emu.fb.is_blank());
    emu.step().unwrap();
    assert!(emu.fb.is_blank());
}

#[test]
fn sprite_clips_at_bottom_right() {
    // 8x2 solid sprite at (60, 31)
    // 0x200 LD I, 0x20C
    // 0x202 LD V0, 60
    // 0x204 LD V1, 31
    // 0x206 DRW V0, V1, 2
    // 0x208 JP 0x208
    // 0x20A (pad)
    // 0x20C sprite rows
    let mut emu = boot(&[0xA20C, 0x603C, 0x611F, 0xD012, 0x1208, 0x0000, 0xFFFF]);
    for _ in 0..4 {
        emu.step().unwrap();
    }
    let lit: Vec<(usize, usize)> = (0..32)
        .flat_map(|y| (0..64).map(move |x| (x, y)))
        .filter(|&(x, y)| emu.fb.pixel(x, y))
        .collect();
    assert_eq!(lit, vec![(60, 31), (61, 31), (62, 31), (63, 31)]);
    assert_eq!(emu.regs.flag(), 0);
}

#[test]
fn key_wait_then_resume() {
    // 0x200 LD V5, K
    // 0x202 LD V6, 0x66
    let mut emu = boot(&[0xF50A, 0x6666]);
    assert_eq!(emu.step(), Ok(StepOutcome::AwaitingKey));
    let pre_wait = emu.regs.pc.0;
    for _ in 0..10 {
        assert_eq!(emu.step(), Ok(StepOutcome::AwaitingKey));
        assert_eq!(emu.regs.pc.0, pre_wait);
    }
    emu.keypad.press(0xC);
    assert_eq!(emu.step(), Ok(StepOutcome::Executed(OpCodes::GetKey(5))));
    assert_eq!(emu.regs.get(5), 0xC);
    assert_eq!(emu.regs.pc.0, pre_wait + 2);
    emu.step().unwrap();
    assert_eq!(emu.regs.get(6), 0x66);
}

#[test]
fn timers_follow_wall_clock_not_steps() {
    // 0x200 LD V0, 30
    // 0x202 LD DT, V0
    // 0x204 LD ST, V0
    // 0x206 JP 0x206
    let mut emu = boot(&[0x601E, 0xF015, 0xF018, 0x1206]);
    for _ in 0..500 {
        emu.step().unwrap();
    }
    assert_eq!(emu.timers.delay, 30);

    let mut clock = TickClock::with_rate(60);
    let mut tone = false;
    for _ in 0..clock.advance(Duration::from_millis(250)) {
        tone = emu.tick_timers();
    }
    assert_eq!(emu.timers.delay, 15);
    assert!(tone);

    for _ in 0..clock.advance(Duration::from_secs(1)) {
        tone = emu.tick_timers();
    }
    assert_eq!(emu.timers.delay, 0);
    assert_eq!(emu.timers.sound, 0);
    assert!(!tone);
}

#[test]
fn fault_halts_until_reset() {
    let mut emu = boot(&[0x00EE]);
    let err = emu.step().unwrap_err();
    assert_eq!(err, Chip8Error::StackUnderflow { pc: 0x200 });
    assert!(err.is_fatal());
    assert_eq!(emu.run_state(), RunState::Halted);
    emu.resume();
    assert_eq!(emu.step(), Ok(StepOutcome::Idle(RunState::Halted)));
    assert!(!emu.tick_timers());
    emu.reset();
    assert_eq!(emu.run_state(), RunState::Running);
    assert_eq!(emu.fetch(), 0x00EE);
}
