use chipvm::{decode, Emulator};
use proptest::prelude::*;

fn emu(program: &[u16]) -> Emulator {
    let rom: Vec<u8> = program.iter().flat_map(|op| op.to_be_bytes()).collect();
    let mut emu = Emulator::with_seed(1);
    emu.load_rom(&rom).unwrap();
    emu
}

proptest! {
    #[test]
    fn set_register_loads_constant(x in 0u16..16, nn in 0u16..256) {
        let mut emu = emu(&[0x6000 | x << 8 | nn]);
        emu.step().unwrap();
        prop_assert_eq!(emu.regs.get(x as u8), nn as u8);
    }

    #[test]
    fn add_constant_wraps(x in 0u16..16, init in any::<u8>(), a in any::<u8>(), b in any::<u8>()) {
        let mut emu = emu(&[
            0x6000 | x << 8 | init as u16,
            0x7000 | x << 8 | a as u16,
            0x7000 | x << 8 | b as u16,
        ]);
        for _ in 0..3 {
            emu.step().unwrap();
        }
        let expected = (init as u32 + a as u32 + b as u32) % 256;
        prop_assert_eq!(emu.regs.get(x as u8) as u32, expected);
    }

    #[test]
    fn decode_is_total(op in any::<u16>()) {
        let ins = decode(op);
        prop_assert_eq!(ins.opcode, op);
        prop_assert_eq!(ins.nnn, op & 0xFFF);
        prop_assert_eq!(
            (ins.x as u16) << 8 | (ins.y as u16) << 4 | ins.n as u16,
            ins.nnn
        );
        prop_assert_eq!(ins.nn as u16, op & 0xFF);
    }

    #[test]
    fn flag_arithmetic_matches_wide_math(vx in any::<u8>(), vy in any::<u8>()) {
        let mut add = emu(&[0x6100 | vx as u16, 0x6200 | vy as u16, 0x8124]);
        let mut sub = emu(&[0x6100 | vx as u16, 0x6200 | vy as u16, 0x8125]);
        for _ in 0..3 {
            add.step().unwrap();
            sub.step().unwrap();
        }
        let sum = vx as u16 + vy as u16;
        prop_assert_eq!(add.regs.get(1), (sum % 256) as u8);
        prop_assert_eq!(add.regs.flag(), (sum > 255) as u8);
        prop_assert_eq!(sub.regs.get(1), vx.wrapping_sub(vy));
        prop_assert_eq!(sub.regs.flag(), (vx >= vy) as u8);
    }
}
