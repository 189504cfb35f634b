use crate::memory::{TypeAddr, PROGRAM_START};

pub const FLAG: u8 = 0xF;

#[derive(Debug, Clone)]
pub struct Registers {
    registers: [u8; 16],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; 16],
            pc: ProgramCounter(PROGRAM_START),
            index: IndexRegister(0),
        }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    // 8-bit wraparound, VF untouched
    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let reg = &mut self.registers[(reg_num & 0xF) as usize];
        *reg = reg.wrapping_add(value);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.set_register(FLAG, set as u8);
    }

    pub fn flag(&self) -> u8 {
        self.get(FLAG)
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.wrapping_sub(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let regs = Registers::new();
        assert_eq!(regs.pc, ProgramCounter(0x200));
        assert_eq!(regs.index, IndexRegister(0));
        assert!((0..16).all(|r| regs.get(r) == 0));
    }

    #[test]
    fn test_add_wraps_without_flag() {
        let mut regs = Registers::new();
        regs.set_register(0x3, 0xFF);
        regs.add_to_register(0x3, 0x02);
        assert_eq!(regs.get(0x3), 0x01);
        assert_eq!(regs.flag(), 0);
    }

    #[test]
    fn test_flag_is_vf() {
        let mut regs = Registers::new();
        regs.set_flag(true);
        assert_eq!(regs.get(0xF), 1);
        regs.set_flag(false);
        assert_eq!(regs.get(0xF), 0);
    }

    #[test]
    fn test_pc_steps_by_two() {
        let mut pc = ProgramCounter(0x200);
        pc.increment();
        pc.increment();
        assert_eq!(pc.0, 0x204);
        pc.decrement();
        assert_eq!(pc.0, 0x202);
    }
}
