use std::fmt;

use crate::memory::TypeAddr;

/// Field view of one fetched opcode word.
///
/// ```text
/// |  hi  |  x   |  y   |  n   |
/// |      |        nnn         |
/// |      |      |     nn      |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u16,
    pub nnn: TypeAddr,
    pub nn: u8,
    pub n: u8,
    pub x: u8,
    pub y: u8,
}

/// Pure and total: every word decodes.
pub fn decode(opcode: u16) -> Instruction {
    Instruction {
        opcode,
        nnn: opcode & 0x0FFF,
        nn: (opcode & 0x00FF) as u8,
        n: (opcode & 0x000F) as u8,
        x: ((opcode >> 8) & 0x0F) as u8,
        y: ((opcode >> 4) & 0x0F) as u8,
    }
}

impl Instruction {
    pub fn family(&self) -> u8 {
        (self.opcode >> 12) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    SetRegister(u8, u8),
    // 7XNN
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    // 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8),

    // ANNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // XOR an N row sprite from I onto (VX, VY), VF = collision
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),

    Unimplemented(u16),
}

impl OpCodes {
    pub fn decode_raw(ins: u16) -> Self {
        Self::from_instruction(&decode(ins))
    }

    pub fn from_instruction(ins: &Instruction) -> Self {
        let Instruction {
            opcode,
            nnn,
            nn,
            n,
            x,
            y,
        } = *ins;

        match ins.family() {
            0x0 => match opcode {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => Self::Unimplemented(opcode),
            },
            0x1 => Self::Jump(nnn),
            0x2 => Self::PushSubroutine(nnn),
            0x3 => Self::SkipEqualConstant(x, nn),
            0x4 => Self::SkipNotEqualConstant(x, nn),
            0x5 if n == 0x0 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, nn),
            0x7 => Self::AddToRegister(x, nn),
            0x8 => match n {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x),
                _ => Self::Unimplemented(opcode),
            },
            0x9 if n == 0x0 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(nnn),
            0xB => Self::JumpWithOffset(nnn),
            0xC => Self::Random(x, nn),
            0xD => Self::Display(x, y, n),
            0xE => match nn {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unimplemented(opcode),
            },
            0xF => match nn {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => Self::Unimplemented(opcode),
            },
            _ => Self::Unimplemented(opcode),
        }
    }
}

// assembler-ish mnemonics for trace logging
impl fmt::Display for OpCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ClearScreen => write!(f, "CLS"),
            Self::PopSubroutine => write!(f, "RET"),
            Self::Jump(a) => write!(f, "JP {a:#05X}"),
            Self::PushSubroutine(a) => write!(f, "CALL {a:#05X}"),
            Self::SkipEqualConstant(x, nn) => write!(f, "SE V{x:X}, {nn:#04X}"),
            Self::SkipNotEqualConstant(x, nn) => write!(f, "SNE V{x:X}, {nn:#04X}"),
            Self::SkipEqualRegister(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            Self::SkipNotEqualRegister(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            Self::SetRegister(x, nn) => write!(f, "LD V{x:X}, {nn:#04X}"),
            Self::AddToRegister(x, nn) => write!(f, "ADD V{x:X}, {nn:#04X}"),
            Self::CopyRegister(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            Self::Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            Self::And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            Self::XOr(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            Self::Add(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            Self::SubtractForward(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            Self::RightShift(x) => write!(f, "SHR V{x:X}"),
            Self::SubtractBackward(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            Self::LeftShift(x) => write!(f, "SHL V{x:X}"),
            Self::SetIndexRegister(a) => write!(f, "LD I, {a:#05X}"),
            Self::JumpWithOffset(a) => write!(f, "JP V0, {a:#05X}"),
            Self::Random(x, nn) => write!(f, "RND V{x:X}, {nn:#04X}"),
            Self::Display(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Self::SkipIfPressed(x) => write!(f, "SKP V{x:X}"),
            Self::SkipIfNotPressed(x) => write!(f, "SKNP V{x:X}"),
            Self::CopyDelayToRegister(x) => write!(f, "LD V{x:X}, DT"),
            Self::GetKey(x) => write!(f, "LD V{x:X}, K"),
            Self::CopyRegisterToDelay(x) => write!(f, "LD DT, V{x:X}"),
            Self::CopyRegisterToSound(x) => write!(f, "LD ST, V{x:X}"),
            Self::AddToIndex(x) => write!(f, "ADD I, V{x:X}"),
            Self::PointChar(x) => write!(f, "LD F, V{x:X}"),
            Self::ToDecimal(x) => write!(f, "LD B, V{x:X}"),
            Self::StoreRegisterToMemory(x) => write!(f, "LD [I], V{x:X}"),
            Self::LoadRegisterFromMemory(x) => write!(f, "LD V{x:X}, [I]"),
            Self::Unimplemented(op) => write!(f, "??? {op:04X}"),
        }
    }
}
