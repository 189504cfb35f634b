use log::debug;

use crate::error::Chip8Error;

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; 5 * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const FONT_START: TypeAddr = 0x000;
pub const FONT_GLYPH_BYTES: u16 = 5;
pub const STACK_DEPTH: usize = 12;

const ADDR_MASK: TypeAddr = 0x0FFF;

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// 4k of RAM. Glyphs for 0-F sit at 0x000..0x050, programs from 0x200 up.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
    rom: Vec<u8>,
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = FONT_START as usize;
        bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
        Self { bytes, rom: vec![] }
    }

    // addresses wrap inside the 4k space
    pub fn set(&mut self, addr: TypeAddr, val: u8) {
        self.bytes[(addr & ADDR_MASK) as usize] = val;
    }

    pub fn get(&self, addr: TypeAddr) -> u8 {
        self.bytes[(addr & ADDR_MASK) as usize]
    }

    /// Big-endian opcode word at `addr`.
    pub fn word(&self, addr: TypeAddr) -> u16 {
        let (l, r) = (self.get(addr), self.get(addr.wrapping_add(1)));
        ((l as u16) << 8) | r as u16
    }

    pub fn glyph_addr(digit: u8) -> TypeAddr {
        FONT_START + digit as TypeAddr * FONT_GLYPH_BYTES
    }

    /// Copies a program in at 0x200. Oversized roms are rejected and leave memory untouched.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), Chip8Error> {
        if bytes.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: bytes.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.rom = bytes.to_vec();
        self.reset();
        debug!("loaded {} byte rom at {:#05X}", bytes.len(), PROGRAM_START);
        Ok(())
    }

    /// Power-on contents: font, the loaded rom as it was loaded, zeroes elsewhere.
    pub fn reset(&mut self) {
        self.bytes = Self::new().bytes;
        let start = PROGRAM_START as usize;
        self.bytes[start..start + self.rom.len()].copy_from_slice(&self.rom);
    }

    /// The rom as loaded, unaffected by later writes.
    pub fn rom(&self) -> &[u8] {
        &self.rom
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Return addresses for 2NNN/00EE, bounded at `STACK_DEPTH`.
#[derive(Debug, Clone)]
pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    len: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_DEPTH],
            len: 0,
        }
    }

    /// Hands the address back when the stack is already full.
    pub fn push(&mut self, addr: TypeAddr) -> Result<(), TypeAddr> {
        if self.len == STACK_DEPTH {
            return Err(addr);
        }
        self.addresses[self.len] = addr;
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.addresses[self.len])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
