use thiserror::Error;

use crate::memory::TypeAddr;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("rom is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("stack overflow: call at {pc:#05X} exceeds {depth} nested subroutines")]
    StackOverflow { pc: TypeAddr, depth: usize },

    #[error("stack underflow: return at {pc:#05X} with an empty call stack")]
    StackUnderflow { pc: TypeAddr },
}

impl Chip8Error {
    /// Stack faults stop the machine; everything else is reported before execution starts.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Chip8Error::StackOverflow { .. } | Chip8Error::StackUnderflow { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Chip8Error::RomTooLarge {
            size: 4000,
            max: 3584,
        };
        assert_eq!(
            err.to_string(),
            "rom is too large (4000 bytes), max size is 3584 bytes"
        );
        let err = Chip8Error::StackUnderflow { pc: 0x20A };
        assert_eq!(
            err.to_string(),
            "stack underflow: return at 0x20A with an empty call stack"
        );
    }

    #[test]
    fn test_fatality() {
        assert!(Chip8Error::StackOverflow { pc: 0x200, depth: 12 }.is_fatal());
        assert!(Chip8Error::StackUnderflow { pc: 0x200 }.is_fatal());
        assert!(!Chip8Error::RomTooLarge { size: 1, max: 0 }.is_fatal());
    }
}
