use crate::six502::AddressingMode;
use std::io;
use thiserror::Error;

/// Why a single `tick` did not complete. No register or memory cell is touched when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("unrecognized opcode ${opcode:02X} at ${addr:04X}")]
    UnknownOpcode { opcode: u8, addr: u16 },

    /// the instruction needs a value or an address its addressing mode cannot provide
    #[error("opcode ${opcode:02X} at ${addr:04X} cannot be executed in {mode:?} addressing")]
    UnsupportedMode {
        opcode: u8,
        mode: AddressingMode,
        addr: u16,
    },
}

impl CpuError {
    /// address of the instruction that failed
    pub fn addr(&self) -> u16 {
        match *self {
            CpuError::UnknownOpcode { addr, .. } | CpuError::UnsupportedMode { addr, .. } => addr,
        }
    }

    pub fn opcode(&self) -> u8 {
        match *self {
            CpuError::UnknownOpcode { opcode, .. } | CpuError::UnsupportedMode { opcode, .. } => {
                opcode
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read program image: {0}")]
    Io(#[from] io::Error),

    #[error("program of {len} bytes does not fit in memory at ${base:04X}")]
    TooLarge { base: u16, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmError {
    #[error("line {line}: syntax error near `{text}`")]
    Syntax { line: usize, text: String },

    #[error("line {line}: unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: {mnemonic} has no {mode:?} addressing mode")]
    InvalidMode {
        line: usize,
        mnemonic: &'static str,
        mode: AddressingMode,
    },

    #[error("line {line}: undefined label `{label}`")]
    UndefinedLabel { line: usize, label: String },

    #[error("line {line}: label `{label}` is already defined")]
    DuplicateLabel { line: usize, label: String },

    #[error("line {line}: value {value} does not fit in {bytes} byte(s)")]
    ValueOutOfRange { line: usize, value: u32, bytes: u8 },

    #[error("line {line}: branch offset {offset} is out of range")]
    BranchOutOfRange { line: usize, offset: i32 },

    #[error("assembled program of {len} bytes does not fit in memory at ${origin:04X}")]
    TooLarge { origin: u16, len: usize },
}
