use super::addr_mode::AddressingMode;
use super::decode::{decode, Opcode};
use crate::bus::ByteAccess;
use std::fmt;

/// one decoded instruction, as it sits in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub addr: u16,
    pub opcode: u8,
    /// `None` when the byte is not a known opcode
    pub entry: Option<Opcode>,
    operand: [u8; 2],
}

impl Instruction {
    pub fn read<B: ByteAccess + ?Sized>(bus: &B, addr: u16) -> Self {
        let opcode = bus.load_u8(addr);
        let entry = decode(opcode);
        let mut operand = [0u8; 2];
        let n = entry.map_or(0, |e| e.mode.operand_len() as usize);
        for (i, b) in operand.iter_mut().take(n).enumerate() {
            *b = bus.load_u8(addr.wrapping_add(1 + i as u16));
        }
        Self {
            addr,
            opcode,
            entry,
            operand,
        }
    }

    /// size in bytes. unknown bytes count as one
    pub fn size(&self) -> u8 {
        self.entry.map_or(1, |e| e.len)
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut v = vec![self.opcode];
        v.extend_from_slice(&self.operand[..self.size() as usize - 1]);
        v
    }

    fn word(&self) -> u16 {
        u16::from_le_bytes(self.operand)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(entry) = self.entry else {
            return write!(f, ".byte ${:02X}", self.opcode);
        };
        let m = entry.op.mnemonic();
        let b = self.operand[0];
        match entry.mode {
            AddressingMode::Implied => write!(f, "{m}"),
            AddressingMode::Accumulator => write!(f, "{m} A"),
            AddressingMode::Immediate => write!(f, "{m} #${b:02X}"),
            AddressingMode::ZeroPage => write!(f, "{m} ${b:02X}"),
            AddressingMode::ZeroPageX => write!(f, "{m} ${b:02X},X"),
            AddressingMode::ZeroPageY => write!(f, "{m} ${b:02X},Y"),
            AddressingMode::Absolute => write!(f, "{m} ${:04X}", self.word()),
            AddressingMode::AbsoluteX => write!(f, "{m} ${:04X},X", self.word()),
            AddressingMode::AbsoluteY => write!(f, "{m} ${:04X},Y", self.word()),
            AddressingMode::Indirect => write!(f, "{m} (${:04X})", self.word()),
            AddressingMode::IndirectX => write!(f, "{m} (${b:02X},X)"),
            AddressingMode::IndirectY => write!(f, "{m} (${b:02X}),Y"),
            // show where the branch goes, not the raw offset
            AddressingMode::Relative => {
                let target = self.addr.wrapping_add(2).wrapping_add(b as i8 as i16 as u16);
                write!(f, "{m} ${target:04X}")
            }
        }
    }
}

/// decodes `count` consecutive instructions starting at `start`
pub fn disassemble<B: ByteAccess + ?Sized>(bus: &B, start: u16, count: usize) -> Vec<Instruction> {
    let mut out = Vec::with_capacity(count);
    let mut addr = start;
    for _ in 0..count {
        let ins = Instruction::read(bus, addr);
        addr = addr.wrapping_add(ins.size() as u16);
        out.push(ins);
    }
    out
}
