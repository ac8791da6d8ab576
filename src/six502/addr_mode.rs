use super::Six502;
use crate::bus::{ByteAccess, WordAccess};

/// [reference](https://www.masswerk.at/6502/6502_instruction_set.html)
/// The 6502 has the ability to do indexed addressing, where the X or Y register is used as an extra offset to the address being accessed.
///
/// Two major kinds of addressing exist.
/// 1. Direct addressing: the address is plainly what is after the opcode. e.g. absolute, zero page, immediate.
/// 2. i.  Indexed addressing modifies the address that follows the opcode with an index register.
///   ii. Indirect addressing uses an address stored in memory, reached through a pointer that follows the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    // The instruction is just one byte. the opcode holds the source and the destination (e.g. tsx)
    Implied,

    // operand is the accumulator. for single byte instructions
    Accumulator,

    // OPC #$BB: operand is the byte BB, as is.
    Immediate,

    // OPC $LL: only the first page (the first 256 bytes) of memory is accessible
    ZeroPage,

    // OPC $LL,X: effective address is LL incremented by X without carry
    ZeroPageX,

    // OPC $LL,Y: effective address is LL incremented by Y without carry
    ZeroPageY,

    // OPC $LLHH: operand is address $HHLL (i.e. read little-endian)
    Absolute,

    // OPC $LLHH,X: effective address is $HHLL incremented by X with carry
    AbsoluteX,

    // OPC $LLHH,Y: effective address is $HHLL incremented by Y with carry
    AbsoluteY,

    // OPC ($LLHH): effective address is the word at $HHLL. only `jmp` uses it
    Indirect,

    // OPC ($LL,X): effective address is the word at (LL + X, LL + X + 1), without carry
    IndirectX,

    // OPC ($LL),Y: effective address is the word at (LL, LL + 1), incremented by Y with carry
    IndirectY,

    // OPC $BB: branch target is the address of the next instruction plus the signed offset BB
    Relative,
}

impl AddressingMode {
    /// number of bytes that follow the opcode
    pub const fn operand_len(self) -> u8 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}

/// what an addressing mode turns the operand bytes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Accumulator,
    Immediate(u8),
    /// the effective address
    Address(u16),
}

/// an instruction asked its operand for something the addressing mode does not provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct OperandMismatch;

impl Operand {
    pub fn address(self) -> Option<u16> {
        match self {
            Operand::Address(addr) => Some(addr),
            _ => None,
        }
    }

    /// load fetches the value an instruction operates on
    pub(super) fn load<M: ByteAccess>(self, cpu: &Six502<M>) -> Result<u8, OperandMismatch> {
        match self {
            Operand::Immediate(v) => Ok(v),
            Operand::Address(addr) => Ok(cpu.load_u8(addr)),
            Operand::Accumulator => Ok(cpu.a),
            Operand::None => Err(OperandMismatch),
        }
    }

    /// store writes an instruction's result back to where the operand came from
    pub(super) fn store<M: ByteAccess>(
        self,
        cpu: &mut Six502<M>,
        v: u8,
    ) -> Result<(), OperandMismatch> {
        match self {
            Operand::Address(addr) => {
                cpu.store_u8(addr, v);
                Ok(())
            }
            Operand::Accumulator => {
                cpu.a = v;
                Ok(())
            }
            // there is nowhere to write an immediate to
            Operand::Immediate(_) | Operand::None => Err(OperandMismatch),
        }
    }
}

impl<M: ByteAccess> Six502<M> {
    /// resolve turns the bytes following the opcode at `pc` into an operand. it only reads memory; registers are untouched.
    pub fn resolve(&self, mode: AddressingMode, pc: u16) -> Operand {
        // the bytes after a one-byte instruction belong to the next instruction, so don't even look at them
        let arg = pc.wrapping_add(1);
        match mode {
            AddressingMode::Implied => Operand::None,
            AddressingMode::Accumulator => Operand::Accumulator,
            AddressingMode::Immediate => Operand::Immediate(self.load_u8(arg)),
            AddressingMode::ZeroPage => Operand::Address(self.load_u8(arg) as u16),

            // zero page addition never crosses into page 1. it wraps around within page zero,
            // that's why we add the `u8`s before converting to `u16`
            AddressingMode::ZeroPageX => {
                Operand::Address(self.load_u8(arg).wrapping_add(self.x) as u16)
            }
            AddressingMode::ZeroPageY => {
                Operand::Address(self.load_u8(arg).wrapping_add(self.y) as u16)
            }

            AddressingMode::Absolute => Operand::Address(self.bus.load_u16(arg)),
            AddressingMode::AbsoluteX => {
                Operand::Address(self.bus.load_u16(arg).wrapping_add(self.x as u16))
            }
            AddressingMode::AbsoluteY => {
                Operand::Address(self.bus.load_u16(arg).wrapping_add(self.y as u16))
            }

            // the nmos part never carries into the pointer's high byte: jmp ($10ff) reads $10ff and $1000
            AddressingMode::Indirect => {
                let ptr = self.bus.load_u16(arg);
                let lo = self.load_u8(ptr);
                let hi = self.load_u8((ptr & 0xff00) | (ptr.wrapping_add(1) & 0x00ff));
                Operand::Address(u16::from_le_bytes([lo, hi]))
            }

            // the major use of indexed indirect is picking up data from a table or list of addresses
            AddressingMode::IndirectX => {
                let zp = self.load_u8(arg).wrapping_add(self.x);
                Operand::Address(self.bus.load_u16_zp(zp))
            }
            AddressingMode::IndirectY => {
                let zp = self.load_u8(arg);
                Operand::Address(self.bus.load_u16_zp(zp).wrapping_add(self.y as u16))
            }

            AddressingMode::Relative => {
                let off = self.load_u8(arg) as i8;
                let next = pc.wrapping_add(2);
                Operand::Address(next.wrapping_add(off as i16 as u16))
            }
        }
    }
}
