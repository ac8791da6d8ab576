mod addr_mode;
mod decode;
mod disasm;
mod flags;
mod opcodes;
mod ram;
#[allow(clippy::module_inception)]
mod six502;
mod util;

pub use addr_mode::{AddressingMode, Operand};
pub use decode::{decode, find_opcode, modes_of, Op, Opcode, UnknownMnemonic};
pub use disasm::{disassemble, Instruction};
pub use flags::Status;
pub use ram::{Ram, MEM_SIZE};
pub use six502::{Six502, State};

/// the last six bytes of the last page hold the addresses the hardware jumps through
pub mod vectors {
    pub const NMI: u16 = 0xfffa;
    pub const RESET: u16 = 0xfffc;
    /// shared by IRQ and `brk`
    pub const IRQ: u16 = 0xfffe;
}
