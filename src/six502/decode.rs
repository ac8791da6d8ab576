use super::addr_mode::AddressingMode::{self, *};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

macro_rules! ops {
    ($($name:ident => $doc:literal),+ $(,)?) => {
        /// one variant per mnemonic. the addressing mode lives in the table entry, not in here
        // Source: https://web.archive.org/web/20210428044647/http://www.obelisk.me.uk/6502/reference.html
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Op {
            $(#[doc = $doc] $name,)+
        }

        impl Op {
            pub const ALL: &'static [Op] = &[$(Op::$name),+];

            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(Op::$name => stringify!($name),)+
                }
            }
        }
    };
}

ops! {
    ADC => "add with carry",
    AND => "logical and",
    ASL => "arithmetic shift left",
    BCC => "branch if carry clear",
    BCS => "branch if carry set",
    BEQ => "branch if equal",
    BIT => "bit test",
    BMI => "branch if minus",
    BNE => "branch if not equal",
    BPL => "branch if positive",
    BRK => "force interrupt",
    BVC => "branch if overflow clear",
    BVS => "branch if overflow set",
    CLC => "clear carry flag",
    CLD => "clear decimal mode",
    CLI => "clear interrupt disable",
    CLV => "clear overflow flag",
    CMP => "compare",
    CPX => "compare x register",
    CPY => "compare y register",
    DEC => "decrement memory",
    DEX => "decrement x register",
    DEY => "decrement y register",
    EOR => "exclusive or",
    INC => "increment memory",
    INX => "increment x register",
    INY => "increment y register",
    JMP => "jump",
    JSR => "jump to subroutine",
    LDA => "load accumulator",
    LDX => "load x register",
    LDY => "load y register",
    LSR => "logical shift right",
    NOP => "no-op",
    ORA => "logical inclusive or",
    PHA => "push accumulator",
    PHP => "push processor status",
    PLA => "pull accumulator",
    PLP => "pull processor status",
    ROL => "rotate left",
    ROR => "rotate right",
    RTI => "return from interrupt",
    RTS => "return from subroutine",
    SBC => "subtract with carry",
    SEC => "set carry flag",
    SED => "set decimal flag",
    SEI => "set interrupt disable",
    STA => "store accumulator",
    STX => "store x register",
    STY => "store y register",
    TAX => "transfer accumulator to x",
    TAY => "transfer accumulator to y",
    TSX => "transfer stack pointer to x",
    TXA => "transfer x to accumulator",
    TXS => "transfer x to stack pointer",
    TYA => "transfer y to accumulator",
}

impl Op {
    /// ops that write the pc themselves. the engine must not add the instruction length after them
    pub const fn sets_pc(self) -> bool {
        matches!(
            self,
            Op::JMP
                | Op::JSR
                | Op::RTS
                | Op::RTI
                | Op::BRK
                | Op::BCC
                | Op::BCS
                | Op::BEQ
                | Op::BMI
                | Op::BNE
                | Op::BPL
                | Op::BVC
                | Op::BVS
        )
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMnemonic(pub String);

impl FromStr for Op {
    type Err = UnknownMnemonic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::ALL
            .iter()
            .copied()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMnemonic(s.to_string()))
    }
}

/// one row of the decode table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub op: Op,
    pub mode: AddressingMode,
    /// instruction length in bytes, opcode included
    pub len: u8,
    /// base cycle cost. page crossings and taken branches are not counted
    pub cycles: u8,
    /// false when the handler sets the pc itself
    pub auto_advance: bool,
}

impl Opcode {
    const fn new(op: Op, mode: AddressingMode, cycles: u8) -> Self {
        Self {
            op,
            mode,
            len: 1 + mode.operand_len(),
            cycles,
            auto_advance: !op.sets_pc(),
        }
    }
}

// (opcode, op, mode, base cycles)
#[rustfmt::skip]
const ENCODINGS: &[(u8, Op, AddressingMode, u8)] = &[
    // load/stores
    (0xa9, Op::LDA, Immediate, 2), (0xa5, Op::LDA, ZeroPage, 3), (0xb5, Op::LDA, ZeroPageX, 4),
    (0xad, Op::LDA, Absolute, 4), (0xbd, Op::LDA, AbsoluteX, 4), (0xb9, Op::LDA, AbsoluteY, 4),
    (0xa1, Op::LDA, IndirectX, 6), (0xb1, Op::LDA, IndirectY, 5),

    (0xa2, Op::LDX, Immediate, 2), (0xa6, Op::LDX, ZeroPage, 3), (0xb6, Op::LDX, ZeroPageY, 4),
    (0xae, Op::LDX, Absolute, 4), (0xbe, Op::LDX, AbsoluteY, 4),

    (0xa0, Op::LDY, Immediate, 2), (0xa4, Op::LDY, ZeroPage, 3), (0xb4, Op::LDY, ZeroPageX, 4),
    (0xac, Op::LDY, Absolute, 4), (0xbc, Op::LDY, AbsoluteX, 4),

    (0x85, Op::STA, ZeroPage, 3), (0x95, Op::STA, ZeroPageX, 4), (0x8d, Op::STA, Absolute, 4),
    (0x9d, Op::STA, AbsoluteX, 5), (0x99, Op::STA, AbsoluteY, 5), (0x81, Op::STA, IndirectX, 6),
    (0x91, Op::STA, IndirectY, 6),

    (0x86, Op::STX, ZeroPage, 3), (0x96, Op::STX, ZeroPageY, 4), (0x8e, Op::STX, Absolute, 4),
    (0x84, Op::STY, ZeroPage, 3), (0x94, Op::STY, ZeroPageX, 4), (0x8c, Op::STY, Absolute, 4),

    // comparisons
    (0xc9, Op::CMP, Immediate, 2), (0xc5, Op::CMP, ZeroPage, 3), (0xd5, Op::CMP, ZeroPageX, 4),
    (0xcd, Op::CMP, Absolute, 4), (0xdd, Op::CMP, AbsoluteX, 4), (0xd9, Op::CMP, AbsoluteY, 4),
    (0xc1, Op::CMP, IndirectX, 6), (0xd1, Op::CMP, IndirectY, 5),

    (0xe0, Op::CPX, Immediate, 2), (0xe4, Op::CPX, ZeroPage, 3), (0xec, Op::CPX, Absolute, 4),
    (0xc0, Op::CPY, Immediate, 2), (0xc4, Op::CPY, ZeroPage, 3), (0xcc, Op::CPY, Absolute, 4),

    (0x24, Op::BIT, ZeroPage, 3), (0x2c, Op::BIT, Absolute, 4),

    // transfers
    (0xaa, Op::TAX, Implied, 2), (0xa8, Op::TAY, Implied, 2), (0x8a, Op::TXA, Implied, 2),
    (0x98, Op::TYA, Implied, 2), (0x9a, Op::TXS, Implied, 2), (0xba, Op::TSX, Implied, 2),

    // stack ops
    (0x48, Op::PHA, Implied, 3), (0x08, Op::PHP, Implied, 3),
    (0x68, Op::PLA, Implied, 4), (0x28, Op::PLP, Implied, 4),

    // logical ops
    (0x29, Op::AND, Immediate, 2), (0x25, Op::AND, ZeroPage, 3), (0x35, Op::AND, ZeroPageX, 4),
    (0x2d, Op::AND, Absolute, 4), (0x3d, Op::AND, AbsoluteX, 4), (0x39, Op::AND, AbsoluteY, 4),
    (0x21, Op::AND, IndirectX, 6), (0x31, Op::AND, IndirectY, 5),

    (0x09, Op::ORA, Immediate, 2), (0x05, Op::ORA, ZeroPage, 3), (0x15, Op::ORA, ZeroPageX, 4),
    (0x0d, Op::ORA, Absolute, 4), (0x1d, Op::ORA, AbsoluteX, 4), (0x19, Op::ORA, AbsoluteY, 4),
    (0x01, Op::ORA, IndirectX, 6), (0x11, Op::ORA, IndirectY, 5),

    (0x49, Op::EOR, Immediate, 2), (0x45, Op::EOR, ZeroPage, 3), (0x55, Op::EOR, ZeroPageX, 4),
    (0x4d, Op::EOR, Absolute, 4), (0x5d, Op::EOR, AbsoluteX, 4), (0x59, Op::EOR, AbsoluteY, 4),
    (0x41, Op::EOR, IndirectX, 6), (0x51, Op::EOR, IndirectY, 5),

    // arithmetic ops
    (0x69, Op::ADC, Immediate, 2), (0x65, Op::ADC, ZeroPage, 3), (0x75, Op::ADC, ZeroPageX, 4),
    (0x6d, Op::ADC, Absolute, 4), (0x7d, Op::ADC, AbsoluteX, 4), (0x79, Op::ADC, AbsoluteY, 4),
    (0x61, Op::ADC, IndirectX, 6), (0x71, Op::ADC, IndirectY, 5),

    (0xe9, Op::SBC, Immediate, 2), (0xe5, Op::SBC, ZeroPage, 3), (0xf5, Op::SBC, ZeroPageX, 4),
    (0xed, Op::SBC, Absolute, 4), (0xfd, Op::SBC, AbsoluteX, 4), (0xf9, Op::SBC, AbsoluteY, 4),
    (0xe1, Op::SBC, IndirectX, 6), (0xf1, Op::SBC, IndirectY, 5),

    // incrs and decrs
    (0xe6, Op::INC, ZeroPage, 5), (0xf6, Op::INC, ZeroPageX, 6), (0xee, Op::INC, Absolute, 6),
    (0xfe, Op::INC, AbsoluteX, 7),
    (0xc6, Op::DEC, ZeroPage, 5), (0xd6, Op::DEC, ZeroPageX, 6), (0xce, Op::DEC, Absolute, 6),
    (0xde, Op::DEC, AbsoluteX, 7),
    // not nmos: the accumulator forms, at the slots the 65c02 gives them
    (0x1a, Op::INC, Accumulator, 2), (0x3a, Op::DEC, Accumulator, 2),

    (0xe8, Op::INX, Implied, 2), (0xca, Op::DEX, Implied, 2),
    (0xc8, Op::INY, Implied, 2), (0x88, Op::DEY, Implied, 2),

    // shifts
    (0x0a, Op::ASL, Accumulator, 2), (0x06, Op::ASL, ZeroPage, 5), (0x16, Op::ASL, ZeroPageX, 6),
    (0x0e, Op::ASL, Absolute, 6), (0x1e, Op::ASL, AbsoluteX, 7),

    (0x4a, Op::LSR, Accumulator, 2), (0x46, Op::LSR, ZeroPage, 5), (0x56, Op::LSR, ZeroPageX, 6),
    (0x4e, Op::LSR, Absolute, 6), (0x5e, Op::LSR, AbsoluteX, 7),

    (0x2a, Op::ROL, Accumulator, 2), (0x26, Op::ROL, ZeroPage, 5), (0x36, Op::ROL, ZeroPageX, 6),
    (0x2e, Op::ROL, Absolute, 6), (0x3e, Op::ROL, AbsoluteX, 7),

    (0x6a, Op::ROR, Accumulator, 2), (0x66, Op::ROR, ZeroPage, 5), (0x76, Op::ROR, ZeroPageX, 6),
    (0x6e, Op::ROR, Absolute, 6), (0x7e, Op::ROR, AbsoluteX, 7),

    // jumps and calls
    (0x4c, Op::JMP, Absolute, 3), (0x6c, Op::JMP, Indirect, 5),
    (0x20, Op::JSR, Absolute, 6), (0x60, Op::RTS, Implied, 6),
    (0x00, Op::BRK, Implied, 7), (0x40, Op::RTI, Implied, 6),

    // branches
    (0x10, Op::BPL, Relative, 2), (0x30, Op::BMI, Relative, 2),
    (0x50, Op::BVC, Relative, 2), (0x70, Op::BVS, Relative, 2),
    (0x90, Op::BCC, Relative, 2), (0xb0, Op::BCS, Relative, 2),
    (0xd0, Op::BNE, Relative, 2), (0xf0, Op::BEQ, Relative, 2),

    // status flag changes
    (0x18, Op::CLC, Implied, 2), (0x38, Op::SEC, Implied, 2),
    (0x58, Op::CLI, Implied, 2), (0x78, Op::SEI, Implied, 2),
    (0xb8, Op::CLV, Implied, 2), (0xd8, Op::CLD, Implied, 2),
    (0xf8, Op::SED, Implied, 2),

    // no-op
    (0xea, Op::NOP, Implied, 2),
];

lazy_static::lazy_static! {
    static ref OPCODES: [Option<Opcode>; 256] = {
        let mut table = [None; 256];
        for &(byte, op, mode, cycles) in ENCODINGS {
            table[byte as usize] = Some(Opcode::new(op, mode, cycles));
        }
        table
    };

    static ref ENCODE: HashMap<(Op, AddressingMode), u8> = ENCODINGS
        .iter()
        .map(|&(byte, op, mode, _)| ((op, mode), byte))
        .collect();
}

/// looks up an opcode byte. `None` for every byte that is not a known instruction
pub fn decode(opcode: u8) -> Option<Opcode> {
    OPCODES[opcode as usize]
}

/// the reverse of `decode`: the byte that encodes `op` in `mode`, if that combination exists
pub fn find_opcode(op: Op, mode: AddressingMode) -> Option<u8> {
    ENCODE.get(&(op, mode)).copied()
}

/// every addressing mode `op` can be encoded with
pub fn modes_of(op: Op) -> impl Iterator<Item = AddressingMode> {
    ENCODINGS
        .iter()
        .filter(move |&&(_, o, _, _)| o == op)
        .map(|&(_, _, mode, _)| mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_has_every_documented_opcode_once() {
        let bytes: HashSet<u8> = ENCODINGS.iter().map(|e| e.0).collect();
        assert_eq!(bytes.len(), ENCODINGS.len());
        // 151 documented encodings plus the two accumulator forms
        assert_eq!(ENCODINGS.len(), 153);
        assert_eq!(OPCODES.iter().flatten().count(), 153);
    }

    #[test]
    fn lengths_follow_addressing_mode() {
        for entry in OPCODES.iter().flatten() {
            assert_eq!(entry.len, 1 + entry.mode.operand_len(), "{:?}", entry);
            assert!((1..=3).contains(&entry.len));
        }
    }

    #[test]
    fn only_pc_writers_skip_auto_advance() {
        let jmp = decode(0x4c).unwrap();
        assert_eq!(jmp.op, Op::JMP);
        assert_eq!(jmp.mode, Absolute);
        assert_eq!(jmp.len, 3);
        assert!(!jmp.auto_advance);

        let lda = decode(0xa9).unwrap();
        assert_eq!((lda.op, lda.mode, lda.len), (Op::LDA, Immediate, 2));
        assert!(lda.auto_advance);

        for entry in OPCODES.iter().flatten() {
            assert_eq!(entry.auto_advance, !entry.op.sets_pc());
        }
    }

    #[test]
    fn unknown_bytes_decode_to_none() {
        assert_eq!(decode(0xff), None);
        assert_eq!(decode(0x02), None);
        assert_eq!(decode(0x80), None);
    }

    #[test]
    fn reverse_lookup_agrees_with_decode() {
        for &(byte, op, mode, _) in ENCODINGS {
            assert_eq!(find_opcode(op, mode), Some(byte));
        }
        assert_eq!(find_opcode(Op::STA, Immediate), None);
        assert_eq!(find_opcode(Op::LDA, ZeroPageY), None);
    }

    #[test]
    fn every_op_has_an_encoding() {
        for &op in Op::ALL {
            assert!(modes_of(op).next().is_some(), "{} has no encoding", op);
        }
        assert_eq!(Op::ALL.len(), 56);
    }

    #[test]
    fn mnemonics_parse_case_insensitively() {
        assert_eq!("lda".parse::<Op>(), Ok(Op::LDA));
        assert_eq!("Jmp".parse::<Op>(), Ok(Op::JMP));
        assert_eq!("XYZ".parse::<Op>(), Err(UnknownMnemonic("XYZ".into())));
        assert_eq!(Op::TXS.to_string(), "TXS");
    }
}
