use super::addr_mode::Operand;
use super::decode::{decode, Op};
use super::disasm::Instruction;
use super::opcodes::Exec;
use super::{vectors, Ram, Status};
use crate::bus::{ByteAccess, WordAccess};
use crate::error::CpuError;
use std::fmt;
use tracing::{debug, trace};

/// where the cpu is in its life. there is no terminal state: only the driver decides to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// just built or reset, nothing executed yet
    Ready,
    /// at least one instruction has completed since the last reset
    Running,
}

#[derive(Debug, Clone)]
pub struct Six502<M = Ram> {
    /// the major use for the accumulator is transferring data from memory to the accumulator or from the accumulator to memory.
    /// mathematical and logical operations can then be done to data inside the accumulator
    pub(super) a: u8,
    pub(super) x: u8,
    pub(super) y: u8,
    /// the program counter always addresses the operation to perform next.
    /// the only way a program changes the sequence of ops is by writing it: jumps, calls, returns and branches
    pub(super) pc: u16,
    pub(super) s: u8,
    pub(super) p: Status,
    pub(super) cy: u64,
    pub(super) state: State,
    /// Sixteen bits of address allow access to 65,536 memory locations
    pub(super) bus: M,
}

impl<M: ByteAccess> ByteAccess for Six502<M> {
    fn load_u8(&self, addr: u16) -> u8 {
        self.bus.load_u8(addr)
    }

    fn store_u8(&mut self, addr: u16, v: u8) {
        self.bus.store_u8(addr, v);
    }
}

impl<M: ByteAccess> Six502<M> {
    /// wires a cpu to `memory`. execution starts at `pc`; no reset vector is consulted
    pub fn new(memory: M, pc: u16) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc,
            s: 0xfd,
            p: Status::default(),
            cy: 0,
            state: State::Ready,
            bus: memory,
        }
    }

    /// puts every register back to its power-on value and points the pc at `pc`.
    /// all flags but the reserved bit are cleared. memory is left alone
    pub fn reset(&mut self, pc: u16) {
        self.a = 0x00;
        self.x = 0x00;
        self.y = 0x00;
        self.s = 0xfd;
        self.p = Status::default();
        self.cy = 0;
        self.pc = pc;
        self.state = State::Ready;
        debug!("reset, pc = ${:04X}", pc);
    }

    /// resets to the address held in the RESET vector at $FFFC/$FFFD
    pub fn reset_to_vector(&mut self) {
        let pc = self.bus.load_u16(vectors::RESET);
        self.reset(pc);
    }

    /// runs exactly one instruction: fetch, decode, resolve the operand, execute, advance the pc.
    /// on error nothing has been modified and the pc still points at the offending opcode
    pub fn tick(&mut self) -> Result<(), CpuError> {
        let pc = self.pc;
        let opcode = self.load_u8(pc);
        let entry = decode(opcode).ok_or(CpuError::UnknownOpcode { opcode, addr: pc })?;
        let operand = self.resolve(entry.mode, pc);

        trace!("{:04X}  {:<14} {}", pc, Instruction::read(&self.bus, pc).to_string(), self);

        self.exec(entry.op, operand)
            .map_err(|_| CpuError::UnsupportedMode {
                opcode,
                mode: entry.mode,
                addr: pc,
            })?;

        // jumps, calls and taken or not taken branches have already written the pc
        if entry.auto_advance {
            self.pc = pc.wrapping_add(entry.len as u16);
        }
        self.cy = self.cy.wrapping_add(entry.cycles as u64);
        self.state = State::Running;
        Ok(())
    }

    fn exec(&mut self, op: Op, operand: Operand) -> Exec {
        match op {
            // load/stores
            Op::LDA => self.lda(operand),
            Op::LDX => self.ldx(operand),
            Op::LDY => self.ldy(operand),
            Op::STA => self.sta(operand),
            Op::STX => self.stx(operand),
            Op::STY => self.sty(operand),

            // comparisons
            Op::CMP => self.cmp(operand),
            Op::CPX => self.cpx(operand),
            Op::CPY => self.cpy(operand),
            Op::BIT => self.bit(operand),

            // transfers
            Op::TAX => self.tax(),
            Op::TAY => self.tay(),
            Op::TXA => self.txa(),
            Op::TYA => self.tya(),
            Op::TSX => self.tsx(),
            Op::TXS => self.txs(),

            // stack ops
            Op::PHA => self.pha(),
            Op::PHP => self.php(),
            Op::PLA => self.pla(),
            Op::PLP => self.plp(),

            // logical ops
            Op::AND => self.and(operand),
            Op::ORA => self.ora(operand),
            Op::EOR => self.eor(operand),

            // arithmetic ops
            Op::ADC => self.adc(operand),
            Op::SBC => self.sbc(operand),

            // incrs and decrs
            Op::INC => self.inc(operand),
            Op::DEC => self.dec(operand),
            Op::INX => self.inx(),
            Op::INY => self.iny(),
            Op::DEX => self.dex(),
            Op::DEY => self.dey(),

            // shifts
            Op::ASL => self.asl(operand),
            Op::LSR => self.lsr(operand),
            Op::ROL => self.rol(operand),
            Op::ROR => self.ror(operand),

            // jumps and calls
            Op::JMP => self.jmp(operand),
            Op::JSR => self.jsr(operand),
            Op::RTS => self.rts(),
            Op::BRK => self.brk(),
            Op::RTI => self.rti(),

            // branches
            Op::BPL => self.branch(operand, !self.is_flag_set(Status::NEGATIVE)),
            Op::BMI => self.branch(operand, self.is_flag_set(Status::NEGATIVE)),
            Op::BVC => self.branch(operand, !self.is_flag_set(Status::OVERFLOW)),
            Op::BVS => self.branch(operand, self.is_flag_set(Status::OVERFLOW)),
            Op::BCC => self.branch(operand, !self.is_flag_set(Status::CARRY)),
            Op::BCS => self.branch(operand, self.is_flag_set(Status::CARRY)),
            Op::BNE => self.branch(operand, !self.is_flag_set(Status::ZERO)),
            Op::BEQ => self.branch(operand, self.is_flag_set(Status::ZERO)),

            // status flag changes
            Op::CLC => self.clc(),
            Op::SEC => self.sec(),
            Op::CLI => self.cli(),
            Op::SEI => self.sei(),
            Op::CLV => self.clv(),
            Op::CLD => self.cld(),
            Op::SED => self.sed(),

            Op::NOP => self.nop(),
        }
    }

    /// moves the pc without touching anything else. for drivers that step over bytes or stop on breakpoints
    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.load_u8(addr)
    }

    pub fn write(&mut self, addr: u16, v: u8) {
        self.store_u8(addr, v);
    }

    pub fn memory(&self) -> &M {
        &self.bus
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.bus
    }

    pub fn into_memory(self) -> M {
        self.bus
    }
}

// register and flag introspection
impl<M> Six502<M> {
    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.s
    }

    /// the status register as it would be pushed by `php`, minus the break bit
    pub fn status(&self) -> Status {
        self.p
    }

    /// base cycles spent since the last reset
    pub fn cycles(&self) -> u64 {
        self.cy
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn flag(&self, flag: Status) -> bool {
        self.p.contains(flag)
    }

    pub fn carry(&self) -> bool {
        self.flag(Status::CARRY)
    }

    pub fn zero(&self) -> bool {
        self.flag(Status::ZERO)
    }

    pub fn interrupt_disable(&self) -> bool {
        self.flag(Status::IRQ)
    }

    pub fn decimal(&self) -> bool {
        self.flag(Status::DECIMAL)
    }

    pub fn break_flag(&self) -> bool {
        self.flag(Status::BREAK)
    }

    pub fn reserved(&self) -> bool {
        self.flag(Status::UNUSED)
    }

    pub fn overflow(&self) -> bool {
        self.flag(Status::OVERFLOW)
    }

    pub fn negative(&self) -> bool {
        self.flag(Status::NEGATIVE)
    }
}

impl<M> fmt::Display for Six502<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PC:{:04X} CYC:{}",
            self.a,
            self.x,
            self.y,
            self.p.bits(),
            self.s,
            self.pc,
            self.cy
        )
    }
}
