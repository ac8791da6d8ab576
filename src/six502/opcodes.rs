use super::addr_mode::{Operand, OperandMismatch};
use super::util::check_overflow;
use super::{vectors, Six502, Status};
use crate::bus::{ByteAccess, WordAccess};

pub(super) type Exec = Result<(), OperandMismatch>;

// every branch is two bytes: the opcode and a signed offset
const BRANCH_LEN: u16 = 2;

// load/store ops
impl<M: ByteAccess> Six502<M> {
    /// load accumulator with memory. data is transferred from memory into the accumulator
    /// zero flag is set if the acc is zero, otherwise resets
    /// negative flag is set if bit 7 of the accumulator is a 1, otherwise resets
    pub(super) fn lda(&mut self, op: Operand) -> Exec {
        let v = op.load(self)?;
        self.a = v;
        self.update_zn(v);
        Ok(())
    }

    pub(super) fn ldx(&mut self, op: Operand) -> Exec {
        let v = op.load(self)?;
        self.x = v;
        self.update_zn(v);
        Ok(())
    }

    pub(super) fn ldy(&mut self, op: Operand) -> Exec {
        let v = op.load(self)?;
        self.y = v;
        self.update_zn(v);
        Ok(())
    }

    // transfers the contents of the accumulator to memory. flags are untouched
    pub(super) fn sta(&mut self, op: Operand) -> Exec {
        let addr = op.address().ok_or(OperandMismatch)?;
        self.store_u8(addr, self.a);
        Ok(())
    }

    pub(super) fn stx(&mut self, op: Operand) -> Exec {
        let addr = op.address().ok_or(OperandMismatch)?;
        self.store_u8(addr, self.x);
        Ok(())
    }

    pub(super) fn sty(&mut self, op: Operand) -> Exec {
        let addr = op.address().ok_or(OperandMismatch)?;
        self.store_u8(addr, self.y);
        Ok(())
    }
}

// comparisons
impl<M: ByteAccess> Six502<M> {
    // sets flags as if the operand had been subtracted from the register
    fn compare(&mut self, reg: u8, op: Operand) -> Exec {
        let v = op.load(self)?;
        self.assert_flag(Status::CARRY, reg >= v);
        self.update_zn(reg.wrapping_sub(v));
        Ok(())
    }

    pub(super) fn cmp(&mut self, op: Operand) -> Exec {
        self.compare(self.a, op)
    }

    pub(super) fn cpx(&mut self, op: Operand) -> Exec {
        self.compare(self.x, op)
    }

    pub(super) fn cpy(&mut self, op: Operand) -> Exec {
        self.compare(self.y, op)
    }

    /// bit: z from A & M, n and v are copied straight from bits 7 and 6 of M
    pub(super) fn bit(&mut self, op: Operand) -> Exec {
        let b = op.load(self)?;
        self.assert_flag(Status::ZERO, self.a & b == 0);
        self.assert_flag(Status::NEGATIVE, b & 0x80 != 0);
        self.assert_flag(Status::OVERFLOW, b & 0x40 != 0);
        Ok(())
    }
}

// register transfers. all but txs update z and n from the value moved
impl<M: ByteAccess> Six502<M> {
    pub(super) fn tax(&mut self) -> Exec {
        self.x = self.a;
        self.update_zn(self.x);
        Ok(())
    }

    pub(super) fn txa(&mut self) -> Exec {
        self.a = self.x;
        self.update_zn(self.a);
        Ok(())
    }

    pub(super) fn tay(&mut self) -> Exec {
        self.y = self.a;
        self.update_zn(self.y);
        Ok(())
    }

    pub(super) fn tya(&mut self) -> Exec {
        self.a = self.y;
        self.update_zn(self.a);
        Ok(())
    }

    /// tsx: Transfer Stack ptr to X
    pub(super) fn tsx(&mut self) -> Exec {
        self.x = self.s;
        self.update_zn(self.x);
        Ok(())
    }

    /// txs: transfer x register to stack pointer
    pub(super) fn txs(&mut self) -> Exec {
        self.s = self.x;
        Ok(())
    }
}

// stack ops
impl<M: ByteAccess> Six502<M> {
    pub(super) fn pha(&mut self) -> Exec {
        self.push_u8(self.a);
        Ok(())
    }

    pub(super) fn pla(&mut self) -> Exec {
        let v = self.pull_u8();
        self.a = v;
        self.update_zn(v);
        Ok(())
    }

    // php push processor status. the pushed copy always has the break bit set
    pub(super) fn php(&mut self) -> Exec {
        let flags = self.p | Status::BREAK | Status::UNUSED;
        self.push_u8(flags.bits());
        Ok(())
    }

    /// plp pulls processor status
    pub(super) fn plp(&mut self) -> Exec {
        self.pull_status();
        Ok(())
    }

    // break only exists on the stack, and the reserved bit can't be pulled low
    fn pull_status(&mut self) {
        let v = self.pull_u8();
        self.p = Status::from_bits_truncate(v);
        self.clear_flag(Status::BREAK);
        self.set_flag(Status::UNUSED);
    }
}

// logical ops
impl<M: ByteAccess> Six502<M> {
    /// and: bitwise AND with accumulator. affects the n and z flags
    pub(super) fn and(&mut self, op: Operand) -> Exec {
        let v = op.load(self)?;
        self.a &= v;
        self.update_zn(self.a);
        Ok(())
    }

    pub(super) fn ora(&mut self, op: Operand) -> Exec {
        let v = op.load(self)?;
        self.a |= v;
        self.update_zn(self.a);
        Ok(())
    }

    pub(super) fn eor(&mut self, op: Operand) -> Exec {
        let v = op.load(self)?;
        self.a ^= v;
        self.update_zn(self.a);
        Ok(())
    }
}

// arithmetic ops
// In unsigned arithmetic, we need to watch the carry flag to detect errors. In signed arithmetic, the overflow flag.
// the cpu knows nothing about the programmer's intents. it justs sets both flags accordingly
impl<M: ByteAccess> Six502<M> {
    // A + M + C -> A. the decimal flag is ignored, the adder always works in binary
    fn add(&mut self, v: u8) {
        // widen so the ninth bit is visible
        let sum = self.a as u16 + v as u16 + self.is_flag_set(Status::CARRY) as u16;
        let res = sum as u8;
        self.assert_flag(Status::CARRY, sum > 0xff);
        self.assert_flag(Status::OVERFLOW, check_overflow(self.a, v, res));
        self.a = res;
        self.update_zn(res);
    }

    /// Add Memory to Accumulator with Carry
    pub(super) fn adc(&mut self, op: Operand) -> Exec {
        let v = op.load(self)?;
        self.add(v);
        Ok(())
    }

    /// sbc subtracts the operand and the inverse of the carry bit from the accumulator.
    /// A - M - !C is A + !M + C in two's complement, so the carry comes out as "no borrow"
    pub(super) fn sbc(&mut self, op: Operand) -> Exec {
        let v = op.load(self)?;
        self.add(!v);
        Ok(())
    }
}

// incrs and decrs. all wrap modulo 256
impl<M: ByteAccess> Six502<M> {
    pub(super) fn inc(&mut self, op: Operand) -> Exec {
        let v = op.load(self)?.wrapping_add(1);
        op.store(self, v)?;
        self.update_zn(v);
        Ok(())
    }

    pub(super) fn dec(&mut self, op: Operand) -> Exec {
        let v = op.load(self)?.wrapping_sub(1);
        op.store(self, v)?;
        self.update_zn(v);
        Ok(())
    }

    pub(super) fn inx(&mut self) -> Exec {
        self.x = self.x.wrapping_add(1);
        self.update_zn(self.x);
        Ok(())
    }

    pub(super) fn dex(&mut self) -> Exec {
        self.x = self.x.wrapping_sub(1);
        self.update_zn(self.x);
        Ok(())
    }

    pub(super) fn iny(&mut self) -> Exec {
        self.y = self.y.wrapping_add(1);
        self.update_zn(self.y);
        Ok(())
    }

    pub(super) fn dey(&mut self) -> Exec {
        self.y = self.y.wrapping_sub(1);
        self.update_zn(self.y);
        Ok(())
    }
}

// shifts. the carry is used as a ninth bit, as it is in the arithmetic ops.
// the result is written back before any flag moves, so a bad operand leaves the cpu untouched
impl<M: ByteAccess> Six502<M> {
    pub(super) fn asl(&mut self, op: Operand) -> Exec {
        let b = op.load(self)?;
        let res = b << 1;
        op.store(self, res)?;
        self.assert_flag(Status::CARRY, b & 0x80 != 0);
        self.update_zn(res);
        Ok(())
    }

    pub(super) fn lsr(&mut self, op: Operand) -> Exec {
        let b = op.load(self)?;
        let res = b >> 1;
        op.store(self, res)?;
        self.assert_flag(Status::CARRY, b & 0x01 != 0);
        self.update_zn(res);
        Ok(())
    }

    pub(super) fn rol(&mut self, op: Operand) -> Exec {
        let b = op.load(self)?;
        let res = (b << 1) | self.is_flag_set(Status::CARRY) as u8;
        op.store(self, res)?;
        self.assert_flag(Status::CARRY, b & 0x80 != 0);
        self.update_zn(res);
        Ok(())
    }

    pub(super) fn ror(&mut self, op: Operand) -> Exec {
        let b = op.load(self)?;
        let res = (b >> 1) | ((self.is_flag_set(Status::CARRY) as u8) << 7);
        op.store(self, res)?;
        self.assert_flag(Status::CARRY, b & 0x01 != 0);
        self.update_zn(res);
        Ok(())
    }
}

// jumps and calls. these own the pc: the engine does not advance it after them
impl<M: ByteAccess> Six502<M> {
    pub(super) fn jmp(&mut self, op: Operand) -> Exec {
        self.pc = op.address().ok_or(OperandMismatch)?;
        Ok(())
    }

    // the address pushed is that of the last byte of the jsr, rts adds the missing one
    pub(super) fn jsr(&mut self, op: Operand) -> Exec {
        let target = op.address().ok_or(OperandMismatch)?;
        self.push_u16(self.pc.wrapping_add(2));
        self.pc = target;
        Ok(())
    }

    pub(super) fn rts(&mut self) -> Exec {
        self.pc = self.pull_u16().wrapping_add(1);
        Ok(())
    }

    // brk skips a padding byte: the return address is opcode + 2
    pub(super) fn brk(&mut self) -> Exec {
        self.push_u16(self.pc.wrapping_add(2));
        let flags = self.p | Status::BREAK | Status::UNUSED;
        self.push_u8(flags.bits());
        self.set_flag(Status::IRQ);
        self.pc = self.load_u16(vectors::IRQ);
        Ok(())
    }

    // retrieves the Processor Status Word (flags) and the Program Counter from the stack in that order
    pub(super) fn rti(&mut self) -> Exec {
        self.pull_status();
        self.pc = self.pull_u16();
        Ok(())
    }
}

// branches
// branching ops do not affect any flag, but they depend on flag states.
impl<M: ByteAccess> Six502<M> {
    pub(super) fn branch(&mut self, op: Operand, taken: bool) -> Exec {
        let target = op.address().ok_or(OperandMismatch)?;
        self.pc = if taken {
            target
        } else {
            self.pc.wrapping_add(BRANCH_LEN)
        };
        Ok(())
    }
}

// status flag changes
impl<M: ByteAccess> Six502<M> {
    pub(super) fn clc(&mut self) -> Exec {
        self.clear_flag(Status::CARRY);
        Ok(())
    }
    pub(super) fn sec(&mut self) -> Exec {
        self.set_flag(Status::CARRY);
        Ok(())
    }
    pub(super) fn cli(&mut self) -> Exec {
        self.clear_flag(Status::IRQ);
        Ok(())
    }
    pub(super) fn sei(&mut self) -> Exec {
        self.set_flag(Status::IRQ);
        Ok(())
    }
    pub(super) fn clv(&mut self) -> Exec {
        self.clear_flag(Status::OVERFLOW);
        Ok(())
    }
    pub(super) fn cld(&mut self) -> Exec {
        self.clear_flag(Status::DECIMAL);
        Ok(())
    }
    pub(super) fn sed(&mut self) -> Exec {
        self.set_flag(Status::DECIMAL);
        Ok(())
    }

    pub(super) fn nop(&self) -> Exec {
        Ok(())
    }
}
