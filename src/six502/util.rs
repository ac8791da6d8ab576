use super::{Six502, Status};
use crate::bus::ByteAccess;

// the stack lives in page 1 and grows downwards
const STACK_OFFSET: u16 = 0x0100;

impl<M: ByteAccess> Six502<M> {
    // stack helpers

    pub(super) fn push_u8(&mut self, b: u8) {
        let addr = STACK_OFFSET | self.s as u16;
        self.store_u8(addr, b);
        self.s = self.s.wrapping_sub(1);
    }

    pub(super) fn pull_u8(&mut self) -> u8 {
        self.s = self.s.wrapping_add(1);
        self.load_u8(STACK_OFFSET | self.s as u16)
    }

    // high byte goes first so the word sits little-endian in memory
    pub(super) fn push_u16(&mut self, w: u16) {
        let [lo, hi] = w.to_le_bytes();
        self.push_u8(hi);
        self.push_u8(lo);
    }

    pub(super) fn pull_u16(&mut self) -> u16 {
        let lo = self.pull_u8();
        let hi = self.pull_u8();
        u16::from_le_bytes([lo, hi])
    }

    // flag helpers
    pub(super) fn set_flag(&mut self, flag: Status) {
        self.p.insert(flag);
    }

    pub(super) fn clear_flag(&mut self, flag: Status) {
        self.p.remove(flag);
    }

    // assert_flag is different from set_flag in the sense that if the operation fails to fulfil a condition for changing the flag
    // the flag in question is reset, so that every op that affects a flag leaves it up to date
    pub(super) fn assert_flag(&mut self, flag: Status, cond: bool) {
        self.p.set(flag, cond);
    }

    pub(super) fn is_flag_set(&self, flag: Status) -> bool {
        self.p.contains(flag)
    }

    /// The zero flag is set if the result is 0, the negative flag mirrors bit 7 of the result
    pub(super) fn update_zn(&mut self, v: u8) {
        self.assert_flag(Status::ZERO, v == 0);
        self.assert_flag(Status::NEGATIVE, v & 0x80 != 0);
    }
}

/// the overflow flag, used to indicate when a carry from 7 bits has occurred.
/// in signed arithmetic bit 7 is the sign, so the overflow flag is set whenever the sign bit is changed wrongly as a result of the operation.
/// ```text
/// 0100 + 0100 = 1000 => overflow flag is turned on.
/// 1000 + 1000 = 0000 => overflow flag is turned on.
/// ```
/// Mixed-sign addition never turns on the overflow flag.
pub(super) fn check_overflow(a: u8, b: u8, res: u8) -> bool {
    // both operands have the same sign and the result has the other one
    (a ^ res) & (b ^ res) & 0x80 != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::six502::Ram;

    #[test]
    fn stack_grows_down_in_page_one() {
        let mut cpu = Six502::new(Ram::new(), 0);
        assert_eq!(cpu.sp(), 0xfd);
        cpu.push_u8(0xab);
        assert_eq!(cpu.sp(), 0xfc);
        assert_eq!(cpu.read(0x01fd), 0xab);
        assert_eq!(cpu.pull_u8(), 0xab);
        assert_eq!(cpu.sp(), 0xfd);
    }

    #[test]
    fn words_round_trip_through_the_stack() {
        let mut cpu = Six502::new(Ram::new(), 0);
        cpu.push_u16(0x1234);
        assert_eq!(cpu.read(0x01fd), 0x12);
        assert_eq!(cpu.read(0x01fc), 0x34);
        assert_eq!(cpu.pull_u16(), 0x1234);
    }

    #[test]
    fn stack_pointer_wraps() {
        let mut cpu = Six502::new(Ram::new(), 0);
        cpu.s = 0x00;
        cpu.push_u8(0x01);
        assert_eq!(cpu.sp(), 0xff);
        assert_eq!(cpu.read(0x0100), 0x01);
    }

    #[test]
    fn overflow_only_on_same_sign_operands() {
        assert!(check_overflow(0x40, 0x40, 0x80));
        assert!(check_overflow(0x80, 0x80, 0x00));
        assert!(!check_overflow(0x40, 0xc0, 0x00));
        assert!(!check_overflow(0x01, 0x01, 0x02));
    }
}
