//! |   |   |   |   |   |   |   |   |
//! | N | V | R | B | D | I | Z | C |     PROCESSOR STATUS REGISTER
//! |   |   |   |   |   |   |   |   |
//! |   |   |   |   |   |   |   |
//! |   |   |   |   |   |   |   +------ CARRY
//! |   |   |   |   |   |   |
//! |   |   |   |   |   |   +---------- ZERO RESULT
//! |   |   |   |   |   |
//! |   |   |   |   |   +-------------- INTERRUPT DISABLE
//! |   |   |   |   |
//! |   |   |   |   +------------------ DECIMAL MODE
//! |   |   |   |
//! |   |   |   +---------------------- BREAK COMMAND
//! |   |   |
//! |   |   +-------------------------- RESERVED (always reads as 1)
//! |   |
//! |   +------------------------------ OVERFLOW
//! |
//! +---------------------------------- NEGATIVE RESULT
//! http://users.telenet.be/kim1-6502/6502/proman.html#3

bitflags::bitflags! {
    pub struct Status: u8 {
        /// the ninth bit of arithmetic, shifts and rotates. `sec` sets it, `clc` resets it.
        /// in `sbc` and the compares its complement indicates a borrow.
        const CARRY = 1 << 0;

        /// set when the 8 bit result of a data movement or calculation is 0
        const ZERO = 1 << 1;

        /// masks the interrupt request line. set by `sei` and `brk`, reset by `cli`
        const IRQ = 1 << 2;

        /// selects decimal arithmetic in the adder. only stored here, the adder always works in binary
        const DECIMAL = 1 << 3;

        /// only exists on the copy of the status pushed by `brk`/`php`
        const BREAK = 1 << 4;

        /// expansion bit
        const UNUSED = 1 << 5;

        /// set when a signed add or subtract changes the sign bit wrongly, i.e. the result does not fit in 7 bits.
        /// `bit` copies bit 6 of the operand in here
        const OVERFLOW = 1 << 6;

        /// equal to bit 7 of the result of every data movement and arithmetic op
        const NEGATIVE = 1 << 7;
    }
}

impl Default for Status {
    // the reserved bit is hardwired high
    fn default() -> Self {
        Status::UNUSED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_only_has_reserved_bit() {
        assert_eq!(Status::default().bits(), 0b0010_0000);
    }

    #[test]
    fn serializes_in_hardware_bit_order() {
        let p = Status::NEGATIVE | Status::OVERFLOW | Status::CARRY;
        assert_eq!(p.bits(), 0b1100_0001);
        assert_eq!(Status::from_bits_truncate(0x24), Status::UNUSED | Status::IRQ);
    }
}
