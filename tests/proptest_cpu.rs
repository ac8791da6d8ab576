//! Property tests for cpu invariants.

use proptest::prelude::*;
use six502::six502::{decode, AddressingMode, Operand, Ram, Six502};
use six502::{ByteAccess, CpuError};

fn setup_cpu(base: u16, prog: &[u8]) -> Six502 {
    let mut memory = Ram::new();
    for (i, b) in prog.iter().enumerate() {
        memory.store_u8(base.wrapping_add(i as u16), *b);
    }
    Six502::new(memory, base)
}

/// every byte the decode table knows
fn known_opcodes() -> Vec<u8> {
    (0..=255u8).filter(|b| decode(*b).is_some()).collect()
}

fn unknown_opcodes() -> Vec<u8> {
    (0..=255u8).filter(|b| decode(*b).is_none()).collect()
}

proptest! {
    #[test]
    fn lda_immediate_sets_a_and_flags(v: u8) {
        let mut cpu = setup_cpu(0x0400, &[0xa9, v]);
        cpu.tick().unwrap();
        prop_assert_eq!(cpu.a(), v);
        prop_assert_eq!(cpu.zero(), v == 0);
        prop_assert_eq!(cpu.negative(), v & 0x80 != 0);
        prop_assert_eq!(cpu.pc(), 0x0402);
    }

    #[test]
    fn inx_and_dex_wrap(x: u8) {
        // LDX #x; INX; LDX #x; DEX
        let mut cpu = setup_cpu(0x0400, &[0xa2, x, 0xe8, 0xa2, x, 0xca]);
        cpu.tick().unwrap();
        cpu.tick().unwrap();
        prop_assert_eq!(cpu.x(), x.wrapping_add(1));
        prop_assert_eq!(cpu.zero(), x == 0xff);
        cpu.tick().unwrap();
        cpu.tick().unwrap();
        prop_assert_eq!(cpu.x(), x.wrapping_sub(1));
        prop_assert_eq!(cpu.zero(), x == 0x01);
    }

    #[test]
    fn sta_then_lda_round_trips(v: u8, addr: u16) {
        prop_assume!(!(0x0400..0x040a).contains(&addr));
        let [lo, hi] = addr.to_le_bytes();
        // LDA #v; STA addr; LDA #0; LDA addr
        let prog = [0xa9, v, 0x8d, lo, hi, 0xa9, 0x00, 0xad, lo, hi];
        let mut cpu = setup_cpu(0x0400, &prog);
        for _ in 0..4 {
            cpu.tick().unwrap();
        }
        prop_assert_eq!(cpu.a(), v);
        prop_assert_eq!(cpu.read(addr), v);
    }

    #[test]
    fn jmp_lands_exactly_on_target(start in 0u16..0xfffe, target: u16) {
        let [lo, hi] = target.to_le_bytes();
        let mut cpu = setup_cpu(start, &[0x4c, lo, hi]);
        prop_assert_eq!(cpu.tick(), Ok(()));
        prop_assert_eq!(cpu.pc(), target);
    }

    #[test]
    fn zero_page_x_wraps_in_page_zero(base: u8, x: u8) {
        // LDX #x, then a ZeroPageX operand byte at $0402
        let mut cpu = setup_cpu(0x0400, &[0xa2, x, 0xb5, base]);
        cpu.tick().unwrap();
        let expected = base.wrapping_add(x) as u16;
        prop_assert_eq!(cpu.resolve(AddressingMode::ZeroPageX, 0x0402), Operand::Address(expected));
    }

    #[test]
    fn auto_advancing_opcodes_move_pc_by_length(
        idx in 0usize..153,
        b1: u8,
        b2: u8,
    ) {
        let opcodes = known_opcodes();
        let opcode = opcodes[idx % opcodes.len()];
        let entry = decode(opcode).unwrap();
        prop_assume!(entry.auto_advance);

        let mut cpu = setup_cpu(0x0400, &[opcode, b1, b2]);
        prop_assert_eq!(cpu.tick(), Ok(()));
        prop_assert_eq!(cpu.pc(), 0x0400 + entry.len as u16);
        prop_assert_eq!(cpu.cycles(), entry.cycles as u64);
    }

    #[test]
    fn unknown_opcodes_never_mutate(idx: usize, a: u8) {
        let opcodes = unknown_opcodes();
        let opcode = opcodes[idx % opcodes.len()];
        // LDA #a, then the unknown byte
        let mut cpu = setup_cpu(0x0400, &[0xa9, a, opcode]);
        cpu.tick().unwrap();
        let status = cpu.status();

        prop_assert_eq!(
            cpu.tick(),
            Err(CpuError::UnknownOpcode { opcode, addr: 0x0402 })
        );
        prop_assert_eq!(cpu.a(), a);
        prop_assert_eq!(cpu.pc(), 0x0402);
        prop_assert_eq!(cpu.status(), status);
        prop_assert_eq!(cpu.cycles(), 2);
    }
}
