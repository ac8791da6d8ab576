//! Assemble, load and run.

use six502::asm::assemble;
use six502::display::TextDisplay;
use six502::six502::{disassemble, Ram, Six502};
use six502::system::{Config, Halt, System};
use six502::AsmError;

fn load(src: &str, origin: u16) -> Six502 {
    let prog = assemble(src, origin).unwrap();
    let mut ram = Ram::new();
    prog.load_into(&mut ram);
    Six502::new(ram, origin)
}

#[test]
fn test_demo_program_bytes() {
    let prog = assemble("start: LDA #1\nINX\nINY\nJMP start\n", 1024).unwrap();
    assert_eq!(prog.base(), 1024);
    assert_eq!(prog.bytes(), &[0xa9, 0x01, 0xe8, 0xc8, 0x4c, 0x00, 0x04]);
}

#[test]
fn test_countdown_runs_to_breakpoint() {
    let src = "
        LDX #10
loop:   DEX
        BNE loop
done:   NOP
";
    let cpu = load(src, 0x0600);
    let config = Config {
        breakpoint: Some(0x0605),
        max_ticks: Some(1000),
        ..Config::default()
    };
    let mut sys = System::new(cpu, config, std::io::sink());
    assert_eq!(sys.run().unwrap(), Halt::Breakpoint(0x0605));
    assert_eq!(sys.cpu().x(), 0);
    // LDX, then 10 DEX and 10 BNE
    assert_eq!(sys.ticks(), 21);
}

#[test]
fn test_hello_on_display() {
    let src = "
        LDX #0
next:   LDA text,X
        BEQ done
        STA $4000,X
        INX
        JMP next
done:   BRK
text:   .byte $48, $45, $4C, $4C, $4F, 0
";
    let cpu = load(src, 0x0400);
    let config = Config {
        breakpoint: Some(0x040E),
        max_ticks: Some(200),
        display: Some(TextDisplay::new(0x4000, 5, 1)),
        refresh_every: 0,
        ..Config::default()
    };
    let mut sys = System::new(cpu, config, Vec::new());
    assert_eq!(sys.run().unwrap(), Halt::Breakpoint(0x040E));
    let (_, out) = sys.into_parts();
    assert_eq!(String::from_utf8(out).unwrap(), "HELLO\n\n");
}

#[test]
fn test_disassembly_matches_source() {
    let src = "LDA #$01\nSTA $0400,X\nLDA ($20),Y\nASL A\nJMP ($FFFC)\nloop: BNE loop";
    let prog = assemble(src, 0x0400).unwrap();
    let mut ram = Ram::new();
    prog.load_into(&mut ram);

    let lines: Vec<String> = disassemble(&ram, 0x0400, 6)
        .iter()
        .map(|i| i.to_string())
        .collect();
    assert_eq!(
        lines,
        vec![
            "LDA #$01",
            "STA $0400,X",
            "LDA ($20),Y",
            "ASL A",
            "JMP ($FFFC)",
            "BNE $040B",
        ]
    );
}

#[test]
fn test_error_reports_line() {
    let err = assemble("NOP\n\nLDA ($20,Y)\n", 0).unwrap_err();
    assert!(matches!(err, AsmError::Syntax { line: 3, .. }));
    assert!(err.to_string().starts_with("line 3:"));
}
