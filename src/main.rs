use anyhow::{bail, Context, Result};
use clap::Parser;
use six502::asm::assemble;
use six502::display::TextDisplay;
use six502::prog::Program;
use six502::six502::{disassemble, Ram, Six502};
use six502::system::{Config, System, UnknownOpcodePolicy};
use std::{io, path::PathBuf, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEMO: &str = "\
start:  LDA #1
        INX
        INY
        JMP start
";

/// Run a 6502 program against a flat 64 KiB memory.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// raw program image, or assembly source with --asm. runs a built-in demo when omitted
    program: Option<PathBuf>,

    /// treat the program as assembly source
    #[arg(long)]
    asm: bool,

    /// address the program is loaded at
    #[arg(long, default_value = "0x0400", value_parser = parse_addr)]
    base: u16,

    /// address execution starts at. defaults to the load address
    #[arg(long, value_parser = parse_addr)]
    entry: Option<u16>,

    /// stop after this many instructions
    #[arg(long)]
    ticks: Option<u64>,

    /// stop when the program counter reaches this address
    #[arg(long, value_parser = parse_addr)]
    breakpoint: Option<u16>,

    #[arg(long, value_enum, default_value_t = UnknownOpcodePolicy::Halt)]
    on_unknown: UnknownOpcodePolicy,

    /// start of the text display window in memory
    #[arg(long, value_parser = parse_addr)]
    display: Option<u16>,

    #[arg(long, default_value_t = 40)]
    width: u16,

    #[arg(long, default_value_t = 2)]
    height: u16,

    /// redraw the display every n instructions. 0 draws once at the end
    #[arg(long, default_value_t = 1)]
    refresh: u64,

    /// pause after every instruction
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// print a listing of this many instructions from the entry point and exit
    #[arg(long)]
    disasm: Option<u16>,

    /// write the whole memory image here when the run stops
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn parse_addr(s: &str) -> Result<u16, String> {
    let r = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix('$')) {
        u16::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    r.map_err(|e| format!("invalid address `{}`: {}", s, e))
}

fn load(args: &Args) -> Result<Program> {
    let Some(path) = &args.program else {
        return Ok(assemble(DEMO, args.base)?);
    };
    if args.asm {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        assemble(&src, args.base).with_context(|| format!("assembling {}", path.display()))
    } else {
        Program::open(path, args.base).with_context(|| format!("loading {}", path.display()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.width == 0 || args.height == 0 {
        bail!("display must be at least 1x1");
    }

    let prog = load(&args)?;
    let mut ram = Ram::new();
    prog.load_into(&mut ram);
    let entry = args.entry.unwrap_or(prog.base());
    info!(
        "{} bytes at ${:04X}, entry ${:04X}",
        prog.len(),
        prog.base(),
        entry
    );

    if let Some(count) = args.disasm {
        for ins in disassemble(&ram, entry, count as usize) {
            println!("{:04X}  {}", ins.addr, ins);
        }
        return Ok(());
    }

    let config = Config {
        max_ticks: args.ticks,
        breakpoint: args.breakpoint,
        on_unknown: args.on_unknown,
        display: args
            .display
            .map(|start| TextDisplay::new(start, args.width, args.height)),
        refresh_every: args.refresh,
        tick_delay: Duration::from_millis(args.delay_ms),
    };
    let mut sys = System::new(Six502::new(ram, entry), config, io::stdout().lock());
    let halt = sys.run()?;
    println!("{:?}", halt);
    println!("{}", sys.cpu());

    if let Some(path) = &args.dump {
        sys.cpu()
            .memory()
            .dump(path)
            .with_context(|| format!("dumping memory to {}", path.display()))?;
        info!("memory written to {}", path.display());
    }
    Ok(())
}
