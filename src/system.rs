use crate::bus::ByteAccess;
use crate::display::TextDisplay;
use crate::error::CpuError;
use crate::six502::{Ram, Six502};
use std::io::{self, Write};
use std::{thread, time::Duration};
use tracing::{debug, info, warn};

/// what to do when the cpu reports a byte it cannot decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum UnknownOpcodePolicy {
    /// stop the run and report the byte
    #[default]
    Halt,
    /// step over the byte as if it were a one byte no-op
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// stop after this many ticks
    pub max_ticks: Option<u64>,
    /// stop as soon as an instruction leaves pc here
    pub breakpoint: Option<u16>,
    pub on_unknown: UnknownOpcodePolicy,
    pub display: Option<TextDisplay>,
    /// redraw the display every n ticks. 0 draws only the final frame
    pub refresh_every: u64,
    /// real time pause after every tick
    pub tick_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_ticks: None,
            breakpoint: None,
            on_unknown: UnknownOpcodePolicy::Halt,
            display: None,
            refresh_every: 1,
            tick_delay: Duration::ZERO,
        }
    }
}

/// why `run` returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    TickLimit,
    Breakpoint(u16),
    UnknownOpcode { opcode: u8, addr: u16 },
    Fault(CpuError),
}

/// The machine around the cpu: it sequences ticks against display refreshes and pacing.
/// The display only ever reads memory between two ticks.
pub struct System<W, M = Ram> {
    cpu: Six502<M>,
    config: Config,
    out: W,
    ticks: u64,
}

impl<W: Write, M: ByteAccess> System<W, M> {
    pub fn new(cpu: Six502<M>, config: Config, out: W) -> Self {
        Self {
            cpu,
            config,
            out,
            ticks: 0,
        }
    }

    pub fn cpu(&self) -> &Six502<M> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Six502<M> {
        &mut self.cpu
    }

    /// ticks driven so far, skipped bytes included
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn into_parts(self) -> (Six502<M>, W) {
        (self.cpu, self.out)
    }

    /// one tick followed by whatever the driver does between ticks.
    /// `Some` means the run should stop
    pub fn step(&mut self) -> io::Result<Option<Halt>> {
        match self.cpu.tick() {
            Ok(()) => {}
            Err(CpuError::UnknownOpcode { opcode, addr }) => match self.config.on_unknown {
                UnknownOpcodePolicy::Halt => {
                    return Ok(Some(Halt::UnknownOpcode { opcode, addr }))
                }
                UnknownOpcodePolicy::Skip => {
                    warn!("skipping unknown opcode ${:02X} at ${:04X}", opcode, addr);
                    self.cpu.set_pc(addr.wrapping_add(1));
                }
            },
            Err(e) => return Ok(Some(Halt::Fault(e))),
        }
        self.ticks += 1;

        let every = self.config.refresh_every;
        if every > 0 && self.ticks % every == 0 {
            self.refresh()?;
        }
        if !self.config.tick_delay.is_zero() {
            thread::sleep(self.config.tick_delay);
        }

        match self.config.breakpoint {
            Some(bp) if self.cpu.pc() == bp => Ok(Some(Halt::Breakpoint(bp))),
            _ => Ok(None),
        }
    }

    /// Ticks until something stops the run. With neither a tick limit nor a breakpoint
    /// this only returns on an unknown opcode or a fault.
    pub fn run(&mut self) -> io::Result<Halt> {
        debug!("running from ${:04X}", self.cpu.pc());
        let halt = loop {
            if let Some(max) = self.config.max_ticks {
                if self.ticks >= max {
                    break Halt::TickLimit;
                }
            }
            if let Some(halt) = self.step()? {
                break halt;
            }
        };

        if self.config.refresh_every == 0 {
            self.refresh()?;
        }
        info!("halted after {} ticks: {:?}", self.ticks, halt);
        info!("{}", self.cpu);
        Ok(halt)
    }

    /// draws the display, if there is one
    pub fn refresh(&mut self) -> io::Result<()> {
        match self.config.display {
            Some(display) => display.render(&self.cpu, &mut self.out),
            None => Ok(()),
        }
    }
}
