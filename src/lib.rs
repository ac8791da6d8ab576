//! An emulator for the 6502 family of 8-bit processors, plus the pieces needed
//! to feed it programs and watch them run: a loader, an assembler, a text
//! display over a window of memory and a driver that ties them together.

mod macros;

pub mod asm;
pub mod bus;
pub mod display;
pub mod error;
pub mod prog;
pub mod six502;
pub mod system;

pub use bus::{ByteAccess, WordAccess};
pub use error::{AsmError, CpuError, LoadError};
pub use six502::{Ram, Six502};
