use crate::bus::ByteAccess;
use std::io::{self, Write};
use tracing::debug;

/// A character display. it owns nothing: every refresh reads a `width` x `height` window of memory, row-major, starting at `start`.
/// printable ascii is shown as is, everything else as a blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDisplay {
    pub start: u16,
    pub width: u16,
    pub height: u16,
}

impl TextDisplay {
    pub fn new(start: u16, width: u16, height: u16) -> Self {
        Self {
            start,
            width,
            height,
        }
    }

    /// the window wraps around the top of memory like every other access
    pub fn rows<B: ByteAccess + ?Sized>(&self, bus: &B) -> Vec<String> {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| {
                        let offset = (row as u32 * self.width as u32 + col as u32) as u16;
                        to_char(bus.load_u8(self.start.wrapping_add(offset)))
                    })
                    .collect()
            })
            .collect()
    }

    /// draws one frame followed by a blank line
    pub fn render<B: ByteAccess + ?Sized, W: Write>(&self, bus: &B, out: &mut W) -> io::Result<()> {
        for row in self.rows(bus) {
            writeln!(out, "{}", row)?;
        }
        writeln!(out)?;
        debug!("display refreshed from ${:04X}", self.start);
        Ok(())
    }
}

fn to_char(b: u8) -> char {
    if b == b' ' || b.is_ascii_graphic() {
        b as char
    } else {
        ' '
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::six502::Ram;

    fn ram_with_text(start: u16, text: &[u8]) -> Ram {
        let mut ram = Ram::new();
        for (i, b) in text.iter().enumerate() {
            ram.store_u8(start + i as u16, *b);
        }
        ram
    }

    #[test]
    fn rows_are_row_major() {
        let ram = ram_with_text(0x4000, b"ABCDEFGH");
        let d = TextDisplay::new(0x4000, 4, 2);
        assert_eq!(d.rows(&ram), vec!["ABCD".to_string(), "EFGH".to_string()]);
    }

    #[test]
    fn unprintable_bytes_are_blank() {
        let ram = ram_with_text(0x4000, &[b'H', 0x00, b'I', 0x7f, 0xc1]);
        let d = TextDisplay::new(0x4000, 5, 1);
        assert_eq!(d.rows(&ram), vec!["H I  ".to_string()]);
    }

    #[test]
    fn render_writes_a_frame() {
        let ram = ram_with_text(0x4000, b"HI!!");
        let d = TextDisplay::new(0x4000, 2, 2);
        let mut out = Vec::new();
        d.render(&ram, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "HI\n!!\n\n");
    }

    #[test]
    fn window_wraps_around_memory() {
        let mut ram = Ram::new();
        ram.store_u8(0xffff, b'Z');
        ram.store_u8(0x0000, b'A');
        let d = TextDisplay::new(0xffff, 2, 1);
        assert_eq!(d.rows(&ram), vec!["ZA".to_string()]);
    }
}
