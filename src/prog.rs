use crate::bus::ByteAccess;
use crate::error::LoadError;
use crate::six502::MEM_SIZE;
use std::{fs, path::Path};
use tracing::debug;

/// a flat program image. byte `i` lands at `base + i`, nothing is relocated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    base: u16,
    data: Vec<u8>,
}

impl Program {
    /// fails when the image would run past $FFFF
    pub fn new(base: u16, data: Vec<u8>) -> Result<Self, LoadError> {
        if base as usize + data.len() > MEM_SIZE {
            return Err(LoadError::TooLarge {
                base,
                len: data.len(),
            });
        }
        Ok(Self { base, data })
    }

    pub fn open<T: AsRef<Path>>(path: T, base: u16) -> Result<Self, LoadError> {
        let b = fs::read(path)?;
        Self::new(base, b)
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// copies the image into memory. everything outside it is left as it was
    pub fn load_into<B: ByteAccess + ?Sized>(&self, bus: &mut B) {
        for (i, b) in self.data.iter().enumerate() {
            // `new` guarantees base + i <= $FFFF
            bus.store_u8(self.base + i as u16, *b);
        }
        debug!("loaded {} bytes at ${:04X}", self.data.len(), self.base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::six502::Ram;

    #[test]
    fn loads_at_base() {
        let prog = Program::new(0x0400, vec![0xa9, 0x01, 0xe8]).unwrap();
        let mut ram = Ram::new();
        ram.store_u8(0x0403, 0x77);
        prog.load_into(&mut ram);
        assert_eq!(ram.load_u8(0x03ff), 0x00);
        assert_eq!(ram.load_u8(0x0400), 0xa9);
        assert_eq!(ram.load_u8(0x0402), 0xe8);
        assert_eq!(ram.load_u8(0x0403), 0x77);
        assert_eq!(prog.len(), 3);
    }

    #[test]
    fn image_may_end_on_last_byte() {
        let prog = Program::new(0xfffe, vec![1, 2]).unwrap();
        let mut ram = Ram::new();
        prog.load_into(&mut ram);
        assert_eq!(ram.load_u8(0xffff), 2);
    }

    #[test]
    fn rejects_images_past_end_of_memory() {
        let err = Program::new(0xffff, vec![1, 2]).unwrap_err();
        assert!(matches!(err, LoadError::TooLarge { base: 0xffff, len: 2 }));
        assert!(Program::new(0, vec![0; MEM_SIZE]).is_ok());
        assert!(Program::new(0, vec![0; MEM_SIZE + 1]).is_err());
    }

    #[test]
    fn open_reads_raw_bytes() {
        let path = std::env::temp_dir().join(format!("six502-prog-{}.bin", std::process::id()));
        fs::write(&path, [0xa9, 0x01]).unwrap();
        let prog = Program::open(&path, 0x0600).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(prog.base(), 0x0600);
        assert_eq!(prog.bytes(), &[0xa9, 0x01]);
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let err = Program::open("/nonexistent/six502/prog.bin", 0).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
