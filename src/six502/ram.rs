use crate::bus::ByteAccess;
use crate::macros::impl_deref_mut;
use std::{fmt, fs, io, path::Path};

/// size of the flat address space
pub const MEM_SIZE: usize = 0x10000;

/// 64K of flat ram. no mirroring and no mapped devices: index == address.
#[derive(Clone, PartialEq, Eq)]
pub struct Ram {
    array: Box<[u8]>,
}

impl_deref_mut!(Ram {array, [u8]});

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Ram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ram").field("len", &self.array.len()).finish()
    }
}

impl Ram {
    pub fn new() -> Self {
        Self {
            array: vec![0u8; MEM_SIZE].into_boxed_slice(),
        }
    }

    /// writes the whole address space out, byte for byte
    pub fn dump<T: AsRef<Path>>(&self, path: T) -> io::Result<()> {
        fs::write(path, &self.array)
    }
}

impl ByteAccess for Ram {
    fn load_u8(&self, addr: u16) -> u8 {
        self[addr as usize]
    }

    fn store_u8(&mut self, addr: u16, val: u8) {
        self[addr as usize] = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed_and_covers_every_address() {
        let mut ram = Ram::new();
        assert_eq!(ram.len(), MEM_SIZE);
        assert_eq!(ram.load_u8(0x0000), 0);
        assert_eq!(ram.load_u8(0xffff), 0);

        ram.store_u8(0xffff, 0xaa);
        ram.store_u8(0x0000, 0x55);
        assert_eq!(ram.load_u8(0xffff), 0xaa);
        assert_eq!(ram.load_u8(0x0000), 0x55);
    }

    #[test]
    fn no_mirroring() {
        let mut ram = Ram::new();
        ram.store_u8(0x0001, 0x42);
        assert_eq!(ram.load_u8(0x0801), 0);
        assert_eq!(ram.load_u8(0x0101), 0);
    }

    #[test]
    fn dump_writes_full_image() {
        let mut ram = Ram::new();
        ram.store_u8(0x1234, 0x99);
        let path = std::env::temp_dir().join(format!("six502-dump-{}.bin", std::process::id()));
        ram.dump(&path).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(bytes.len(), MEM_SIZE);
        assert_eq!(bytes[0x1234], 0x99);
    }
}
