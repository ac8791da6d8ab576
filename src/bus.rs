/// ByteAccess handles the loading and storage of u8 values. An implementor is an addressable memory the cpu is wired to.
/// The address space can be regarded as 256 pages (each page defined by the high order byte) of 256 locations per page.
/// Every u16 is a valid address: implementors must never fail a load or a store.
pub trait ByteAccess {
    fn load_u8(&self, addr: u16) -> u8;
    fn store_u8(&mut self, addr: u16, v: u8);
}

pub trait WordAccess {
    fn load_u16(&self, addr: u16) -> u16;
    fn store_u16(&mut self, addr: u16, v: u16);
    /// loads a pointer out of the zero page. the high byte wraps to $00 instead of carrying into page 1
    fn load_u16_zp(&self, addr: u8) -> u16;
}

// blanket implementation of Word Access for every item that implements `ByteAccess`
impl<T: ByteAccess + ?Sized> WordAccess for T {
    // 6502 arranges integers in little-endian order. lower bytes first
    fn load_u16(&self, addr: u16) -> u16 {
        u16::from_le_bytes([self.load_u8(addr), self.load_u8(addr.wrapping_add(1))])
    }

    fn store_u16(&mut self, addr: u16, v: u16) {
        let [lo, hi] = v.to_le_bytes();
        self.store_u8(addr, lo);
        self.store_u8(addr.wrapping_add(1), hi);
    }

    fn load_u16_zp(&self, addr: u8) -> u16 {
        u16::from_le_bytes([
            self.load_u8(addr as u16),
            self.load_u8(addr.wrapping_add(1) as u16),
        ])
    }
}
