use crate::error::{Error, Fault};

pub const MEMORY_SIZE: usize = 4096;
pub const START_ROM: usize = 0x200;
pub const ROM_SIZE: usize = MEMORY_SIZE - START_ROM;

pub const FONT_START: usize = 0x000;
pub const GLYPH_SIZE: usize = 5;

const FONT_DATA: &[u8] = &[
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Chip-8 has 4KB of RAM, from 0x000 to 0xFFF. The first 512 bytes belong to the
/// interpreter and hold the built-in font; programs start at 0x200.
#[derive(Debug, Clone)]
pub struct Memory(pub(crate) [u8; MEMORY_SIZE]);

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[FONT_START..FONT_START + FONT_DATA.len()].copy_from_slice(FONT_DATA);

        Memory(bytes)
    }

    /// Copies `bytes` verbatim to 0x200, zeroing whatever a previous program left behind.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let rom_size = bytes.len();
        if rom_size > ROM_SIZE {
            return Err(Error::ProgramLoad {
                size: rom_size,
                max: ROM_SIZE,
            });
        }

        self.0[START_ROM..].iter_mut().for_each(|b| *b = 0);
        self.0[START_ROM..START_ROM + rom_size].copy_from_slice(bytes);

        Ok(())
    }

    /// Returns `len` bytes starting at `address`.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8], Fault> {
        let end = address + len;
        if end > MEMORY_SIZE {
            return Err(Fault::AddressOutOfRange(address.max(MEMORY_SIZE)));
        }

        Ok(&self.0[address..end])
    }

    /// Writes `bytes` starting at `address`. The interpreter area below 0x200 is read-only
    /// to programs.
    pub fn store(&mut self, address: usize, bytes: &[u8]) -> Result<(), Fault> {
        if address < START_ROM {
            return Err(Fault::AddressOutOfRange(address));
        }

        let end = address + bytes.len();
        if end > MEMORY_SIZE {
            return Err(Fault::AddressOutOfRange(address.max(MEMORY_SIZE)));
        }

        self.0[address..end].copy_from_slice(bytes);

        Ok(())
    }

    /// Address of the glyph for the hexadecimal digit in the low nibble of `digit`.
    pub fn glyph_address(digit: u8) -> u16 {
        (FONT_START + usize::from(digit & 0xF) * GLYPH_SIZE) as u16
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_ok};
    use fake::{Dummy, Fake, Faker};
    use quickcheck::Arbitrary;
    use quickcheck_macros::quickcheck;
    use rand::{rngs::StdRng, SeedableRng};

    #[derive(Debug, Clone, Dummy)]
    struct RomFixture {
        #[dummy(faker = "(Faker, 1..3584)")]
        bytes: Vec<u8>,
    }

    impl Arbitrary for RomFixture {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let mut rng = StdRng::seed_from_u64(u64::arbitrary(g));

            Faker.fake_with_rng(&mut rng)
        }
    }

    #[quickcheck]
    fn test_load_rom(rom: RomFixture) {
        let num_bytes = rom.bytes.len();

        let mut memory = Memory::new();
        assert_ok!(memory.load_rom(&rom.bytes));

        assert_eq!(memory.0[START_ROM..START_ROM + num_bytes], rom.bytes);
        assert!(memory.0[START_ROM + num_bytes..].iter().all(|b| *b == 0));
        assert_eq!(memory.0[..FONT_DATA.len()], *FONT_DATA);
    }

    #[test]
    fn test_load_rom_too_large() {
        let mut memory = Memory::new();
        let rom = vec![0xAA; ROM_SIZE + 1];

        let err = assert_err!(memory.load_rom(&rom));

        assert_eq!(
            err,
            Error::ProgramLoad {
                size: ROM_SIZE + 1,
                max: ROM_SIZE
            }
        );
    }

    #[test]
    fn test_load_rom_fills_memory() {
        let mut memory = Memory::new();
        let rom = vec![0xAA; ROM_SIZE];

        assert_ok!(memory.load_rom(&rom));
        assert_eq!(memory.0[MEMORY_SIZE - 1], 0xAA);
    }

    #[test]
    fn test_load_rom_clears_previous_program() {
        let mut memory = Memory::new();

        assert_ok!(memory.load_rom(&[1, 2, 3, 4]));
        assert_ok!(memory.load_rom(&[5]));

        assert_eq!(memory.0[START_ROM..START_ROM + 4], [5, 0, 0, 0]);
    }

    #[test]
    fn test_slice_bounds() {
        let memory = Memory::new();

        assert_eq!(assert_ok!(memory.slice(0xFFB, 5)).len(), 5);
        assert_eq!(memory.slice(0xFFC, 5), Err(Fault::AddressOutOfRange(0x1000)));
        assert_eq!(memory.slice(0x1005, 1), Err(Fault::AddressOutOfRange(0x1005)));
    }

    #[test]
    fn test_store_rejects_reserved_area() {
        let mut memory = Memory::new();

        assert_eq!(memory.store(0x1FF, &[1]), Err(Fault::AddressOutOfRange(0x1FF)));
        assert_eq!(memory.store(0xFFE, &[1, 2, 3]), Err(Fault::AddressOutOfRange(0x1000)));

        assert_ok!(memory.store(0x200, &[1, 2, 3]));
        assert_eq!(memory.0[0x200..0x203], [1, 2, 3]);
    }

    #[test]
    fn test_glyph_address() {
        let memory = Memory::new();

        for digit in 0..16u8 {
            let address = Memory::glyph_address(digit) as usize;
            let glyph = assert_ok!(memory.slice(address, GLYPH_SIZE));

            assert_eq!(glyph, &FONT_DATA[digit as usize * GLYPH_SIZE..(digit as usize + 1) * GLYPH_SIZE]);
        }

        assert_eq!(Memory::glyph_address(0x1A), Memory::glyph_address(0xA));
    }
}
