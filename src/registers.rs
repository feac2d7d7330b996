use crate::memory::START_ROM;

pub const FLAG: usize = 0xF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    /// Chip-8 has 16 general purpose 8-bit registers, usually referred to as Vx, where x is a hexadecimal digit (0 through F).
    /// The VF register should not be used by any program, as it is used as a flag by some instructions.
    pub v: [u8; 16],
    /// Stores memory addresses; only the lowest 12 bits are meaningful.
    pub i: u16,
    /// The program counter (PC) should be 16-bit, and is used to store the currently executing address.
    pub pc: u16,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; 16],
            i: 0,
            pc: START_ROM as u16,
        }
    }

    pub fn flag(&self) -> u8 {
        self.v[FLAG]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.v[FLAG] = set as u8;
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_at_rom() {
        let registers = Registers::new();

        assert_eq!(registers.pc, 0x200);
        assert_eq!(registers.i, 0);
        assert_eq!(registers.v, [0; 16]);
    }

    #[test]
    fn test_flag_is_vf() {
        let mut registers = Registers::new();

        registers.set_flag(true);
        assert_eq!(registers.v[0xF], 1);

        registers.set_flag(false);
        assert_eq!(registers.flag(), 0);
    }
}
