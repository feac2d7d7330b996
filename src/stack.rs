use crate::error::Fault;

pub const STACK_DEPTH: usize = 16;

/// The stack is an array of 16 16-bit values, used to store the address that the interpreter
/// should return to when finished with a subroutine. Chip-8 allows for up to 16 levels of
/// nested subroutines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    slots: [u16; STACK_DEPTH],
    /// Number of occupied slots; the next push lands at `slots[sp]`.
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            slots: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn push(&mut self, address: u16) -> Result<(), Fault> {
        let slot = self.slots.get_mut(self.sp).ok_or(Fault::StackOverflow)?;
        *slot = address;
        self.sp += 1;

        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow);
        }

        self.sp -= 1;
        Ok(self.slots[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
