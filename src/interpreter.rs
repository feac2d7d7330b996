use std::convert::TryFrom;

use log::{debug, error, trace, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    display::{Display, DISPLAY_HEIGHT, DISPLAY_WIDTH},
    error::{Error, Fault},
    keyboard::{Keyboard, KEY_COUNT},
    memory::{Memory, MEMORY_SIZE, START_ROM},
    opcode::{Instruction, Opcode},
    registers::Registers,
    stack::Stack,
    timers::Timers,
    Result,
};

/// What the machine is doing between two calls to [`Interpreter::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Fx0A is waiting for a key that was not already held when the wait began.
    AwaitingKey {
        register: usize,
        held: [bool; KEY_COUNT],
    },
    /// A fatal fault stopped the machine; only [`Interpreter::reset`] or
    /// [`Interpreter::load`] bring it back.
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Executed(Instruction),
    /// A pending Fx0A completed with this key.
    KeyPressed(u8),
    AwaitingKey,
    Halted,
}

/// Where the program counter goes once an instruction has executed.
enum Flow {
    Next,
    Skip,
    Jump(u16),
}

pub struct Interpreter {
    registers: Registers,
    stack: Stack,
    memory: Memory,
    display: Display,
    keyboard: Keyboard,
    timers: Timers,
    state: RunState,
    redraw: bool,
    rng: ChaCha8Rng,
}

impl Interpreter {
    /// An empty machine whose random source is seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// An empty machine whose RND instruction yields the same sequence on every run.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rom(bytes: &[u8]) -> Result<Self> {
        let mut interpreter = Self::new();
        interpreter.load(bytes)?;

        Ok(interpreter)
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Interpreter {
            registers: Registers::new(),
            stack: Stack::new(),
            memory: Memory::new(),
            display: Display::new(),
            keyboard: Keyboard::new(),
            timers: Timers::new(),
            state: RunState::Running,
            redraw: true,
            rng,
        }
    }

    /// Loads a program image at 0x200 and resets the machine to run it.
    pub fn load(&mut self, bytes: &[u8]) -> Result<()> {
        self.memory.load_rom(bytes)?;
        debug!("Loaded {} byte program", bytes.len());

        self.reset();

        Ok(())
    }

    /// Puts the machine back into its power-on state, keeping the loaded program.
    pub fn reset(&mut self) {
        self.registers = Registers::new();
        self.stack = Stack::new();
        self.timers = Timers::new();
        self.display.clear();
        self.state = RunState::Running;
        self.redraw = true;

        debug!("Reset, pc at {:#05X}", self.registers.pc);
    }

    /// Runs one fetch-decode-execute cycle.
    ///
    /// Unknown opcodes are skipped and reported as a non-fatal error; any other error halts the
    /// machine. While an Fx0A is pending no instruction runs, the keyboard is polled instead.
    pub fn step(&mut self) -> Result<StepOutcome> {
        match self.state {
            RunState::Running => {}
            RunState::AwaitingKey { register, held } => return Ok(self.poll_key(register, held)),
            RunState::Halted => return Ok(StepOutcome::Halted),
        }

        let pc = self.registers.pc;
        let opcode = match self.fetch(pc) {
            Ok(opcode) => opcode,
            Err(err) => {
                error!("Halting: {}", err);
                self.state = RunState::Halted;
                return Err(err);
            }
        };

        let executed = Instruction::try_from(opcode)
            .and_then(|instruction| self.execute(instruction).map(|flow| (instruction, flow)));

        match executed {
            Ok((instruction, flow)) => {
                trace!("{:#05X} {} {:?}", pc, opcode, instruction);

                self.registers.pc = match flow {
                    Flow::Next => pc + 2,
                    Flow::Skip => pc + 4,
                    Flow::Jump(address) => address,
                };

                Ok(StepOutcome::Executed(instruction))
            }
            Err(fault) => {
                let err = Error::Cycle {
                    pc,
                    opcode: opcode.0,
                    fault,
                };

                if fault.is_fatal() {
                    error!("Halting: {}", err);
                    self.state = RunState::Halted;
                } else {
                    warn!("Skipping: {}", err);
                    self.registers.pc = pc + 2;
                }

                Err(err)
            }
        }
    }

    /// Decrements both timers; call at 60Hz.
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    /// Abandons a pending Fx0A without writing its register.
    pub fn cancel_key_wait(&mut self) {
        if let RunState::AwaitingKey { .. } = self.state {
            debug!("Key wait cancelled");
            self.state = RunState::Running;
        }
    }

    /// Returns `true` once after every change to the display.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }

    pub fn sound_active(&self) -> bool {
        self.timers.sound_active()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    fn fetch(&self, pc: u16) -> Result<Opcode> {
        let address = usize::from(pc);
        if address < START_ROM || address % 2 != 0 || address + 1 >= MEMORY_SIZE {
            return Err(Error::Fetch { pc });
        }

        Ok(Opcode::from_bytes(self.memory.0[address], self.memory.0[address + 1]))
    }

    fn poll_key(&mut self, register: usize, mut held: [bool; KEY_COUNT]) -> StepOutcome {
        let keys = self.keyboard.state();

        // A held key that is let go may complete the wait when pressed again.
        for (held, pressed) in held.iter_mut().zip(keys.iter()) {
            *held &= *pressed;
        }

        match (0..KEY_COUNT).find(|&key| keys[key] && !held[key]) {
            Some(key) => {
                debug!("Key {:X} pressed, stored in V{:X}", key, register);
                self.registers.v[register] = key as u8;
                self.state = RunState::Running;

                StepOutcome::KeyPressed(key as u8)
            }
            None => {
                self.state = RunState::AwaitingKey { register, held };

                StepOutcome::AwaitingKey
            }
        }
    }

    fn execute(&mut self, instruction: Instruction) -> std::result::Result<Flow, Fault> {
        let v = &mut self.registers.v;

        let flow = match instruction {
            // Machine code routines of the original hardware are not supported.
            Instruction::Sys(_) => Flow::Next,
            Instruction::Clear => {
                self.display.clear();
                self.redraw = true;
                Flow::Next
            }
            Instruction::Return => Flow::Jump(self.stack.pop()?),
            Instruction::Jump(address) => Flow::Jump(address),
            Instruction::Call(address) => {
                self.stack.push(self.registers.pc + 2)?;
                Flow::Jump(address)
            }
            Instruction::SkipIfEqualImmediate(x, k) => skip_if(v[x] == k),
            Instruction::SkipIfNotEqualImmediate(x, k) => skip_if(v[x] != k),
            Instruction::SkipIfEqualRegister(x, y) => skip_if(v[x] == v[y]),
            Instruction::LoadImmediate(x, k) => {
                v[x] = k;
                Flow::Next
            }
            Instruction::AddImmediate(x, k) => {
                v[x] = v[x].wrapping_add(k);
                Flow::Next
            }
            Instruction::Move(x, y) => {
                v[x] = v[y];
                Flow::Next
            }
            Instruction::Or(x, y) => {
                v[x] |= v[y];
                Flow::Next
            }
            Instruction::And(x, y) => {
                v[x] &= v[y];
                Flow::Next
            }
            Instruction::Xor(x, y) => {
                v[x] ^= v[y];
                Flow::Next
            }
            Instruction::Add(x, y) => {
                let (result, carry) = v[x].overflowing_add(v[y]);
                v[x] = result;
                self.registers.set_flag(carry);
                Flow::Next
            }
            Instruction::Sub(x, y) => {
                let (a, b) = (v[x], v[y]);
                v[x] = a.wrapping_sub(b);
                self.registers.set_flag(a >= b);
                Flow::Next
            }
            Instruction::ShiftRight(x) => {
                let a = v[x];
                v[x] = a >> 1;
                self.registers.set_flag(a & 0b0000_0001 != 0);
                Flow::Next
            }
            Instruction::SubNegated(x, y) => {
                let (a, b) = (v[x], v[y]);
                v[x] = b.wrapping_sub(a);
                self.registers.set_flag(b > a);
                Flow::Next
            }
            Instruction::ShiftLeft(x) => {
                let a = v[x];
                v[x] = a << 1;
                self.registers.set_flag(a & 0b1000_0000 != 0);
                Flow::Next
            }
            Instruction::SkipIfNotEqualRegister(x, y) => skip_if(v[x] != v[y]),
            Instruction::LoadIndex(address) => {
                self.registers.i = address;
                Flow::Next
            }
            Instruction::JumpOffset(address) => Flow::Jump(u16::from(v[0]) + address),
            Instruction::Random(x, k) => {
                v[x] = self.rng.gen::<u8>() & k;
                Flow::Next
            }
            Instruction::Draw(x, y, n) => {
                let (col, row) = (usize::from(v[x]) % DISPLAY_WIDTH, usize::from(v[y]) % DISPLAY_HEIGHT);
                let sprite = self.memory.slice(usize::from(self.registers.i), usize::from(n))?;

                let collision = self.display.draw_sprite(col, row, sprite);
                self.registers.set_flag(collision);
                self.redraw = true;
                Flow::Next
            }
            Instruction::SkipIfPressed(x) => skip_if(self.keyboard.is_pressed(v[x])),
            Instruction::SkipIfNotPressed(x) => skip_if(!self.keyboard.is_pressed(v[x])),
            Instruction::LoadDelay(x) => {
                v[x] = self.timers.delay;
                Flow::Next
            }
            Instruction::WaitKey(x) => {
                debug!("Waiting for a key for V{:X}", x);
                self.state = RunState::AwaitingKey {
                    register: x,
                    held: self.keyboard.state(),
                };
                Flow::Next
            }
            Instruction::SetDelay(x) => {
                self.timers.delay = v[x];
                Flow::Next
            }
            Instruction::SetSound(x) => {
                self.timers.sound = v[x];
                Flow::Next
            }
            Instruction::AddIndex(x) => {
                self.registers.i = self.registers.i.wrapping_add(u16::from(v[x]));
                Flow::Next
            }
            Instruction::LoadGlyph(x) => {
                self.registers.i = Memory::glyph_address(v[x]);
                Flow::Next
            }
            Instruction::StoreBcd(x) => {
                let value = v[x];
                let digits = [value / 100, value / 10 % 10, value % 10];
                self.memory.store(usize::from(self.registers.i), &digits)?;
                Flow::Next
            }
            Instruction::StoreRegisters(x) => {
                self.memory.store(usize::from(self.registers.i), &v[..=x])?;
                Flow::Next
            }
            Instruction::LoadRegisters(x) => {
                let bytes = self.memory.slice(usize::from(self.registers.i), x + 1)?;
                v[..=x].copy_from_slice(bytes);
                Flow::Next
            }
        };

        Ok(flow)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn skip_if(condition: bool) -> Flow {
    if condition {
        Flow::Skip
    } else {
        Flow::Next
    }
}
