use std::convert::TryFrom;
use std::fmt;

use crate::error::Fault;

/// A raw 16-bit instruction word.
///
/// Every word splits into the same fields, whether or not the instruction uses them:
/// - `[c___]` opcode class
/// - `[_nnn]` address
/// - `[_x__]` register Vx
/// - `[__y_]` register Vy
/// - `[__kk]` immediate byte
/// - `[___n]` nibble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Opcode(u16::from_be_bytes([high, low]))
    }

    pub fn class(self) -> u8 {
        ((self.0 & 0xF000) >> 12) as u8
    }

    pub fn addr(self) -> u16 {
        self.0 & 0x0FFF
    }

    pub fn x(self) -> usize {
        ((self.0 & 0x0F00) >> 8) as usize
    }

    pub fn y(self) -> usize {
        ((self.0 & 0x00F0) >> 4) as usize
    }

    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// Every instruction the interpreter understands. Register operands are
/// indices in `0..16`, addresses are 12 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn - SYS addr
    Sys(u16),
    /// 00E0 - CLS
    Clear,
    /// 00EE - RET
    Return,
    /// 1nnn - JP addr
    Jump(u16),
    /// 2nnn - CALL addr
    Call(u16),
    /// 3xkk - SE Vx, byte
    SkipIfEqualImmediate(usize, u8),
    /// 4xkk - SNE Vx, byte
    SkipIfNotEqualImmediate(usize, u8),
    /// 5xy0 - SE Vx, Vy
    SkipIfEqualRegister(usize, usize),
    /// 6xkk - LD Vx, byte
    LoadImmediate(usize, u8),
    /// 7xkk - ADD Vx, byte
    AddImmediate(usize, u8),
    /// 8xy0 - LD Vx, Vy
    Move(usize, usize),
    /// 8xy1 - OR Vx, Vy
    Or(usize, usize),
    /// 8xy2 - AND Vx, Vy
    And(usize, usize),
    /// 8xy3 - XOR Vx, Vy
    Xor(usize, usize),
    /// 8xy4 - ADD Vx, Vy
    Add(usize, usize),
    /// 8xy5 - SUB Vx, Vy
    Sub(usize, usize),
    /// 8xy6 - SHR Vx {, Vy}
    ShiftRight(usize),
    /// 8xy7 - SUBN Vx, Vy
    SubNegated(usize, usize),
    /// 8xyE - SHL Vx {, Vy}
    ShiftLeft(usize),
    /// 9xy0 - SNE Vx, Vy
    SkipIfNotEqualRegister(usize, usize),
    /// Annn - LD I, addr
    LoadIndex(u16),
    /// Bnnn - JP V0, addr
    JumpOffset(u16),
    /// Cxkk - RND Vx, byte
    Random(usize, u8),
    /// Dxyn - DRW Vx, Vy, nibble
    Draw(usize, usize, u8),
    /// Ex9E - SKP Vx
    SkipIfPressed(usize),
    /// ExA1 - SKNP Vx
    SkipIfNotPressed(usize),
    /// Fx07 - LD Vx, DT
    LoadDelay(usize),
    /// Fx0A - LD Vx, K
    WaitKey(usize),
    /// Fx15 - LD DT, Vx
    SetDelay(usize),
    /// Fx18 - LD ST, Vx
    SetSound(usize),
    /// Fx1E - ADD I, Vx
    AddIndex(usize),
    /// Fx29 - LD F, Vx
    LoadGlyph(usize),
    /// Fx33 - LD B, Vx
    StoreBcd(usize),
    /// Fx55 - LD [I], Vx
    StoreRegisters(usize),
    /// Fx65 - LD Vx, [I]
    LoadRegisters(usize),
}

impl TryFrom<Opcode> for Instruction {
    type Error = Fault;

    fn try_from(op: Opcode) -> Result<Self, Self::Error> {
        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());

        let instruction = match op.class() {
            0x0 => match op.0 {
                0x00E0 => Instruction::Clear,
                0x00EE => Instruction::Return,
                _ => Instruction::Sys(addr),
            },
            0x1 => Instruction::Jump(addr),
            0x2 => Instruction::Call(addr),
            0x3 => Instruction::SkipIfEqualImmediate(x, kk),
            0x4 => Instruction::SkipIfNotEqualImmediate(x, kk),
            0x5 if n == 0 => Instruction::SkipIfEqualRegister(x, y),
            0x6 => Instruction::LoadImmediate(x, kk),
            0x7 => Instruction::AddImmediate(x, kk),
            0x8 => match n {
                0x0 => Instruction::Move(x, y),
                0x1 => Instruction::Or(x, y),
                0x2 => Instruction::And(x, y),
                0x3 => Instruction::Xor(x, y),
                0x4 => Instruction::Add(x, y),
                0x5 => Instruction::Sub(x, y),
                0x6 => Instruction::ShiftRight(x),
                0x7 => Instruction::SubNegated(x, y),
                0xE => Instruction::ShiftLeft(x),
                _ => return Err(Fault::UnknownOpcode),
            },
            0x9 if n == 0 => Instruction::SkipIfNotEqualRegister(x, y),
            0xA => Instruction::LoadIndex(addr),
            0xB => Instruction::JumpOffset(addr),
            0xC => Instruction::Random(x, kk),
            0xD => Instruction::Draw(x, y, n),
            0xE => match kk {
                0x9E => Instruction::SkipIfPressed(x),
                0xA1 => Instruction::SkipIfNotPressed(x),
                _ => return Err(Fault::UnknownOpcode),
            },
            0xF => match kk {
                0x07 => Instruction::LoadDelay(x),
                0x0A => Instruction::WaitKey(x),
                0x15 => Instruction::SetDelay(x),
                0x18 => Instruction::SetSound(x),
                0x1E => Instruction::AddIndex(x),
                0x29 => Instruction::LoadGlyph(x),
                0x33 => Instruction::StoreBcd(x),
                0x55 => Instruction::StoreRegisters(x),
                0x65 => Instruction::LoadRegisters(x),
                _ => return Err(Fault::UnknownOpcode),
            },
            _ => return Err(Fault::UnknownOpcode),
        };

        Ok(instruction)
    }
}
