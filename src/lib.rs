pub mod display;
pub mod error;
pub mod interpreter;
pub mod keyboard;
pub mod memory;
pub mod opcode;
pub mod registers;
mod stack;
pub mod timers;

pub use error::{Error, Fault};

pub type Result<T> = std::result::Result<T, Error>;
