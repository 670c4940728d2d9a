//! Opcode bytes and their operand shapes.
//!
//! This table only says how many bytes follow each opcode; what an opcode does
//! belongs to the VM.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Largest constant index encodable by `ConstantLong` (24 bits).
pub const MAX_LONG_INDEX: usize = 0x00FF_FFFF;

/// Opcodes recognised by the encoding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum OpCode {
    /// Exit the current chunk execution.
    Return = 0x00,
    /// Push constant `u8` onto the VM stack.
    Constant = 0x01,
    /// Push constant `u24` (little-endian) onto the VM stack.
    ConstantLong = 0x02,
}

impl OpCode {
    /// Number of operand bytes following the opcode.
    #[must_use]
    pub const fn operand_width(self) -> usize {
        match self {
            OpCode::Return => 0,
            OpCode::Constant => 1,
            OpCode::ConstantLong => 3,
        }
    }

    /// Mnemonic used by the disassembler.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            OpCode::Return => "OP_RETURN",
            OpCode::Constant => "OP_CONSTANT",
            OpCode::ConstantLong => "OP_CONSTANT_LONG",
        }
    }

    /// Decode `byte` read at `offset`.
    ///
    /// # Errors
    /// `UnknownOpcode` carrying `byte` and `offset` when the byte is not in
    /// the table.
    pub fn decode(byte: u8, offset: usize) -> Result<Self, CoreError> {
        match byte {
            0x00 => Ok(OpCode::Return),
            0x01 => Ok(OpCode::Constant),
            0x02 => Ok(OpCode::ConstantLong),
            _ => Err(CoreError::UnknownOpcode { byte, offset }),
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = CoreError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> { Self::decode(byte, 0) }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self { op as u8 }
}
