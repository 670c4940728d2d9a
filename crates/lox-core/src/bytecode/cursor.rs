//! Instruction cursor: the read side of a [`Chunk`] as seen by the VM.
//!
//! The plain readers trust the compiler: operands are assumed present and
//! constant indices in range, and a violation panics on the slice index. The
//! `try_*` readers check and report a [`CoreError`] instead.

use super::{chunk::Chunk, opcode::OpCode, value::Value};
use crate::{CoreError, CoreResult};

/// Advancing position over the code of a borrowed chunk.
#[derive(Debug, Clone, Copy)]
pub struct InstructionCursor<'a> {
    chunk: &'a Chunk,
    ip: usize,
}

impl<'a> InstructionCursor<'a> {
    /// Cursor at offset 0 of `chunk`.
    #[must_use]
    pub const fn new(chunk: &'a Chunk) -> Self { Self { chunk, ip: 0 } }

    /// Chunk being traversed.
    #[must_use]
    pub const fn chunk(&self) -> &'a Chunk { self.chunk }

    /// Offset of the next byte to fetch.
    #[must_use]
    pub const fn position(&self) -> usize { self.ip }

    /// Bytes left before the end of the code.
    #[must_use]
    pub fn remaining(&self) -> usize { self.chunk.count().saturating_sub(self.ip) }

    /// Whether every byte has been fetched.
    #[must_use]
    pub fn is_at_end(&self) -> bool { self.ip >= self.chunk.count() }

    /// Move to an absolute code offset.
    pub fn jump_to(&mut self, offset: usize) { self.ip = offset; }

    /// Fetch the next byte.
    ///
    /// # Panics
    /// Past the end of the code.
    pub fn read_byte(&mut self) -> u8 {
        let byte = self.chunk.code()[self.ip];
        self.ip += 1;
        byte
    }

    /// Fetch a one-byte constant index and resolve it.
    ///
    /// # Panics
    /// Past the end of the code, or if the index is outside the pool.
    pub fn read_constant(&mut self) -> Value {
        let idx = usize::from(self.read_byte());
        self.chunk.constants()[idx]
    }

    /// Fetch a 24-bit little-endian constant index and resolve it.
    ///
    /// # Panics
    /// If fewer than three operand bytes remain, or if the index is outside
    /// the pool.
    pub fn read_constant_long(&mut self) -> Value {
        let idx = self.read_u24();
        self.chunk.constants()[idx]
    }

    /// Fetch the next byte, failing at the end of the code.
    ///
    /// # Errors
    /// `UnexpectedEnd` when no byte is left.
    pub fn try_read_byte(&mut self) -> CoreResult<u8> {
        let byte = *self
            .chunk
            .code()
            .get(self.ip)
            .ok_or(CoreError::UnexpectedEnd { offset: self.ip, needed: 1 })?;
        self.ip += 1;
        Ok(byte)
    }

    /// Fetch and decode the next opcode.
    ///
    /// # Errors
    /// `UnexpectedEnd` at the end of the code, `UnknownOpcode` for a byte
    /// outside the encoding table.
    pub fn try_read_op(&mut self) -> CoreResult<OpCode> {
        let offset = self.ip;
        let byte = self.try_read_byte()?;
        OpCode::decode(byte, offset)
    }

    /// Checked [`InstructionCursor::read_constant`].
    ///
    /// # Errors
    /// `UnexpectedEnd` when the operand is missing, `ConstantOutOfRange` when
    /// the index is outside the pool.
    pub fn try_read_constant(&mut self) -> CoreResult<Value> {
        self.ensure(1)?;
        let idx = usize::from(self.read_byte());
        self.lookup(idx)
    }

    /// Checked [`InstructionCursor::read_constant_long`].
    ///
    /// # Errors
    /// `UnexpectedEnd` when fewer than three operand bytes remain,
    /// `ConstantOutOfRange` when the index is outside the pool.
    pub fn try_read_constant_long(&mut self) -> CoreResult<Value> {
        self.ensure(3)?;
        let idx = self.read_u24();
        self.lookup(idx)
    }

    /// Source line of the byte at `offset`.
    #[must_use]
    pub fn line_at(&self, offset: usize) -> Option<u32> { self.chunk.line(offset) }

    /// Source line of the most recently fetched byte, the one a runtime fault
    /// is reported against.
    #[must_use]
    pub fn previous_line(&self) -> Option<u32> {
        self.ip.checked_sub(1).and_then(|offset| self.chunk.line(offset))
    }

    fn read_u24(&mut self) -> usize {
        let lo = usize::from(self.read_byte());
        let mid = usize::from(self.read_byte());
        let hi = usize::from(self.read_byte());
        lo | (mid << 8) | (hi << 16)
    }

    fn ensure(&self, needed: usize) -> CoreResult<()> {
        if self.remaining() < needed {
            return Err(CoreError::UnexpectedEnd { offset: self.ip, needed: needed - self.remaining() });
        }
        Ok(())
    }

    fn lookup(&self, index: usize) -> CoreResult<Value> {
        let pool = self.chunk.constants();
        pool.get(index)
            .copied()
            .ok_or(CoreError::ConstantOutOfRange { index, len: pool.count() })
    }
}
