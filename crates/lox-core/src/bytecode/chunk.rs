//! Core bytecode container: code bytes, a per-byte line table and a constant pool.

use core::ops::Range;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::{
    cursor::InstructionCursor,
    memory::{grow_array, grow_capacity},
    opcode::{OpCode, MAX_LONG_INDEX},
    value::{Value, ValueArray},
};
use crate::{CoreError, CoreResult};

/// Bytecode chunk with its code, line table and constant pool.
///
/// `code` and `lines` always have the same length and share one logical
/// capacity, so `lines[i]` is the source line that produced `code[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Chunk {
    capacity: usize,
    code: Vec<u8>,
    lines: Vec<u32>,
    constants: ValueArray,
}

impl Chunk {
    /// Create an empty chunk. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self { capacity: 0, code: Vec::new(), lines: Vec::new(), constants: ValueArray::new() }
    }

    /// Number of code bytes written.
    #[must_use]
    pub fn count(&self) -> usize { self.code.len() }

    /// Whether no byte has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.code.is_empty() }

    /// Logical capacity of the code and line buffers.
    #[must_use]
    pub const fn capacity(&self) -> usize { self.capacity }

    /// Encoded instructions.
    #[must_use]
    pub fn code(&self) -> &[u8] { &self.code }

    /// Source line of each code byte.
    #[must_use]
    pub fn lines(&self) -> &[u32] { &self.lines }

    /// Constant pool.
    #[must_use]
    pub const fn constants(&self) -> &ValueArray { &self.constants }

    /// Source line for the byte at `offset`.
    #[must_use]
    pub fn line(&self, offset: usize) -> Option<u32> { self.lines.get(offset).copied() }

    /// Iterate over contiguous ranges of the same line number.
    pub fn line_ranges(&self) -> LineRangeIter<'_> { LineRangeIter { lines: &self.lines, index: 0 } }

    /// Append one byte and record the line it came from.
    pub fn write(&mut self, byte: u8, line: u32) {
        if self.capacity < self.code.len() + 1 {
            let old = self.capacity;
            self.capacity = grow_capacity(old);
            grow_array(&mut self.code, self.capacity);
            grow_array(&mut self.lines, self.capacity);
            #[cfg(feature = "tracing")]
            tracing::trace!(old, new = self.capacity, "chunk code grown");
        }
        self.code.push(byte);
        self.lines.push(line);
    }

    /// Append an opcode byte.
    pub fn write_op(&mut self, op: OpCode, line: u32) { self.write(op as u8, line); }

    /// Append a constant and return its index.
    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.write(value);
        self.constants.count() - 1
    }

    /// Add `value` to the pool and emit the instruction that loads it.
    ///
    /// Uses `Constant` with a one-byte operand while the index fits, then
    /// `ConstantLong` with a 24-bit little-endian operand. Past that range
    /// nothing is written.
    ///
    /// # Errors
    /// `TooManyConstants` once the pool already holds `2^24` entries.
    pub fn write_constant(&mut self, value: Value, line: u32) -> CoreResult<usize> {
        let next = self.constants.count();
        if next > MAX_LONG_INDEX {
            return Err(CoreError::TooManyConstants { index: next });
        }

        let idx = self.add_constant(value);
        if let Ok(short) = u8::try_from(idx) {
            self.write_op(OpCode::Constant, line);
            self.write(short, line);
        } else {
            self.write_op(OpCode::ConstantLong, line);
            for byte in &idx.to_le_bytes()[..3] {
                self.write(*byte, line);
            }
        }
        Ok(idx)
    }

    /// Cursor positioned at the first instruction.
    #[must_use]
    pub const fn cursor(&self) -> InstructionCursor<'_> { InstructionCursor::new(self) }

    /// Release code, lines and constants, returning to the freshly created state.
    pub fn free(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            count = self.code.len(),
            capacity = self.capacity,
            constants = self.constants.count(),
            "chunk freed"
        );
        *self = Self::new();
    }
}

/// Iterator yielding contiguous line ranges `(start..end, line)`.
pub struct LineRangeIter<'a> {
    lines: &'a [u32],
    index: usize,
}

impl Iterator for LineRangeIter<'_> {
    type Item = (Range<usize>, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.index;
        let line = *self.lines.get(start)?;
        self.index += 1;
        while self.lines.get(self.index) == Some(&line) {
            self.index += 1;
        }
        Some((start..self.index, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_chunk_is_empty() {
        let chunk = Chunk::new();
        assert_eq!(chunk.count(), 0);
        assert_eq!(chunk.capacity(), 0);
        assert!(chunk.code().is_empty());
        assert!(chunk.lines().is_empty());
        assert!(chunk.constants().is_empty());
        assert_eq!(chunk, Chunk::default());
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn constant_then_return_layout() {
        let mut chunk = Chunk::new();
        chunk.write(0x01, 1);
        assert_eq!(chunk.add_constant(Value::Number(3.14)), 0);
        chunk.write(0x00, 1);

        assert_eq!(chunk.code(), &[0x01, 0x00]);
        assert_eq!(chunk.lines(), &[1, 1]);
        assert_eq!(chunk.constants().as_slice(), &[Value::Number(3.14)]);
    }

    #[test]
    fn nine_writes_grow_twice() {
        let mut chunk = Chunk::new();
        let mut capacities = vec![chunk.capacity()];
        for i in 0..9u8 {
            chunk.write(i, u32::from(i) + 1);
            if capacities.last() != Some(&chunk.capacity()) {
                capacities.push(chunk.capacity());
            }
        }
        assert_eq!(capacities, vec![0, 8, 16]);
        assert_eq!(chunk.count(), 9);
        assert_eq!(chunk.code(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(chunk.lines(), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn constants_are_not_deduplicated() {
        let mut chunk = Chunk::new();
        assert_eq!(chunk.add_constant(Value::Nil), 0);
        assert_eq!(chunk.add_constant(Value::Nil), 1);
        assert_eq!(chunk.add_constant(Value::Number(2.0)), 2);
        assert_eq!(chunk.constants().count(), 3);
        assert_eq!(chunk.count(), 0);
    }

    #[test]
    fn free_matches_fresh_chunk() {
        let mut chunk = Chunk::new();
        for i in 0..20 {
            chunk.write(0xAA, i);
        }
        chunk.add_constant(Value::Bool(true));
        chunk.free();
        assert_eq!(chunk, Chunk::new());
        assert_eq!(chunk.capacity(), 0);

        // reusable after free
        chunk.write(0x00, 7);
        assert_eq!(chunk.lines(), &[7]);
        assert_eq!(chunk.capacity(), 8);
    }

    #[test]
    fn write_constant_switches_to_long_form() {
        let mut chunk = Chunk::new();
        for i in 0..256 {
            let idx = chunk.write_constant(Value::Number(f64::from(i)), 1).unwrap();
            assert_eq!(idx, usize::try_from(i).unwrap());
        }
        assert_eq!(chunk.count(), 512);

        let idx = chunk.write_constant(Value::Nil, 2).unwrap();
        assert_eq!(idx, 256);
        assert_eq!(&chunk.code()[512..], &[OpCode::ConstantLong as u8, 0x00, 0x01, 0x00]);
        assert_eq!(&chunk.lines()[512..], &[2, 2, 2, 2]);
    }

    #[test]
    fn line_lookup_and_ranges() {
        let mut chunk = Chunk::new();
        chunk.write(0, 1);
        chunk.write(0, 1);
        chunk.write(0, 3);
        chunk.write(0, 1);
        assert_eq!(chunk.line(2), Some(3));
        assert_eq!(chunk.line(4), None);
        let ranges: Vec<_> = chunk.line_ranges().collect();
        assert_eq!(ranges, vec![(0..2, 1), (2..3, 3), (3..4, 1)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn snapshot_to_json() {
        let mut chunk = Chunk::new();
        chunk.write_constant(Value::Bool(true), 3).unwrap();
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["code"], serde_json::json!([1, 0]));
        assert_eq!(json["lines"], serde_json::json!([3, 3]));
        assert_eq!(json["capacity"], serde_json::json!(8));
        assert_eq!(json["constants"]["values"], serde_json::json!([{ "Bool": true }]));
    }
}
