//! Bytecode helpers (chunk structure, constant pool, cursor, disasm, validation).
//!
//! A compiler fills a [`Chunk`] with [`Chunk::write`] / [`Chunk::add_constant`];
//! a VM walks it afterwards through an [`InstructionCursor`].

/// Growth policy shared by every buffer of a chunk.
pub mod memory;
/// Literal values and the constant pool.
pub mod value;
/// Chunk representation (code, lines, constants).
pub mod chunk;
/// Instruction encoding table.
pub mod opcode;
/// Read-side contract used by the VM.
pub mod cursor;
pub mod helpers;
pub mod disasm;

pub use chunk::{Chunk, LineRangeIter};
pub use cursor::InstructionCursor;
pub use opcode::OpCode;
pub use value::{Value, ValueArray};
