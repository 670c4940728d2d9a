//! Structural validation of compiler output.

use crate::{
    bytecode::{chunk::Chunk, opcode::OpCode},
    CoreError, CoreResult,
};

/// Basic structural validation of a chunk.
///
/// Walks the code with the encoding table: the line table must stay aligned,
/// every opcode must be known, every operand present and every constant index
/// inside the pool. Nothing here is needed by [`Chunk::write`], which accepts
/// any byte; this is for tooling that wants to vet a chunk before running it.
///
/// # Errors
/// The first `LineMismatch`, `UnknownOpcode`, `UnexpectedEnd` or
/// `ConstantOutOfRange` found while walking the code.
pub fn validate_chunk(chunk: &Chunk) -> CoreResult<()> {
    if chunk.code().len() != chunk.lines().len() {
        return Err(CoreError::LineMismatch { code: chunk.code().len(), lines: chunk.lines().len() });
    }

    let mut cursor = chunk.cursor();
    while !cursor.is_at_end() {
        match cursor.try_read_op()? {
            OpCode::Return => {}
            OpCode::Constant => {
                cursor.try_read_constant()?;
            }
            OpCode::ConstantLong => {
                cursor.try_read_constant_long()?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn accepts_well_formed_chunk() {
        let mut chunk = Chunk::new();
        chunk.write_constant(Value::Nil, 1).unwrap();
        chunk.write_constant(Value::Bool(false), 1).unwrap();
        chunk.write_op(OpCode::Return, 2);
        assert_eq!(validate_chunk(&chunk), Ok(()));
        assert_eq!(validate_chunk(&Chunk::new()), Ok(()));
    }

    #[test]
    fn rejects_unknown_opcode() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Return, 1);
        chunk.write(0xEE, 1);
        assert_eq!(
            validate_chunk(&chunk),
            Err(CoreError::UnknownOpcode { byte: 0xEE, offset: 1 })
        );
    }

    #[test]
    fn rejects_dangling_constant() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Constant, 1);
        chunk.write(0, 1);
        assert_eq!(
            validate_chunk(&chunk),
            Err(CoreError::ConstantOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn rejects_truncated_operand() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Constant, 1);
        assert_eq!(validate_chunk(&chunk), Err(CoreError::UnexpectedEnd { offset: 1, needed: 1 }));
    }
}
