//! Minimal textual disassembly used when debugging compiler output.

use core::fmt::Write;

use crate::bytecode::{chunk::Chunk, opcode::OpCode};

/// Produce a multi-line listing of every instruction under a `== name ==` header.
#[must_use]
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {name} ==");

    let mut offset = 0;
    while offset < chunk.count() {
        offset = disassemble_instruction(chunk, offset, &mut out);
    }
    out
}

/// Render the instruction at `offset` into `out` and return the offset of the
/// next one.
///
/// Unknown bytes take one line and advance by one; an instruction whose
/// operands run past the end of the code is marked `<truncated>`.
///
/// # Panics
/// If `offset` is not inside the code.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let _ = write!(out, "{offset:04} ");
    let line = chunk.lines()[offset];
    if offset > 0 && chunk.lines()[offset - 1] == line {
        out.push_str("   | ");
    } else {
        let _ = write!(out, "{line:4} ");
    }

    let byte = chunk.code()[offset];
    let Ok(op) = OpCode::decode(byte, offset) else {
        let _ = writeln!(out, "Unknown opcode 0x{byte:02X}");
        return offset + 1;
    };

    let width = op.operand_width();
    let operands = offset + 1..offset + 1 + width;
    let Some(bytes) = chunk.code().get(operands.clone()) else {
        let _ = writeln!(out, "{:<16} <truncated>", op.name());
        return chunk.count();
    };

    let index = bytes.iter().rev().fold(0usize, |acc, b| (acc << 8) | usize::from(*b));
    match op {
        OpCode::Return => {
            let _ = writeln!(out, "{}", op.name());
        }
        OpCode::Constant | OpCode::ConstantLong => match chunk.constants().get(index) {
            Some(value) => {
                let _ = writeln!(out, "{:<16} {index:4} '{value}'", op.name());
            }
            None => {
                let _ = writeln!(out, "{:<16} {index:4} <out of range>", op.name());
            }
        },
    }
    operands.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn listing_marks_repeated_lines() {
        let mut chunk = Chunk::new();
        chunk.write_constant(Value::Number(1.2), 123).unwrap();
        chunk.write_constant(Value::Bool(true), 123).unwrap();
        chunk.write_op(OpCode::Return, 124);

        let text = disassemble_chunk(&chunk, "test chunk");
        assert_eq!(
            text,
            "== test chunk ==\n\
             0000  123 OP_CONSTANT         0 '1.2'\n\
             0002    | OP_CONSTANT         1 'true'\n\
             0004  124 OP_RETURN\n"
        );
    }

    #[test]
    fn long_constant_and_garbage() {
        let mut chunk = Chunk::new();
        for _ in 0..256 {
            chunk.add_constant(Value::Nil);
        }
        chunk.add_constant(Value::Number(7.0));
        chunk.write_op(OpCode::ConstantLong, 1);
        chunk.write(0x00, 1);
        chunk.write(0x01, 1);
        chunk.write(0x00, 1);
        chunk.write(0xFF, 2);
        chunk.write_op(OpCode::Constant, 2);

        let mut out = String::new();
        assert_eq!(disassemble_instruction(&chunk, 0, &mut out), 4);
        assert_eq!(disassemble_instruction(&chunk, 4, &mut out), 5);
        assert_eq!(disassemble_instruction(&chunk, 5, &mut out), 6);
        assert_eq!(
            out,
            "0000    1 OP_CONSTANT_LONG  256 '7'\n\
             0004    2 Unknown opcode 0xFF\n\
             0005    | OP_CONSTANT      <truncated>\n"
        );
    }

    #[test]
    fn empty_chunk_has_only_header() {
        assert_eq!(disassemble_chunk(&Chunk::new(), "empty"), "== empty ==\n");
    }
}
