//! lox-core — conteneur de bytecode pour la VM à pile Lox
//!
//! Fournit :
//! - `Chunk` : code (octets), table de lignes alignée 1:1, pool de constantes
//! - `ValueArray` + `Value` : pool de constantes littérales (append-only)
//! - `OpCode` : table d'encodage (opcode → largeur des opérandes)
//! - `InstructionCursor` : contrat de lecture consommé par la VM
//! - `disassemble_chunk` / `disassemble_instruction` : listing textuel
//! - `validate_chunk` : vérification structurelle d'un chunk émis
//! - Erreurs `CoreError` + alias `CoreResult<T>`
//!
//! Features :
//! - `tracing` (par défaut) : événements de croissance/libération des buffers
//! - `serde` : derive (dé)sérialisation sur les structures utiles

#![deny(missing_docs)]

/* ─────────────────────────── Modules publics ─────────────────────────── */

/// Primitives de bytecode (chunk, valeurs, opcodes, curseur, désassembleur).
pub mod bytecode;

pub use bytecode::{
    chunk::Chunk,
    cursor::InstructionCursor,
    disasm::{disassemble_chunk, disassemble_instruction},
    helpers::validate_chunk,
    memory::{grow_capacity, GROWTH_FACTOR, MIN_CAPACITY},
    opcode::OpCode,
    value::{Value, ValueArray},
};

/* ─────────────────────────── Résultat commun ─────────────────────────── */

/// Alias résultat commun au core.
pub type CoreResult<T> = core::result::Result<T, CoreError>;

/* ─────────────────────────── Erreurs ─────────────────────────── */

/// Erreurs de bas niveau communes.
///
/// Aucune opération d'écriture (`write`, `add_constant`, `free`) n'échoue :
/// ces erreurs proviennent uniquement des lectures vérifiées, de la
/// validation et de l'émission d'index de constante.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Octet qui ne correspond à aucun opcode connu.
    #[error("unknown opcode 0x{byte:02X} at offset {offset}")]
    UnknownOpcode {
        /// Octet lu.
        byte: u8,
        /// Offset dans le code.
        offset: usize,
    },

    /// Fin du code atteinte au milieu d'une instruction.
    #[error("unexpected end of code: need {needed} bytes at offset {offset}")]
    UnexpectedEnd {
        /// Offset où la lecture a échoué.
        offset: usize,
        /// Nombre d'octets manquants.
        needed: usize,
    },

    /// Index de constante hors du pool.
    #[error("constant index {index} out of range (pool size {len})")]
    ConstantOutOfRange {
        /// Index référencé.
        index: usize,
        /// Taille du pool.
        len: usize,
    },

    /// Table de lignes désalignée par rapport au code.
    #[error("line table length {lines} does not match code length {code}")]
    LineMismatch {
        /// Longueur du code.
        code: usize,
        /// Longueur de la table de lignes.
        lines: usize,
    },

    /// Index de constante non encodable sur 24 bits.
    #[error("constant index {index} does not fit in a 24-bit operand")]
    TooManyConstants {
        /// Index attribué par le pool.
        index: usize,
    },
}

/* ─────────────────────────── Prélude (reexports utiles) ─────────────────────────── */

/// Prélude pratique pour importer les types/funcs clés du crate.
pub mod prelude {
    /// Réexports utiles pour une importation rapide.
    pub use super::{
        disassemble_chunk, validate_chunk, Chunk, CoreError, CoreResult, InstructionCursor,
        OpCode, Value, ValueArray,
    };
}

/* ─────────────────────────── Tests ─────────────────────────── */
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render() {
        let e = CoreError::UnknownOpcode { byte: 0xAB, offset: 3 };
        assert_eq!(e.to_string(), "unknown opcode 0xAB at offset 3");
        let e = CoreError::ConstantOutOfRange { index: 4, len: 2 };
        assert_eq!(e.to_string(), "constant index 4 out of range (pool size 2)");
    }

    #[test]
    fn prelude_covers_round_trip() {
        use crate::prelude::*;
        let mut chunk = Chunk::new();
        let idx = chunk.add_constant(Value::Number(1.0));
        chunk.write_op(OpCode::Constant, 1);
        chunk.write(u8::try_from(idx).unwrap(), 1);
        assert!(validate_chunk(&chunk).is_ok());
    }
}
