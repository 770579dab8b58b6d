use thiserror::Error;

use crate::ast::Operator;

/// Errors raised while constructing statements or decoding wire records.
///
/// Parsing raw chat text never produces one of these: unparseable input
/// compiles to `Skip` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("{operator} requires at least one operand")]
    EmptyOperandList { operator: Operator },

    #[error("agent index out of range: {0}")]
    InvalidAgentIndex(i64),

    #[error("unknown keyword: {0}")]
    UnknownKeyword(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("unknown utterance kind: {0}")]
    UnknownUtteranceKind(String),
}
