use crate::node::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EntwineError {
    #[error("Format error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Node not found: {0}")]
    NotFound(NodeId),

    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("Reserved field name: {0}")]
    ReservedKeyConflict(String),

    #[error("Duplicate definition for id {0}")]
    DuplicateDefinition(u64),

    #[error("Unresolved references: {0:?}")]
    DanglingReference(Vec<u64>),

    #[error("Invalid tree: {0}")]
    InvalidTree(String),
}

pub type Result<T> = std::result::Result<T, EntwineError>;
