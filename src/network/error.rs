use thiserror::Error;

/// Reasons a payload cannot become a [`GeneNetwork`](super::GeneNetwork).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("node #{index} has an empty id")]
    EmptyNodeId { index: usize },

    #[error("duplicate node id `{id}`")]
    DuplicateNode { id: String },

    #[error("edge #{edge} references unknown node `{endpoint}`")]
    UnknownEndpoint { edge: usize, endpoint: String },
}
