use thiserror::Error;

/// Fatal conditions. Degenerate cases (empty corpus, absent lexical
/// backend, empty result) are not errors and never appear here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corpus registry not initialized: {0}")]
    NotInitialized(String),

    #[error("No required-document mapping for criterion {criterion}")]
    MissingCriterion { criterion: u32 },

    #[error(
        "No segments for criterion {criterion} from '{file}'. \
         Check the required-document mapping (basename) and the chunk 'file' metadata set at indexing."
    )]
    ProvenanceViolation { criterion: u32, file: String },

    #[error("Operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
