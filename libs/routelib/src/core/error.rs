use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Connection rejected: {0}")]
    InvalidConnection(String),

    #[error("Atom already exists: {0}")]
    DuplicateAtom(String),

    #[error("Atom not found: {0}")]
    AtomNotFound(String),

    #[error("Port not found: {0}")]
    PortNotFound(String),

    #[error("Action not found: {0}")]
    ActionNotFound(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RouterError>;
