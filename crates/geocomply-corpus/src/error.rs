use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("regulation directory not found: {0}")]
    DirectoryNotFound(std::path::PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
