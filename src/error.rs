use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmdError {
    #[error("Failed to open file: {0}")]
    FileOpenError(std::io::Error),

    #[error("Failed to create file: {0}")]
    CreateFileError(std::io::Error),

    #[error("Failed to read line: {0}")]
    LineReadError(std::io::Error),

    #[error("line {line}: malformed {kind} record: {reason}")]
    MalformedRecord {
        line: usize,
        kind: char,
        reason: &'static str,
    },

    #[error("line {line}: path token {token} is reverse oriented, only forward-oriented walks are supported")]
    ReverseOrientedPath { line: usize, token: String },

    #[error("write error: {0}")]
    WriteError(std::io::Error),
}
