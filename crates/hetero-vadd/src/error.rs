//! Error type shared by every binding style.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClError {
    /// Non-success status returned by an OpenCL call.
    #[error("OpenCL error {0} ({})", status_name(.0))]
    Api(i32),

    #[error("no OpenCL platform found")]
    NoPlatform,

    #[error("cannot find a context for the requested device type")]
    NoContext,

    /// Program build failed; carries the build log.
    #[error("program build failed: {0}")]
    Build(String),

    #[error("cannot read kernel file {}: {source}", path.display())]
    KernelFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("length mismatch: expected {expected} elements, found {found}")]
    Length { expected: usize, found: usize },

    #[error("result mismatch at index {index}: expected {expected}, found {found}")]
    Mismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("buffer was not an argument of the completed launch")]
    NotLaunchOutput,

    #[error("Wrong result")]
    WrongResult,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("message passing error: {0}")]
    Comm(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<opencl3::error_codes::ClError> for ClError {
    fn from(e: opencl3::error_codes::ClError) -> Self {
        ClError::Api(e.0)
    }
}

pub type Result<T> = std::result::Result<T, ClError>;

fn status_name(code: &i32) -> String {
    opencl3::error_codes::ClError(*code).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_status_code() {
        let err: ClError = opencl3::error_codes::ClError(-5).into();
        assert!(matches!(err, ClError::Api(-5)));
        assert!(err.to_string().starts_with("OpenCL error -5"));
    }

    #[test]
    fn stream_failure_message() {
        assert_eq!(ClError::WrongResult.to_string(), "Wrong result");
    }
}
