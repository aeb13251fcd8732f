//! Exit codes for the CLI tool.

use uncompress::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Compressed data or format error
pub const BAD_DATA: i32 = 3;
/// Source missing, empty or not fetchable
pub const SOURCE_ERROR: i32 = 4;
/// I/O error on the destination
pub const IO_ERROR: i32 = 5;
/// Invalid command line arguments or task parameters
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FatalError,
    BadData,
    SourceError,
    IoError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadData => BAD_DATA,
            Self::SourceError => SOURCE_ERROR,
            Self::IoError => IO_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a task error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) => ExitCode::IoError,
        Error::SourceUnavailable { .. } | Error::EmptySource { .. } => ExitCode::SourceError,
        Error::UnsupportedFormat { .. } => ExitCode::BadData,
        Error::DecompressionError { .. } => ExitCode::BadData,
        Error::UnsupportedFeature { .. } => ExitCode::BadData,
        Error::InvalidSourceName { .. } => ExitCode::BadArgs,
        Error::InvalidMode { .. } | Error::UnknownOwner { .. } => ExitCode::BadArgs,
        Error::DestinationWriteError { .. } | Error::MetadataError { .. } => ExitCode::IoError,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
