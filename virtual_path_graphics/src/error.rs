//! Error types for the VirtualPath graphics core
//!
//! Every failure the core can surface is a variant of [`Error`]. Construction
//! failures (shader compile, pipeline link) carry the driver log; per-frame
//! failures report the state that was missing.

use std::fmt;
use crate::graphics_device::ShaderStage;

/// Result type for graphics core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Graphics core errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (object creation refused by the driver, etc.)
    BackendError(String),

    /// Shader stage failed to compile; carries the compiler log
    ShaderCompileFailed {
        stage: ShaderStage,
        log: String,
    },

    /// Program failed to link; carries the linker log
    PipelineLinkFailed(String),

    /// Operation attempted on an uninitialized or torn-down host/context
    InvalidState(String),

    /// Argument violates the operation's contract (length, range, type)
    InvalidArgument(String),

    /// Uniform block contains a field whose type has no uniform encoding
    UnsupportedUniformType {
        name: String,
        type_name: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::ShaderCompileFailed { stage, log } => {
                write!(f, "{:?} shader compilation failed: {}", stage, log)
            }
            Error::PipelineLinkFailed(log) => write!(f, "Pipeline link failed: {}", log),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::UnsupportedUniformType { name, type_name } => {
                write!(f, "Unsupported uniform type for '{}': {}", name, type_name)
            }
        }
    }
}

impl std::error::Error for Error {}

// ===== RAISE MACROS =====

/// Log an error at the raise site and evaluate to it.
///
/// ```ignore
/// return Err(engine_raise!("vpgfx::Frame", Error::InvalidArgument(msg)));
/// ```
#[macro_export]
macro_rules! engine_raise {
    ($source:expr, $error:expr) => {{
        let error: $crate::Error = $error;
        $crate::engine_error!($source, "{}", error);
        error
    }};
}

/// Build a logged `Error::BackendError` from a format string.
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_raise!($source, $crate::Error::BackendError(format!($($arg)*)))
    };
}

/// Return early with a logged `Error::BackendError`.
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
