//! Error type for module lifecycle hooks.

use std::fmt;

/// Error returned by a module lifecycle hook.
#[derive(Debug)]
pub enum ModuleError {
    /// The module failed to bring itself up.
    InitializationFailed(String),

    /// The module failed to tear itself down.
    ShutdownFailed(String),

    /// The module is in the wrong state for the requested transition.
    InvalidState(String),

    /// An io operation failed.
    Io(std::io::Error),

    /// Custom error.
    Custom(String),
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleError::InitializationFailed(msg) => {
                write!(f, "Initialization failed: {}", msg)
            }
            ModuleError::ShutdownFailed(msg) => {
                write!(f, "Shutdown failed: {}", msg)
            }
            ModuleError::InvalidState(msg) => {
                write!(f, "Invalid state: {}", msg)
            }
            ModuleError::Io(err) => {
                write!(f, "Io error: {}", err)
            }
            ModuleError::Custom(msg) => {
                write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for ModuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModuleError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ModuleError {
    fn from(err: std::io::Error) -> Self {
        ModuleError::Io(err)
    }
}

/// Result type for module lifecycle hooks.
pub type ModuleResult<T> = Result<T, ModuleError>;
