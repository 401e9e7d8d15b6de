//! Bootstrap error taxonomy.
//!
//! Every failure of discovery or invocation maps to exactly one kind. The
//! underlying cause, when the failing operation produced one, is preserved
//! as the error source and never swallowed; kinds with no natural cause
//! carry a descriptive message instead.

use std::path::PathBuf;

use atlas_module_sdk::ModuleVersion;

/// Result type for bootstrap operations.
pub type BootstrapResult<T> = std::result::Result<T, BootstrapError>;

/// A fault raised by module code on the far side of the binary boundary.
pub type ModuleFault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Bootstrap error kinds.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// A bootstrap instance is already active. Reported by hosts that refuse
    /// to stand up a second loader; never produced by the loader itself.
    #[error("a bootstrap instance is already active")]
    AlreadyLoaded,

    /// The main module binary does not exist on disk.
    #[error("failed to find the main module binary ({path})")]
    MissingBinaryFile { path: PathBuf },

    /// The directory layout could not be derived or materialized.
    #[error("failed to prepare the module folder ({path})")]
    MissingParentDirectory {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Loading the main module binary into the process failed.
    #[error("failed to load the main module binary ({path})")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: ModuleFault,
    },

    /// The loaded binary exposes no usable entry point.
    #[error("failed to find the entry point ({symbol})")]
    EntryTypeNotFound {
        symbol: &'static str,
        #[source]
        source: Option<ModuleFault>,
    },

    /// Constructing the entry-point instance failed.
    #[error("failed to instantiate the entry point")]
    InstantiationFailed {
        #[source]
        source: Option<ModuleFault>,
    },

    /// A fixed-name lifecycle method does not exist in the binary.
    #[error("failed to locate the entry method ({method})")]
    EntryMethodNotFound { method: &'static str },

    /// Looking up a lifecycle method failed for a reason other than absence.
    #[error("failed to resolve the entry method ({method})")]
    EntryMethodAccessError {
        method: &'static str,
        #[source]
        source: ModuleFault,
    },

    /// An invoked lifecycle method faulted.
    #[error("failed to invoke the entry method ({method})")]
    InvocationFailed {
        method: &'static str,
        #[source]
        source: ModuleFault,
    },

    /// The declared module version is not accepted by the compatibility gate.
    #[error("version mismatch: expected any of {}; got {declared}", join_versions(.supported))]
    VersionMismatch {
        declared: ModuleVersion,
        supported: Vec<ModuleVersion>,
    },
}

fn join_versions(versions: &[ModuleVersion]) -> String {
    versions
        .iter()
        .map(ModuleVersion::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
