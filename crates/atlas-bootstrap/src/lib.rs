//! Atlas bootstrap loader.
//!
//! Locates the separately-built main module on disk, loads it into the
//! running process, verifies the version it declares, and drives it through
//! the load/unload/reload protocol via entry points resolved by name at
//! runtime.
//!
//! The first successful [`Bootstrapper::try_load`] runs the discovery
//! pipeline (folder layout, binary, entry point, instance, version gate,
//! lifecycle symbols) and caches the resulting [`ModuleBinding`]; every
//! later lifecycle call re-invokes the cached method handles on the same
//! entry instance.

pub mod binding;
pub mod config;
pub mod controller;
pub mod error;
pub mod paths;
pub mod runtime;
pub mod version;

pub use binding::ModuleBinding;
pub use config::BootstrapConfig;
pub use controller::{Bootstrapper, ErrorHook, LifecycleHook};
pub use error::{BootstrapError, BootstrapResult, ModuleFault};
pub use paths::{
    host_plugin_file_name, main_module_file_name, PathKey, PathTable, RootFolders,
};
pub use runtime::{
    EntryInstance, EntryPoint, LifecycleFault, LifecycleMethod, ModuleImage, ModuleRuntime,
    NativeRuntime,
};
pub use version::{is_compatible, ModuleVersion, SUPPORTED_VERSIONS};
