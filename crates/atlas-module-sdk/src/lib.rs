//! Atlas Module SDK
//!
//! Everything a secondary module needs to be discovered and driven by the
//! Atlas bootstrap loader: the four-component [`ModuleVersion`], the
//! `#[repr(C)]` entry descriptor, the fixed export symbol names, and the
//! [`declare_module!`] macro that generates the exports from a safe
//! [`ModuleLifecycle`] impl.
//!
//! # Quick Start
//!
//! ```rust
//! use atlas_module_sdk::prelude::*;
//!
//! #[derive(Default)]
//! struct MyModule;
//!
//! impl ModuleLifecycle for MyModule {
//!     fn load(&mut self) -> ModuleResult<()> {
//!         Ok(())
//!     }
//!
//!     fn unload(&mut self) -> ModuleResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! declare_module!(MyModule, version = (1, 0, 0, 0));
//! ```

pub mod descriptor;
pub mod error;
pub mod lifecycle;
#[macro_use]
pub mod macros;
pub mod version;

pub use descriptor::{
    ModuleCreateFn, ModuleDestroyFn, ModuleEntryDescriptor, ModuleEntryFn, ModuleLifecycleFn,
    ModuleVersionFn, MODULE_ENTRY_SYMBOL, MODULE_LOAD_SYMBOL, MODULE_RELOAD_SYMBOL,
    MODULE_UNLOAD_SYMBOL, STATUS_ERROR, STATUS_OK, STATUS_PANIC,
};
pub use error::{ModuleError, ModuleResult};
pub use lifecycle::{run_lifecycle_hook, ModuleLifecycle};
pub use version::{ModuleVersion, ParseVersionError};

/// Prelude module with common imports for module authors.
pub mod prelude {
    pub use crate::declare_module;
    pub use crate::descriptor::{
        MODULE_ENTRY_SYMBOL, MODULE_LOAD_SYMBOL, MODULE_RELOAD_SYMBOL, MODULE_UNLOAD_SYMBOL,
    };
    pub use crate::error::{ModuleError, ModuleResult};
    pub use crate::lifecycle::ModuleLifecycle;
    pub use crate::version::ModuleVersion;
}
