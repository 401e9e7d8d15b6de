//! Entry-point descriptor and the fixed export symbol contract.
//!
//! A loadable module exports one well-known symbol, [`MODULE_ENTRY_SYMBOL`],
//! returning a pointer to a static [`ModuleEntryDescriptor`], plus the three
//! fixed-name lifecycle symbols the host binds to the instance produced by
//! the descriptor's constructor. [`crate::declare_module!`] generates all of
//! them from a safe [`crate::ModuleLifecycle`] impl.

use std::ffi::c_void;

use crate::version::ModuleVersion;

/// Symbol every module must export to be discoverable.
pub const MODULE_ENTRY_SYMBOL: &str = "atlas_module_entry";

/// Lifecycle symbol invoked on every host load call.
pub const MODULE_LOAD_SYMBOL: &str = "atlas_module_load";
/// Lifecycle symbol invoked on host unload calls.
pub const MODULE_UNLOAD_SYMBOL: &str = "atlas_module_unload";
/// Lifecycle symbol invoked on host reload calls.
pub const MODULE_RELOAD_SYMBOL: &str = "atlas_module_reload";

/// Signature of [`MODULE_ENTRY_SYMBOL`].
pub type ModuleEntryFn = unsafe extern "C" fn() -> *const ModuleEntryDescriptor;

/// Signature of a lifecycle symbol: takes the instance produced by the
/// descriptor's constructor and returns a status code.
pub type ModuleLifecycleFn = unsafe extern "C" fn(*mut c_void) -> i32;

/// Signature of the descriptor's version accessor.
pub type ModuleVersionFn = unsafe extern "C" fn() -> ModuleVersion;

/// Signature of the descriptor's parameterless constructor.
pub type ModuleCreateFn = unsafe extern "C" fn() -> *mut c_void;

/// Signature of the descriptor's destructor.
pub type ModuleDestroyFn = unsafe extern "C" fn(*mut c_void);

/// Status returned by a lifecycle symbol on success.
pub const STATUS_OK: i32 = 0;
/// Status returned when a lifecycle hook reported an error.
pub const STATUS_ERROR: i32 = -1;
/// Status returned when a lifecycle hook panicked.
pub const STATUS_PANIC: i32 = -2;

/// Entry-point descriptor returned by [`MODULE_ENTRY_SYMBOL`].
///
/// The function pointers are optional so the host can report a precise
/// failure for each missing piece instead of faulting on a null call.
#[repr(C)]
pub struct ModuleEntryDescriptor {
    /// Declared module version, checked by the host's compatibility gate.
    pub version: Option<ModuleVersionFn>,
    /// Parameterless constructor for the entry-point instance.
    pub create: Option<ModuleCreateFn>,
    /// Destructor for instances produced by `create`.
    pub destroy: Option<ModuleDestroyFn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_distinct() {
        assert_ne!(STATUS_OK, STATUS_ERROR);
        assert_ne!(STATUS_OK, STATUS_PANIC);
        assert_ne!(STATUS_ERROR, STATUS_PANIC);
    }

    #[test]
    fn test_lifecycle_symbols_are_distinct() {
        let symbols = [MODULE_LOAD_SYMBOL, MODULE_UNLOAD_SYMBOL, MODULE_RELOAD_SYMBOL];
        for (i, a) in symbols.iter().enumerate() {
            for b in &symbols[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_descriptor_supports_absent_pointers() {
        let descriptor = ModuleEntryDescriptor {
            version: None,
            create: None,
            destroy: None,
        };
        assert!(descriptor.version.is_none());
        assert!(descriptor.create.is_none());
        assert!(descriptor.destroy.is_none());
    }
}
