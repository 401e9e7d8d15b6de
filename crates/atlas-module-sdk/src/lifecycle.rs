//! The lifecycle contract a module's entry-point type implements.

use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};

use crate::descriptor::{STATUS_ERROR, STATUS_OK, STATUS_PANIC};
use crate::error::ModuleResult;

/// Operations the host drives on a module's entry-point instance.
///
/// The instance is constructed through [`Default`] (the parameterless
/// constructor the host expects) and the three operations are exported as
/// lifecycle symbols by [`crate::declare_module!`].
pub trait ModuleLifecycle {
    /// Called on every host load call, including the first one right after
    /// construction.
    fn load(&mut self) -> ModuleResult<()>;

    /// Called when the host unloads the module. This is a logical shutdown;
    /// the binary image stays mapped until the host process tears down.
    fn unload(&mut self) -> ModuleResult<()>;

    /// Called when the host reloads the module. Defaults to unload followed
    /// by load.
    fn reload(&mut self) -> ModuleResult<()> {
        self.unload()?;
        self.load()
    }
}

/// Drive one lifecycle hook across the ABI boundary.
///
/// Errors and panics never cross the boundary; they are converted into the
/// status codes the host maps back into its own failure reporting.
///
/// # Safety
///
/// This function is safe to call only because the host guarantees `instance`
/// is a pointer produced by the module's exported constructor for `M` and
/// that lifecycle calls are serialized. [`crate::declare_module!`] is the
/// intended caller.
pub fn run_lifecycle_hook<M, F>(instance: *mut c_void, hook: F) -> i32
where
    M: ModuleLifecycle,
    F: FnOnce(&mut M) -> ModuleResult<()>,
{
    if instance.is_null() {
        return STATUS_ERROR;
    }

    // SAFETY: the host passes pointers produced by the module's exported
    // constructor and never calls two hooks concurrently.
    let module = unsafe { &mut *(instance as *mut M) };

    match panic::catch_unwind(AssertUnwindSafe(|| hook(module))) {
        Ok(Ok(())) => STATUS_OK,
        Ok(Err(_)) => STATUS_ERROR,
        Err(_) => STATUS_PANIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModuleError;

    #[derive(Default)]
    struct Counting {
        loads: u32,
        fail_next: bool,
        panic_next: bool,
    }

    impl ModuleLifecycle for Counting {
        fn load(&mut self) -> ModuleResult<()> {
            if self.panic_next {
                panic!("boom");
            }
            if self.fail_next {
                return Err(ModuleError::InitializationFailed("flagged".into()));
            }
            self.loads += 1;
            Ok(())
        }

        fn unload(&mut self) -> ModuleResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_hook_maps_outcomes_to_status_codes() {
        let mut module = Counting::default();
        let ptr = &mut module as *mut Counting as *mut c_void;

        assert_eq!(run_lifecycle_hook::<Counting, _>(ptr, |m| m.load()), STATUS_OK);
        assert_eq!(module.loads, 1);

        module.fail_next = true;
        assert_eq!(
            run_lifecycle_hook::<Counting, _>(ptr, |m| m.load()),
            STATUS_ERROR
        );

        module.fail_next = false;
        module.panic_next = true;
        assert_eq!(
            run_lifecycle_hook::<Counting, _>(ptr, |m| m.load()),
            STATUS_PANIC
        );
    }

    #[test]
    fn test_null_instance_is_an_error() {
        assert_eq!(
            run_lifecycle_hook::<Counting, _>(std::ptr::null_mut(), |m| m.load()),
            STATUS_ERROR
        );
    }

    #[test]
    fn test_default_reload_runs_unload_then_load() {
        let mut module = Counting::default();
        module.reload().unwrap();
        assert_eq!(module.loads, 1);
    }
}
