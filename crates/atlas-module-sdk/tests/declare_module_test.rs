//! Exercises the exports generated by `declare_module!` the way the
//! bootstrap loader drives them: descriptor, constructor, lifecycle
//! symbols, destructor.

use std::ffi::c_void;

use atlas_module_sdk::prelude::*;
use atlas_module_sdk::{STATUS_ERROR, STATUS_OK, STATUS_PANIC};

#[derive(Default)]
struct ProbeModule {
    loads: u32,
    unloads: u32,
    reloads: u32,
    fail_next: bool,
    panic_next: bool,
}

impl ModuleLifecycle for ProbeModule {
    fn load(&mut self) -> ModuleResult<()> {
        if self.panic_next {
            panic!("probe module panic");
        }
        if self.fail_next {
            return Err(ModuleError::InitializationFailed("flagged".into()));
        }
        self.loads += 1;
        Ok(())
    }

    fn unload(&mut self) -> ModuleResult<()> {
        self.unloads += 1;
        Ok(())
    }

    fn reload(&mut self) -> ModuleResult<()> {
        self.reloads += 1;
        Ok(())
    }
}

declare_module!(ProbeModule, version = (1, 2, 3, 4));

fn create_instance() -> *mut c_void {
    // SAFETY: the descriptor comes from this crate's own export and points
    // at a static value.
    let descriptor = unsafe { &*atlas_module_entry() };
    let create = descriptor.create.expect("constructor exported");
    // SAFETY: signature published by the SDK.
    unsafe { create() }
}

fn destroy_instance(instance: *mut c_void) {
    // SAFETY: see create_instance.
    let descriptor = unsafe { &*atlas_module_entry() };
    let destroy = descriptor.destroy.expect("destructor exported");
    // SAFETY: `instance` came from this module's constructor.
    unsafe { destroy(instance) }
}

#[test]
fn test_entry_descriptor_is_complete() {
    let descriptor = atlas_module_entry();
    assert!(!descriptor.is_null());

    // SAFETY: static descriptor produced by this crate.
    let descriptor = unsafe { &*descriptor };
    let version = descriptor.version.expect("version accessor exported");
    // SAFETY: signature published by the SDK.
    let version = unsafe { version() };
    assert_eq!(version, ModuleVersion::new(1, 2, 3, 4));
    assert!(descriptor.create.is_some());
    assert!(descriptor.destroy.is_some());
}

#[test]
fn test_lifecycle_symbols_drive_the_instance() {
    let instance = create_instance();
    assert!(!instance.is_null());

    assert_eq!(atlas_module_load(instance), STATUS_OK);
    assert_eq!(atlas_module_unload(instance), STATUS_OK);
    assert_eq!(atlas_module_reload(instance), STATUS_OK);

    // SAFETY: the pointer was produced by this module's constructor and the
    // concrete type is known here.
    let module = unsafe { &*(instance as *mut ProbeModule) };
    assert_eq!((module.loads, module.unloads, module.reloads), (1, 1, 1));

    destroy_instance(instance);
}

#[test]
fn test_hook_faults_become_status_codes() {
    let instance = create_instance();

    {
        // SAFETY: as above; no lifecycle call is in flight.
        let module = unsafe { &mut *(instance as *mut ProbeModule) };
        module.fail_next = true;
    }
    assert_eq!(atlas_module_load(instance), STATUS_ERROR);

    {
        // SAFETY: as above.
        let module = unsafe { &mut *(instance as *mut ProbeModule) };
        module.fail_next = false;
        module.panic_next = true;
    }
    assert_eq!(atlas_module_load(instance), STATUS_PANIC);

    destroy_instance(instance);
}

#[test]
fn test_null_instance_is_rejected() {
    assert_eq!(atlas_module_load(std::ptr::null_mut()), STATUS_ERROR);
}
