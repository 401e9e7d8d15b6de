//! Export macro for module authors.

/// Generate every export the bootstrap loader resolves: the entry descriptor
/// symbol and the three fixed-name lifecycle symbols.
///
/// The module type must implement [`Default`] (the parameterless constructor
/// the loader instantiates) and [`crate::ModuleLifecycle`]. Use at most once
/// per `cdylib`.
///
/// # Example
///
/// ```rust
/// use atlas_module_sdk::prelude::*;
///
/// #[derive(Default)]
/// struct MyModule;
///
/// impl ModuleLifecycle for MyModule {
///     fn load(&mut self) -> ModuleResult<()> {
///         Ok(())
///     }
///
///     fn unload(&mut self) -> ModuleResult<()> {
///         Ok(())
///     }
/// }
///
/// declare_module!(MyModule, version = (1, 0, 0, 0));
/// ```
#[macro_export]
macro_rules! declare_module {
    ($ty:ty, version = ($major:expr, $minor:expr, $patch:expr, $build:expr)) => {
        extern "C" fn __atlas_module_version() -> $crate::ModuleVersion {
            $crate::ModuleVersion::new($major, $minor, $patch, $build)
        }

        extern "C" fn __atlas_module_create() -> *mut ::std::ffi::c_void {
            let module: ::std::boxed::Box<$ty> =
                ::std::boxed::Box::new(<$ty as ::std::default::Default>::default());
            ::std::boxed::Box::into_raw(module) as *mut ::std::ffi::c_void
        }

        extern "C" fn __atlas_module_destroy(instance: *mut ::std::ffi::c_void) {
            if !instance.is_null() {
                // SAFETY: the loader only passes pointers produced by
                // `__atlas_module_create`, each destroyed exactly once.
                unsafe {
                    drop(::std::boxed::Box::from_raw(instance as *mut $ty));
                }
            }
        }

        #[no_mangle]
        pub extern "C" fn atlas_module_entry() -> *const $crate::ModuleEntryDescriptor {
            static DESCRIPTOR: $crate::ModuleEntryDescriptor = $crate::ModuleEntryDescriptor {
                version: ::std::option::Option::Some(
                    __atlas_module_version as $crate::ModuleVersionFn,
                ),
                create: ::std::option::Option::Some(
                    __atlas_module_create as $crate::ModuleCreateFn,
                ),
                destroy: ::std::option::Option::Some(
                    __atlas_module_destroy as $crate::ModuleDestroyFn,
                ),
            };
            &DESCRIPTOR
        }

        #[no_mangle]
        pub extern "C" fn atlas_module_load(instance: *mut ::std::ffi::c_void) -> i32 {
            $crate::run_lifecycle_hook::<$ty, _>(instance, |module| {
                $crate::ModuleLifecycle::load(module)
            })
        }

        #[no_mangle]
        pub extern "C" fn atlas_module_unload(instance: *mut ::std::ffi::c_void) -> i32 {
            $crate::run_lifecycle_hook::<$ty, _>(instance, |module| {
                $crate::ModuleLifecycle::unload(module)
            })
        }

        #[no_mangle]
        pub extern "C" fn atlas_module_reload(instance: *mut ::std::ffi::c_void) -> i32 {
            $crate::run_lifecycle_hook::<$ty, _>(instance, |module| {
                $crate::ModuleLifecycle::reload(module)
            })
        }
    };
}
