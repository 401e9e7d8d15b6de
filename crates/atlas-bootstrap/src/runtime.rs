//! Capability interfaces bridging the loader to a module binary, and their
//! dynamic-library implementation.
//!
//! The traits model the three stages of discovery: a [`ModuleRuntime`] maps
//! a binary into the process, the resulting [`ModuleImage`] resolves the
//! entry point and the fixed-name lifecycle symbols, and the [`EntryPoint`]
//! constructs the instance and reads the version it declares. The
//! [`NativeRuntime`] implementation binds these to `libloading`; tests bind
//! them to in-process fakes without changing the pipeline.

use std::any::Any;
use std::ffi::c_void;
use std::fmt;
use std::path::Path;

use libloading::Library;
use tracing::debug;

use atlas_module_sdk::{
    ModuleCreateFn, ModuleDestroyFn, ModuleEntryFn, ModuleLifecycleFn, ModuleVersion,
    ModuleVersionFn, MODULE_ENTRY_SYMBOL, STATUS_OK,
};

use crate::error::{BootstrapError, BootstrapResult, ModuleFault};

/// Loads module binaries into the process.
pub trait ModuleRuntime: Send {
    /// Load the binary at `path`. The raw loader failure, if any, is
    /// preserved as the error source.
    fn load(&self, path: &Path) -> BootstrapResult<Box<dyn ModuleImage>>;
}

/// One module binary loaded into the process.
pub trait ModuleImage: Send {
    /// Resolve the module's entry point.
    fn entry_point(&self) -> BootstrapResult<Box<dyn EntryPoint>>;

    /// Resolve one fixed-name lifecycle method exposed by the binary.
    ///
    /// Absence reports [`BootstrapError::EntryMethodNotFound`]; a lookup that
    /// itself fails reports [`BootstrapError::EntryMethodAccessError`].
    fn lifecycle_method(&self, name: &'static str) -> BootstrapResult<LifecycleMethod>;
}

/// The resolved entry point of a loaded module.
pub trait EntryPoint: Send {
    /// Construct the entry-point instance via its parameterless constructor.
    fn instantiate(&self) -> BootstrapResult<EntryInstance>;

    /// Read the version the instance declares.
    fn declared_version(&self, instance: &EntryInstance) -> BootstrapResult<ModuleVersion>;
}

/// Opaque entry-point instance, owned exclusively by the module binding.
pub struct EntryInstance {
    inner: Box<dyn Any + Send>,
}

impl EntryInstance {
    /// Wrap implementation-specific instance state.
    pub fn new(state: impl Any + Send) -> Self {
        Self {
            inner: Box::new(state),
        }
    }

    /// Borrow the state as the concrete type it was created with.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Mutably borrow the state as the concrete type it was created with.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.inner.downcast_mut()
    }
}

impl fmt::Debug for EntryInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryInstance").finish_non_exhaustive()
    }
}

/// A lifecycle method handle resolved during discovery and bound to the
/// entry instance for the lifetime of the binding.
pub struct LifecycleMethod {
    name: &'static str,
    handler: Box<dyn Fn(&mut EntryInstance) -> Result<(), ModuleFault> + Send>,
}

impl LifecycleMethod {
    /// Wrap a resolved handler under its fixed symbol name.
    pub fn new(
        name: &'static str,
        handler: impl Fn(&mut EntryInstance) -> Result<(), ModuleFault> + Send + 'static,
    ) -> Self {
        Self {
            name,
            handler: Box::new(handler),
        }
    }

    /// The fixed symbol name this handle was resolved from.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the method on `instance`. Any fault the module raises is
    /// reported as [`BootstrapError::InvocationFailed`] carrying the cause.
    pub fn invoke(&self, instance: &mut EntryInstance) -> BootstrapResult<()> {
        (self.handler)(instance).map_err(|source| BootstrapError::InvocationFailed {
            method: self.name,
            source,
        })
    }
}

impl fmt::Debug for LifecycleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleMethod")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Fault raised when a lifecycle hook returns a nonzero status.
#[derive(Debug)]
pub struct LifecycleFault {
    method: &'static str,
    status: i32,
}

impl LifecycleFault {
    /// The status code the hook returned.
    pub fn status(&self) -> i32 {
        self.status
    }
}

impl fmt::Display for LifecycleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lifecycle hook `{}` returned status {}",
            self.method, self.status
        )
    }
}

impl std::error::Error for LifecycleFault {}

/// Label used when the entry descriptor lacks its version accessor.
const ENTRY_VERSION_ACCESSOR: &str = "atlas_module_entry::version";

/// Dynamic-library runtime backed by `libloading`.
#[derive(Debug, Default)]
pub struct NativeRuntime;

impl ModuleRuntime for NativeRuntime {
    fn load(&self, path: &Path) -> BootstrapResult<Box<dyn ModuleImage>> {
        // SAFETY: loading and initializing a foreign binary is inherently
        // unsafe; the module is trusted by deployment contract.
        let library = unsafe { Library::new(path) }.map_err(|err| BootstrapError::LoadFailed {
            path: path.to_path_buf(),
            source: Box::new(err),
        })?;
        debug!(path = %path.display(), "mapped module binary");
        Ok(Box::new(NativeImage { library }))
    }
}

/// A module binary mapped by [`NativeRuntime`].
pub struct NativeImage {
    library: Library,
}

impl ModuleImage for NativeImage {
    fn entry_point(&self) -> BootstrapResult<Box<dyn EntryPoint>> {
        // SAFETY: the symbol type matches the published entry signature.
        let entry: libloading::Symbol<'_, ModuleEntryFn> = unsafe {
            self.library.get(MODULE_ENTRY_SYMBOL.as_bytes()).map_err(|err| {
                BootstrapError::EntryTypeNotFound {
                    symbol: MODULE_ENTRY_SYMBOL,
                    source: Some(Box::new(err)),
                }
            })?
        };

        // SAFETY: the entry symbol returns a pointer to a descriptor that
        // stays valid while the library is mapped.
        let descriptor = unsafe { entry() };
        if descriptor.is_null() {
            return Err(BootstrapError::EntryTypeNotFound {
                symbol: MODULE_ENTRY_SYMBOL,
                source: None,
            });
        }
        // SAFETY: non-null, and valid for the lifetime of the library; the
        // binding that owns the handles below also owns the image.
        let descriptor = unsafe { &*descriptor };

        let version = descriptor
            .version
            .ok_or(BootstrapError::EntryTypeNotFound {
                symbol: ENTRY_VERSION_ACCESSOR,
                source: None,
            })?;

        Ok(Box::new(NativeEntryPoint {
            version,
            create: descriptor.create,
            destroy: descriptor.destroy,
        }))
    }

    fn lifecycle_method(&self, name: &'static str) -> BootstrapResult<LifecycleMethod> {
        // SAFETY: lifecycle symbols follow the published signature.
        let symbol: libloading::Symbol<'_, ModuleLifecycleFn> = unsafe {
            self.library
                .get(name.as_bytes())
                .map_err(|err| classify_symbol_error(name, err))?
        };
        let hook: ModuleLifecycleFn = *symbol;

        Ok(LifecycleMethod::new(name, move |instance| {
            let native = instance
                .downcast_mut::<NativeInstance>()
                .ok_or_else(|| -> ModuleFault {
                    "entry instance does not belong to this module image".into()
                })?;
            // SAFETY: the pointer originates from this module's constructor
            // and the binding keeps the library mapped while the handle
            // lives.
            let status = unsafe { hook(native.ptr) };
            if status == STATUS_OK {
                Ok(())
            } else {
                Err(Box::new(LifecycleFault {
                    method: name,
                    status,
                }))
            }
        }))
    }
}

/// Distinguish "the symbol does not exist" from "the lookup itself failed".
fn classify_symbol_error(method: &'static str, err: libloading::Error) -> BootstrapError {
    match err {
        libloading::Error::DlSym { .. }
        | libloading::Error::DlSymUnknown
        | libloading::Error::GetProcAddress { .. }
        | libloading::Error::GetProcAddressUnknown => {
            BootstrapError::EntryMethodNotFound { method }
        }
        other => BootstrapError::EntryMethodAccessError {
            method,
            source: Box::new(other),
        },
    }
}

struct NativeEntryPoint {
    version: ModuleVersionFn,
    create: Option<ModuleCreateFn>,
    destroy: Option<ModuleDestroyFn>,
}

impl EntryPoint for NativeEntryPoint {
    fn instantiate(&self) -> BootstrapResult<EntryInstance> {
        let create = self.create.ok_or(BootstrapError::InstantiationFailed {
            source: Some("the entry point declares no constructor".into()),
        })?;
        // SAFETY: constructor follows the published signature; null is
        // checked below.
        let ptr = unsafe { create() };
        if ptr.is_null() {
            return Err(BootstrapError::InstantiationFailed {
                source: Some("the entry point constructor returned null".into()),
            });
        }
        Ok(EntryInstance::new(NativeInstance {
            ptr,
            destroy: self.destroy,
        }))
    }

    fn declared_version(&self, _instance: &EntryInstance) -> BootstrapResult<ModuleVersion> {
        // SAFETY: accessor presence was checked when the entry point was
        // resolved.
        Ok(unsafe { (self.version)() })
    }
}

/// Raw entry instance produced by the module's exported constructor.
struct NativeInstance {
    ptr: *mut c_void,
    destroy: Option<ModuleDestroyFn>,
}

// SAFETY: the pointer is only handed to module code through lifecycle calls,
// which the owning controller serializes.
unsafe impl Send for NativeInstance {}

impl Drop for NativeInstance {
    fn drop(&mut self) {
        if let Some(destroy) = self.destroy {
            // SAFETY: produced by this module's constructor; destroyed once.
            unsafe { destroy(self.ptr) };
        }
    }
}
