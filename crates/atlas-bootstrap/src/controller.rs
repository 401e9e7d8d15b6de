//! Bootstrap controller: the discovery pipeline and the lifecycle protocol.

use std::sync::Arc;

use tracing::{debug, info, warn};

use atlas_module_sdk::{MODULE_LOAD_SYMBOL, MODULE_RELOAD_SYMBOL, MODULE_UNLOAD_SYMBOL};

use crate::binding::ModuleBinding;
use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, BootstrapResult};
use crate::paths::{PathKey, PathTable};
use crate::runtime::{ModuleRuntime, NativeRuntime};
use crate::version::{is_compatible, ModuleVersion, SUPPORTED_VERSIONS};

/// Notification fired after a successful lifecycle transition.
pub type LifecycleHook = Arc<dyn Fn() + Send + Sync>;

/// Notification fired with the failure before any `try_*` call returns it.
pub type ErrorHook = Arc<dyn Fn(&BootstrapError) + Send + Sync>;

#[derive(Default)]
struct Hooks {
    loaded: Vec<LifecycleHook>,
    unloaded: Vec<LifecycleHook>,
    reloaded: Vec<LifecycleHook>,
    error: Vec<ErrorHook>,
}

/// Bootstrap controller for the secondary module.
///
/// Owns at most one [`ModuleBinding`]. The first successful [`try_load`]
/// runs the discovery pipeline and caches the binding; every later call
/// re-invokes the cached method handles. A failed discovery caches nothing,
/// so the next call starts over from the first step.
///
/// All operations are synchronous and take `&mut self`: callers serialize
/// lifecycle calls by construction.
///
/// [`try_load`]: Bootstrapper::try_load
pub struct Bootstrapper {
    config: BootstrapConfig,
    paths: PathTable,
    runtime: Box<dyn ModuleRuntime>,
    supported: Vec<ModuleVersion>,
    binding: Option<ModuleBinding>,
    hooks: Hooks,
}

impl Bootstrapper {
    /// Create a controller backed by the native dynamic-library runtime.
    pub fn new(config: BootstrapConfig, paths: PathTable) -> Self {
        Self::with_runtime(config, paths, Box::new(NativeRuntime))
    }

    /// Create a controller with a custom module runtime.
    pub fn with_runtime(
        config: BootstrapConfig,
        paths: PathTable,
        runtime: Box<dyn ModuleRuntime>,
    ) -> Self {
        Self {
            config,
            paths,
            runtime,
            supported: SUPPORTED_VERSIONS.to_vec(),
            binding: None,
            hooks: Hooks::default(),
        }
    }

    /// Replace the accepted version set. Construction-time only; the set is
    /// immutable once calls start.
    pub fn with_supported_versions(mut self, supported: Vec<ModuleVersion>) -> Self {
        self.supported = supported;
        self
    }

    /// The configuration this controller was built with.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// The path table this controller resolves against.
    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    /// Whether a module binding has been built.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// The cached binding, if discovery has succeeded.
    pub fn binding(&self) -> Option<&ModuleBinding> {
        self.binding.as_ref()
    }

    /// Register a notification fired after every successful load.
    pub fn on_loaded(&mut self, hook: LifecycleHook) {
        self.hooks.loaded.push(hook);
    }

    /// Register a notification fired after every successful unload.
    pub fn on_unloaded(&mut self, hook: LifecycleHook) {
        self.hooks.unloaded.push(hook);
    }

    /// Register a notification fired after every successful reload.
    pub fn on_reloaded(&mut self, hook: LifecycleHook) {
        self.hooks.reloaded.push(hook);
    }

    /// Register a notification fired with every failure, before the failing
    /// call returns it.
    pub fn on_error(&mut self, hook: ErrorHook) {
        self.hooks.error.push(hook);
    }

    /// Load the module, running discovery first if no binding exists yet.
    ///
    /// Repeated calls are legal: each one re-invokes the module's load
    /// method on the cached binding. A load invocation that faults leaves
    /// the binding cached, so a retry skips rediscovery.
    pub fn try_load(&mut self) -> BootstrapResult<()> {
        match self.load_inner() {
            Ok(()) => {
                for hook in &self.hooks.loaded {
                    hook();
                }
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Unload the module. A no-op success when nothing is bound yet.
    pub fn try_unload(&mut self) -> BootstrapResult<()> {
        match self.unload_inner() {
            Ok(()) => {
                for hook in &self.hooks.unloaded {
                    hook();
                }
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Reload the module. A no-op success when nothing is bound yet.
    pub fn try_reload(&mut self) -> BootstrapResult<()> {
        match self.reload_inner() {
            Ok(()) => {
                for hook in &self.hooks.reloaded {
                    hook();
                }
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    fn load_inner(&mut self) -> BootstrapResult<()> {
        if self.binding.is_none() {
            let binding = self.discover()?;
            info!(version = %binding.declared_version(), "main module resolved");
            self.binding = Some(binding);
        }
        if let Some(binding) = self.binding.as_mut() {
            binding.invoke_load()?;
        }
        if self.config.allow_debug_logs {
            debug!("module load method invoked");
        }
        Ok(())
    }

    fn unload_inner(&mut self) -> BootstrapResult<()> {
        match self.binding.as_mut() {
            Some(binding) => binding.invoke_unload(),
            None => {
                if self.config.allow_debug_logs {
                    debug!("unload requested before any module was bound");
                }
                Ok(())
            }
        }
    }

    fn reload_inner(&mut self) -> BootstrapResult<()> {
        match self.binding.as_mut() {
            Some(binding) => binding.invoke_reload(),
            None => {
                if self.config.allow_debug_logs {
                    debug!("reload requested before any module was bound");
                }
                Ok(())
            }
        }
    }

    /// Run the discovery pipeline. Every step short-circuits with its own
    /// error kind; a failure caches nothing.
    fn discover(&self) -> BootstrapResult<ModuleBinding> {
        if self.config.allow_debug_logs {
            debug!("preparing module folder layout");
        }
        self.paths.ensure_directories()?;

        let binary = self.paths.get(PathKey::MainModuleBinary);
        if !binary.exists() {
            return Err(BootstrapError::MissingBinaryFile {
                path: binary.to_path_buf(),
            });
        }

        if self.config.allow_debug_logs {
            debug!(path = %binary.display(), "loading main module binary");
        }
        let image = self.runtime.load(binary)?;

        let entry = image.entry_point()?;
        let instance = entry.instantiate()?;
        let declared = entry.declared_version(&instance)?;
        if self.config.allow_debug_logs {
            debug!(version = %declared, "module declared its version");
        }

        if !is_compatible(declared, &self.supported, self.config.allow_incompatible) {
            return Err(BootstrapError::VersionMismatch {
                declared,
                supported: self.supported.clone(),
            });
        }

        let load = image.lifecycle_method(MODULE_LOAD_SYMBOL)?;
        let unload = image.lifecycle_method(MODULE_UNLOAD_SYMBOL)?;
        let reload = image.lifecycle_method(MODULE_RELOAD_SYMBOL)?;

        Ok(ModuleBinding::new(
            image, instance, declared, load, unload, reload,
        ))
    }

    /// Log the failure and fire the error hooks before handing it back.
    fn report(&self, err: BootstrapError) -> BootstrapError {
        warn!(error = %err, "bootstrap call failed");
        for hook in &self.hooks.error {
            hook(&err);
        }
        err
    }
}

impl std::fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("config", &self.config)
            .field("bound", &self.binding.is_some())
            .finish_non_exhaustive()
    }
}
