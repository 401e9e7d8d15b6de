//! The cached result of a successful discovery pass.

use std::fmt;

use chrono::{DateTime, Utc};

use atlas_module_sdk::ModuleVersion;

use crate::error::BootstrapResult;
use crate::runtime::{EntryInstance, LifecycleMethod, ModuleImage};

/// One successfully resolved module.
///
/// Built once per load cycle and reused for every later lifecycle call.
/// Either all three method handles resolved during discovery, or no binding
/// was built at all; a partially resolved module is never cached.
pub struct ModuleBinding {
    load: LifecycleMethod,
    unload: LifecycleMethod,
    reload: LifecycleMethod,
    instance: EntryInstance,
    declared_version: ModuleVersion,
    loaded_at: DateTime<Utc>,
    // Dropped last: the instance and the method handles above must be
    // released before the binary image they point into.
    _image: Box<dyn ModuleImage>,
}

impl ModuleBinding {
    pub(crate) fn new(
        image: Box<dyn ModuleImage>,
        instance: EntryInstance,
        declared_version: ModuleVersion,
        load: LifecycleMethod,
        unload: LifecycleMethod,
        reload: LifecycleMethod,
    ) -> Self {
        Self {
            load,
            unload,
            reload,
            instance,
            declared_version,
            loaded_at: Utc::now(),
            _image: image,
        }
    }

    /// The version the module declared during discovery.
    pub fn declared_version(&self) -> ModuleVersion {
        self.declared_version
    }

    /// When the binding was built.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub(crate) fn invoke_load(&mut self) -> BootstrapResult<()> {
        self.load.invoke(&mut self.instance)
    }

    pub(crate) fn invoke_unload(&mut self) -> BootstrapResult<()> {
        self.unload.invoke(&mut self.instance)
    }

    pub(crate) fn invoke_reload(&mut self) -> BootstrapResult<()> {
        self.reload.invoke(&mut self.instance)
    }
}

impl fmt::Debug for ModuleBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleBinding")
            .field("declared_version", &self.declared_version)
            .field("loaded_at", &self.loaded_at)
            .finish_non_exhaustive()
    }
}
