//! Minimal loadable module for smoke-testing the bootstrap loader.
//!
//! Exports the full entry contract through [`declare_module!`]; the loader's
//! native integration tests copy the built library into a scratch instance
//! folder and drive it end to end.

use atlas_module_sdk::prelude::*;

/// Counts lifecycle transitions.
#[derive(Debug, Default)]
pub struct SmokeModule {
    loads: u32,
    unloads: u32,
    reloads: u32,
}

impl ModuleLifecycle for SmokeModule {
    fn load(&mut self) -> ModuleResult<()> {
        self.loads += 1;
        Ok(())
    }

    fn unload(&mut self) -> ModuleResult<()> {
        if self.loads == 0 {
            return Err(ModuleError::InvalidState("unload before load".into()));
        }
        self.unloads += 1;
        Ok(())
    }

    fn reload(&mut self) -> ModuleResult<()> {
        self.reloads += 1;
        Ok(())
    }
}

declare_module!(SmokeModule, version = (1, 0, 0, 0));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_counted() {
        let mut module = SmokeModule::default();
        module.load().unwrap();
        module.unload().unwrap();
        module.reload().unwrap();
        assert_eq!((module.loads, module.unloads, module.reloads), (1, 1, 1));
    }

    #[test]
    fn test_unload_before_load_is_rejected() {
        let mut module = SmokeModule::default();
        assert!(module.unload().is_err());
    }
}
