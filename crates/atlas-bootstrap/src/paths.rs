//! Canonical directory and file layout the loader depends on.
//!
//! The layout lives under `<server folder>/atlas/<instance id>/` where the
//! server folder is the parent of the engine data folder. Every location is
//! resolved once, at table construction; directories are only created on
//! demand by [`PathTable::ensure_directories`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BootstrapError, BootstrapResult};

/// Name of the root folder the loader owns under the server folder.
const ATLAS_FOLDER_NAME: &str = "atlas";

/// Semantic locations the loader depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKey {
    CommonAppDataFolder,
    LocalAppDataFolder,
    AppDataFolder,
    EngineDataFolder,
    EnginePersistentDataFolder,

    ServerFolder,
    AtlasFolder,
    MainFolder,
    PluginFolder,
    ConfigFolder,
    PluginConfigFolder,
    DependencyFolder,

    MainModuleBinary,
    HostPluginBinary,
}

impl PathKey {
    /// Every key, in layout order.
    pub const ALL: [PathKey; 14] = [
        PathKey::CommonAppDataFolder,
        PathKey::LocalAppDataFolder,
        PathKey::AppDataFolder,
        PathKey::EngineDataFolder,
        PathKey::EnginePersistentDataFolder,
        PathKey::ServerFolder,
        PathKey::AtlasFolder,
        PathKey::MainFolder,
        PathKey::PluginFolder,
        PathKey::ConfigFolder,
        PathKey::PluginConfigFolder,
        PathKey::DependencyFolder,
        PathKey::MainModuleBinary,
        PathKey::HostPluginBinary,
    ];

    /// Whether the key names a file rather than a directory.
    pub fn is_file(self) -> bool {
        matches!(self, PathKey::MainModuleBinary | PathKey::HostPluginBinary)
    }
}

/// Well-known root folders the table is derived from.
///
/// Discovering these belongs to the embedding host; the loader only consumes
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootFolders {
    pub common_app_data: PathBuf,
    pub local_app_data: PathBuf,
    pub app_data: PathBuf,
    pub engine_data: PathBuf,
    pub engine_persistent_data: PathBuf,
    pub host_plugin_folder: PathBuf,
}

impl RootFolders {
    /// Fill the application-data roots from the platform's well-known
    /// folders, leaving the engine-specific roots to the caller.
    pub fn discover(
        engine_data: PathBuf,
        engine_persistent_data: PathBuf,
        host_plugin_folder: PathBuf,
    ) -> Self {
        let common_app_data = if cfg!(target_os = "windows") {
            std::env::var_os("ProgramData")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("C:\\ProgramData"))
        } else {
            PathBuf::from("/var/lib")
        };
        let fallback = engine_persistent_data.clone();

        Self {
            common_app_data,
            local_app_data: dirs::data_local_dir().unwrap_or_else(|| fallback.clone()),
            app_data: dirs::data_dir().unwrap_or_else(|| fallback.clone()),
            engine_data,
            engine_persistent_data,
            host_plugin_folder,
        }
    }
}

/// Immutable table mapping every [`PathKey`] to its resolved path.
///
/// One field per location: a key that resolves to nothing is
/// unrepresentable, so [`PathTable::get`] is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTable {
    common_app_data: PathBuf,
    local_app_data: PathBuf,
    app_data: PathBuf,
    engine_data: PathBuf,
    engine_persistent_data: PathBuf,
    server: PathBuf,
    atlas: PathBuf,
    main: PathBuf,
    plugins: PathBuf,
    configs: PathBuf,
    plugin_configs: PathBuf,
    dependencies: PathBuf,
    main_module_binary: PathBuf,
    host_plugin_binary: PathBuf,
}

impl PathTable {
    /// Build the table for one instance. Pure: a function of its inputs,
    /// with no filesystem access.
    pub fn build(roots: RootFolders, instance_id: u16) -> BootstrapResult<Self> {
        let server = roots
            .engine_data
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| BootstrapError::MissingParentDirectory {
                path: roots.engine_data.clone(),
                source: None,
            })?;

        let atlas = server.join(ATLAS_FOLDER_NAME);
        let main = atlas.join(instance_id.to_string());
        let plugins = main.join("plugins");
        let configs = main.join("configs");
        let plugin_configs = configs.join("plugins");
        let dependencies = main.join("dependencies");
        let main_module_binary = main.join(main_module_file_name());
        let host_plugin_binary = roots.host_plugin_folder.join(host_plugin_file_name());

        Ok(Self {
            common_app_data: roots.common_app_data,
            local_app_data: roots.local_app_data,
            app_data: roots.app_data,
            engine_data: roots.engine_data,
            engine_persistent_data: roots.engine_persistent_data,
            server,
            atlas,
            main,
            plugins,
            configs,
            plugin_configs,
            dependencies,
            main_module_binary,
            host_plugin_binary,
        })
    }

    /// Resolve one key.
    pub fn get(&self, key: PathKey) -> &Path {
        match key {
            PathKey::CommonAppDataFolder => &self.common_app_data,
            PathKey::LocalAppDataFolder => &self.local_app_data,
            PathKey::AppDataFolder => &self.app_data,
            PathKey::EngineDataFolder => &self.engine_data,
            PathKey::EnginePersistentDataFolder => &self.engine_persistent_data,
            PathKey::ServerFolder => &self.server,
            PathKey::AtlasFolder => &self.atlas,
            PathKey::MainFolder => &self.main,
            PathKey::PluginFolder => &self.plugins,
            PathKey::ConfigFolder => &self.configs,
            PathKey::PluginConfigFolder => &self.plugin_configs,
            PathKey::DependencyFolder => &self.dependencies,
            PathKey::MainModuleBinary => &self.main_module_binary,
            PathKey::HostPluginBinary => &self.host_plugin_binary,
        }
    }

    /// Iterate over every `(key, path)` pair in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (PathKey, &Path)> {
        PathKey::ALL.iter().map(move |key| (*key, self.get(*key)))
    }

    /// Create every directory-type path that does not exist yet.
    ///
    /// File-type paths are skipped; directories that already exist are left
    /// untouched.
    pub fn ensure_directories(&self) -> BootstrapResult<()> {
        for (key, path) in self.iter() {
            if key.is_file() || path.exists() {
                continue;
            }
            fs::create_dir_all(path).map_err(|source| BootstrapError::MissingParentDirectory {
                path: path.to_path_buf(),
                source: Some(source),
            })?;
            debug!(path = %path.display(), "created module folder");
        }
        Ok(())
    }
}

/// Platform file name of the main module binary inside the instance folder.
pub fn main_module_file_name() -> String {
    shared_library_file_name("main")
}

/// Platform file name of the loader's own host-side plugin binary.
pub fn host_plugin_file_name() -> String {
    shared_library_file_name("atlas_bootstrap")
}

fn shared_library_file_name(stem: &str) -> String {
    format!(
        "{}{}{}",
        std::env::consts::DLL_PREFIX,
        stem,
        std::env::consts::DLL_SUFFIX
    )
}
