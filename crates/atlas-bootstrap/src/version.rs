//! Version compatibility gate.

pub use atlas_module_sdk::ModuleVersion;

/// Module versions this loader accepts.
pub const SUPPORTED_VERSIONS: &[ModuleVersion] = &[ModuleVersion::new(1, 0, 0, 0)];

/// Decide whether a declared module version is acceptable.
///
/// Compatible when `allow_incompatible` is set, or when at least one entry
/// in `supported` is greater than or equal to `declared`. The gate is
/// intentionally permissive: any sufficiently new supported entry passes,
/// not only an exact match. Callers that want exact-match semantics must
/// pre-filter `supported` themselves.
pub fn is_compatible(
    declared: ModuleVersion,
    supported: &[ModuleVersion],
    allow_incompatible: bool,
) -> bool {
    allow_incompatible || supported.iter().any(|version| *version >= declared)
}
