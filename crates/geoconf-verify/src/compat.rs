// crates/geoconf-verify/src/compat.rs
//
// Compatibility rules between two geometry configuration records.
//
// Only the detector name takes part in the decision. The configuration text
// legitimately differs between compatible jobs (absolute paths, search
// paths) and is carried for diagnostics only.

use geoconf_core::error::Incompatibility;
use geoconf_core::record::ConfigurationRecord;

/// Decides whether two configuration records describe compatible geometries.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompatibilityChecker;

impl CompatibilityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Compare `a` against `b`, reporting the first failed check.
    ///
    /// Checks, in order: `a` is valid, `b` is valid, detector names are
    /// byte-for-byte equal.
    pub fn compare(
        &self,
        a: &ConfigurationRecord,
        b: &ConfigurationRecord,
    ) -> Result<(), Incompatibility> {
        let verdict = Self::check(a, b);
        match &verdict {
            Ok(()) => tracing::debug!(
                "Geometry configurations compatible (detector '{}')",
                a.detector_name
            ),
            Err(reason) => tracing::debug!("Geometry configurations incompatible: {}", reason),
        }
        verdict
    }

    /// Shorthand for `compare(a, b).is_ok()`.
    pub fn is_compatible(&self, a: &ConfigurationRecord, b: &ConfigurationRecord) -> bool {
        self.compare(a, b).is_ok()
    }

    fn check(a: &ConfigurationRecord, b: &ConfigurationRecord) -> Result<(), Incompatibility> {
        if !a.is_valid() {
            return Err(Incompatibility::InvalidA);
        }
        if !b.is_valid() {
            return Err(Incompatibility::InvalidB);
        }

        // Rules of every version up to the common one apply; both are >= 1 here.
        let common_version = a.data_version.min(b.data_version);
        debug_assert!(common_version >= 1);

        // version 1+
        if a.detector_name != b.detector_name {
            return Err(Incompatibility::DetectorNameMismatch {
                a: a.detector_name.clone(),
                b: b.detector_name.clone(),
            });
        }

        Ok(())
    }
}
