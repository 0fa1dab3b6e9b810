//! Environment probe: OS family, word size, and a version record exposed
//! to callers, matching the original `ordoBuildInfo()` shape
//! (`ordo/src/common/version.c`).

/// A build/version record, populated once by [`crate::init`].
#[derive(Debug, Clone)]
pub struct Version {
    /// Monotonic id, bumped each time [`crate::init`] runs. Lets callers
    /// detect whether the library has already been initialized.
    pub id: u64,
    /// Crate version, `major.minor.rev`.
    pub version: &'static str,
    /// `"Debug"` or `"Release"`, from `cfg!(debug_assertions)`.
    pub build: &'static str,
    /// `"Linux"` / `"Windows"` / `"macOS"` / `"generic"`.
    pub system: &'static str,
    /// `std::env::consts::ARCH`, e.g. `"x86_64"`.
    pub arch: &'static str,
    /// Human-readable feature list, currently always empty: no hardware
    /// acceleration path (AES-NI, SHA extensions) is implemented.
    pub feature_list: &'static str,
    /// Same information as `feature_list`, as a list of individual names.
    pub features: &'static [&'static str],
}

fn system_name() -> &'static str {
    if cfg!(target_os = "linux") {
        "Linux"
    } else if cfg!(target_os = "windows") {
        "Windows"
    } else if cfg!(target_os = "macos") {
        "macOS"
    } else if cfg!(unix) {
        "generic-unix"
    } else {
        "generic"
    }
}

/// Probes the current environment and builds a [`Version`] record.
/// `id` is supplied by the caller (the process-wide init counter).
pub(crate) fn probe(id: u64) -> Version {
    Version {
        id,
        version: env!("CARGO_PKG_VERSION"),
        build: if cfg!(debug_assertions) {
            "Debug"
        } else {
            "Release"
        },
        system: system_name(),
        arch: std::env::consts::ARCH,
        feature_list: "",
        features: &[],
    }
}
