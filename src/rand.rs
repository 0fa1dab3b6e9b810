//! OS-provided CSPRNG adapter.
//!
//! A cross-platform wrapper around the operating system's entropy pool:
//! reads `/dev/urandom` in a loop on POSIX (via the OS's native
//! `getrandom`/`/dev/urandom` path), acquires a CSP and calls
//! `CryptGenRandom` on Windows (see `ordo/src/random/random.c` in the
//! original source for the contract this mirrors). Platforms without a
//! source always fail with [`OrdoError::Fail`].

use crate::error::OrdoError;

/// Fills `out` with cryptographically secure pseudorandom bytes, or fails
/// with [`OrdoError::Fail`] if the OS entropy source is unavailable or
/// exhausted partway through.
///
/// `ordo_random` is identical to `os_random`: no extra mixing is applied
/// here (see spec's Open Questions, the name is reserved for a future
/// DRBG, not implemented in this revision).
pub fn os_random(out: &mut [u8]) -> Result<(), OrdoError> {
    getrandom::getrandom(out).map_err(|e| {
        log::error!("os_random: entropy source failed: {e}");
        OrdoError::Fail
    })
}

/// Identical to [`os_random`]; see spec's Open Questions on `ordo_random`
/// vs `os_random`.
pub fn ordo_random(out: &mut [u8]) -> Result<(), OrdoError> {
    os_random(out)
}
