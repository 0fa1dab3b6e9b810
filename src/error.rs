//! Stable error vocabulary for the Ordo core.
//!
//! Every fallible operation in the library returns a [`Result<T, OrdoError>`].
//! Each variant also carries a stable nonzero status code (`code()`) matching
//! the original C API's `ORDO_*` constants, for callers that bridge to a
//! numeric ABI.

use thiserror::Error;

/// Nonzero status codes, stable across releases. `ORDO_SUCCESS` itself has
/// no variant here since success is represented by `Ok(())`.
pub mod status {
    pub const ORDO_FAIL: i32 = -1;
    pub const ORDO_LEFTOVER: i32 = -2;
    pub const ORDO_KEY_LEN: i32 = -3;
    pub const ORDO_PADDING: i32 = -4;
    pub const ORDO_ARG: i32 = -5;
    pub const ORDO_ALLOC: i32 = -6;
}

/// The error type returned by every fallible Ordo operation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OrdoError {
    /// Generic failure (OS error, CSPRNG exhausted, etc).
    #[error("operation failed")]
    Fail,
    /// Finalization without padding received input that wasn't a multiple
    /// of the block size.
    #[error("leftover bytes at finalization with padding disabled")]
    Leftover,
    /// Requested key length isn't admissible for the primitive.
    #[error("key length not admissible for this primitive")]
    KeyLen,
    /// PKCS-style padding failed to validate on decrypt.
    #[error("padding verification failed")]
    Padding,
    /// Malformed argument: wrong primitive type, bad IV length, nil params, etc.
    #[error("invalid argument")]
    Arg,
    /// Allocation failure (including secure-memory allocation/locking failure).
    #[error("allocation failed")]
    Alloc,
}

impl OrdoError {
    /// The stable numeric status code for this error, matching the
    /// original `ORDO_*` constants. Always nonzero.
    pub const fn code(self) -> i32 {
        match self {
            OrdoError::Fail => status::ORDO_FAIL,
            OrdoError::Leftover => status::ORDO_LEFTOVER,
            OrdoError::KeyLen => status::ORDO_KEY_LEN,
            OrdoError::Padding => status::ORDO_PADDING,
            OrdoError::Arg => status::ORDO_ARG,
            OrdoError::Alloc => status::ORDO_ALLOC,
        }
    }
}

impl From<OrdoError> for i32 {
    fn from(e: OrdoError) -> i32 {
        e.code()
    }
}

/// Success sentinel for code bridging `Result<(), OrdoError>` down to the
/// original integer ABI.
pub const ORDO_SUCCESS: i32 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_nonzero_and_distinct() {
        let all = [
            OrdoError::Fail,
            OrdoError::Leftover,
            OrdoError::KeyLen,
            OrdoError::Padding,
            OrdoError::Arg,
            OrdoError::Alloc,
        ];
        for e in all {
            assert_ne!(e.code(), ORDO_SUCCESS);
        }
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }
}
