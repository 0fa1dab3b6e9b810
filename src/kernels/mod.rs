//! Primitive kernels: the pure mathematical transforms behind each
//! registered algorithm. Kernels hold no notion of streaming phase, padding,
//! or IV bookkeeping, that is the drivers' job (see [`crate::driver`] and
//! [`crate::driver::mode`]). A kernel only knows how to expand a key and
//! permute or absorb bytes.

pub mod block;
pub mod hash;
pub mod stream;

/// A block cipher's forward/inverse permutation, keyed at construction.
/// Implementations assume the key length was already validated by the
/// caller against the primitive's [`crate::registry::Limits`].
pub trait BlockCipher: Send {
    /// Size in bytes of the block this cipher permutes.
    fn block_size(&self) -> usize;
    /// Encrypts exactly one block in place.
    fn encrypt_block(&self, block: &mut [u8]);
    /// Decrypts exactly one block in place.
    fn decrypt_block(&self, block: &mut [u8]);
    /// Produces an independent deep copy of the key schedule.
    fn clone_box(&self) -> Box<dyn BlockCipher>;
}

/// A stream cipher's keystream generator, keyed at construction.
pub trait StreamCipher: Send {
    /// XORs the next `buf.len()` keystream bytes into `buf`, advancing
    /// internal state by that many bytes.
    fn apply_keystream(&mut self, buf: &mut [u8]);
    /// Produces an independent deep copy of the keystream state.
    fn clone_box(&self) -> Box<dyn StreamCipher>;
}

/// A hash function's compression state, reset at construction.
pub trait Hash: Send {
    /// Absorbs `data` into the running state. May be called any number of
    /// times with arbitrary chunk boundaries.
    fn update(&mut self, data: &[u8]);
    /// Finalizes the hash, writing exactly [`Hash::digest_len`] bytes to
    /// `out`. Consumes the state: Ordo never resumes a finalized hash.
    fn finalize(self: Box<Self>, out: &mut [u8]);
    /// Produces an independent deep copy of the running state.
    fn clone_box(&self) -> Box<dyn Hash>;
    /// Output length in bytes.
    fn digest_len(&self) -> usize;
    /// Compression block length in bytes (the HMAC/PBKDF2 "block size").
    fn block_len(&self) -> usize;
}
