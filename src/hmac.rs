//! HMAC (§4.6, RFC 2104): a keyed-hash construction over any registered
//! hash. Key-derived buffers (the zero-padded key, inner/outer pads) live
//! in secure memory and are zeroized on free.

use zeroize::Zeroize;

use crate::driver::Phase;
use crate::error::OrdoError;
use crate::kernels::Hash;
use crate::registry::{self, HashId};
use crate::securemem::SecureBuffer;

pub struct HmacContext {
    hash_id: HashId,
    inner: Option<Box<dyn Hash>>,
    outer_pad: Option<SecureBuffer>,
    phase: Phase,
}

impl HmacContext {
    pub fn alloc(hash_id: HashId) -> Self {
        HmacContext {
            hash_id,
            inner: None,
            outer_pad: None,
            phase: Phase::Allocated,
        }
    }

    /// Pre-hashes `key` if it is longer than the hash's compression block
    /// length, zero-pads it to that length, and primes the inner digest
    /// with `key ⊕ 0x36`-repeated already absorbed.
    pub fn init(&mut self, key: &[u8]) -> Result<(), OrdoError> {
        let block_len = registry::hash_block_len(self.hash_id);
        let digest_len = registry::hash_digest_len(self.hash_id);

        let mut key_block = SecureBuffer::alloc(block_len)?;
        if key.len() > block_len {
            let mut hashed = vec![0u8; digest_len];
            registry::hash_new(self.hash_id).update_then_finalize(key, &mut hashed);
            key_block.as_mut_slice()[..digest_len].copy_from_slice(&hashed);
            hashed.zeroize();
        } else {
            key_block.as_mut_slice()[..key.len()].copy_from_slice(key);
        }

        let mut inner_pad = SecureBuffer::alloc(block_len)?;
        let mut outer_pad = SecureBuffer::alloc(block_len)?;
        for i in 0..block_len {
            let k = key_block.as_slice()[i];
            inner_pad.as_mut_slice()[i] = k ^ 0x36;
            outer_pad.as_mut_slice()[i] = k ^ 0x5c;
        }

        let mut inner_hash = registry::hash_new(self.hash_id);
        inner_hash.update(inner_pad.as_slice());

        self.inner = Some(inner_hash);
        self.outer_pad = Some(outer_pad);
        self.phase = Phase::Initialized;
        Ok(())
    }

    pub fn update(&mut self, buf: &[u8]) -> Result<(), OrdoError> {
        if !matches!(self.phase, Phase::Initialized | Phase::Updating) {
            return Err(OrdoError::Arg);
        }
        self.inner
            .as_mut()
            .expect("inner is Some while phase ∈ {Initialized, Updating}")
            .update(buf);
        self.phase = Phase::Updating;
        Ok(())
    }

    /// Finalizes the inner digest, then hashes `outer_pad || inner_digest`
    /// to produce the MAC.
    pub fn finalize(&mut self, mac: &mut [u8]) -> Result<(), OrdoError> {
        if !matches!(self.phase, Phase::Initialized | Phase::Updating) {
            return Err(OrdoError::Arg);
        }
        let inner = self
            .inner
            .take()
            .expect("inner is Some while phase ∈ {Initialized, Updating}");
        let digest_len = inner.digest_len();
        if mac.len() != digest_len {
            return Err(OrdoError::Arg);
        }
        let mut inner_digest = vec![0u8; digest_len];
        inner.finalize(&mut inner_digest);

        let outer_pad = self
            .outer_pad
            .take()
            .expect("outer_pad is Some while phase ∈ {Initialized, Updating}");
        let mut outer_hash = registry::hash_new(self.hash_id);
        outer_hash.update(outer_pad.as_slice());
        outer_hash.update(&inner_digest);
        outer_hash.finalize(mac);

        inner_digest.zeroize();
        self.phase = Phase::Finalized;
        Ok(())
    }
}

/// Convenience extension used internally for the key pre-hash step, where
/// the hash is used exactly once and discarded.
trait UpdateThenFinalize {
    fn update_then_finalize(self, data: &[u8], out: &mut [u8]);
}

impl UpdateThenFinalize for Box<dyn Hash> {
    fn update_then_finalize(mut self, data: &[u8], out: &mut [u8]) {
        self.update(data);
        self.finalize(out);
    }
}

/// One-shot HMAC, used by [`crate::pbkdf2`] and the façade.
pub fn hmac_oneshot(hash_id: HashId, key: &[u8], msg: &[u8], mac: &mut [u8]) -> Result<(), OrdoError> {
    let mut ctx = HmacContext::alloc(hash_id);
    ctx.init(key)?;
    ctx.update(msg)?;
    ctx.finalize(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc2202_sha1_vector() {
        let mut mac = vec![0u8; 20];
        hmac_oneshot(
            HashId::Sha1,
            b"key",
            b"The quick brown fox jumps over the lazy dog",
            &mut mac,
        )
        .unwrap();
        assert_eq!(hex::encode(mac), "de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9");
    }

    #[test]
    fn long_key_is_prehashed() {
        let long_key = vec![0xAAu8; 200];
        let mut mac = vec![0u8; 32];
        hmac_oneshot(HashId::Sha256, &long_key, b"msg", &mut mac).unwrap();
        assert!(mac.iter().any(|&b| b != 0));
    }

    #[test]
    fn streaming_split_matches_oneshot() {
        let mut whole = vec![0u8; 32];
        hmac_oneshot(HashId::Sha256, b"key", b"hello world of hmac", &mut whole).unwrap();

        let mut ctx = HmacContext::alloc(HashId::Sha256);
        ctx.init(b"key").unwrap();
        ctx.update(b"hello ").unwrap();
        ctx.update(b"world of hmac").unwrap();
        let mut split = vec![0u8; 32];
        ctx.finalize(&mut split).unwrap();

        assert_eq!(whole, split);
    }
}
