//! Streaming state-machine drivers: the digest driver, the stream-encrypt
//! driver, the block-mode drivers, and the block-encrypt driver that
//! composes a block cipher with a mode. Kernels (see [`crate::kernels`])
//! are pure transforms; drivers hold phase and buffered state and decide
//! when to call into them.

pub mod block_encrypt;
pub mod mode;

use crate::error::OrdoError;
use crate::kernels::hash::skein256::SkeinParams;
use crate::kernels::{Hash, StreamCipher};
use crate::registry::{self, HashId, StreamCipherId};

/// A streaming context's lifecycle phase (§3: Allocated → Initialized →
/// Updating → Finalized). There is no explicit `Freed` variant: in Rust,
/// freeing is `Drop`, which runs after a context can no longer be named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Allocated,
    Initialized,
    Updating,
    Finalized,
}

impl Phase {
    fn accepts_update(self) -> bool {
        matches!(self, Phase::Initialized | Phase::Updating)
    }
}

/// Streaming hash state machine over any registered hash (§4.2).
pub struct DigestContext {
    hash_id: HashId,
    state: Option<Box<dyn Hash>>,
    phase: Phase,
}

impl DigestContext {
    pub fn alloc(hash_id: HashId) -> Self {
        DigestContext {
            hash_id,
            state: None,
            phase: Phase::Allocated,
        }
    }

    /// `params` selects Skein-256's output length; ignored for every other
    /// hash. `None` selects the primitive's default.
    pub fn init(&mut self, params: Option<SkeinParams>) -> Result<(), OrdoError> {
        let state: Box<dyn Hash> = match (self.hash_id, params) {
            (HashId::Skein256, Some(p)) => {
                Box::new(crate::kernels::hash::skein256::Skein256::with_params(p))
            }
            _ => registry::hash_new(self.hash_id),
        };
        self.state = Some(state);
        self.phase = Phase::Initialized;
        Ok(())
    }

    /// `buf` may be empty; the call is always legal in {Initialized, Updating}.
    pub fn update(&mut self, buf: &[u8]) -> Result<(), OrdoError> {
        if !self.phase.accepts_update() {
            return Err(OrdoError::Arg);
        }
        self.state
            .as_mut()
            .expect("state is Some while phase ∈ {Initialized, Updating}")
            .update(buf);
        self.phase = Phase::Updating;
        Ok(())
    }

    /// Writes exactly `digest_length(hash)` bytes to `out`.
    pub fn finalize(&mut self, out: &mut [u8]) -> Result<(), OrdoError> {
        if !self.phase.accepts_update() {
            return Err(OrdoError::Arg);
        }
        let state = self
            .state
            .take()
            .expect("state is Some while phase ∈ {Initialized, Updating}");
        if out.len() != state.digest_len() {
            return Err(OrdoError::Arg);
        }
        state.finalize(out);
        self.phase = Phase::Finalized;
        Ok(())
    }

    /// Independent deep copy: continuing `src` afterwards does not affect
    /// the clone, and vice versa.
    pub fn try_clone(&self) -> Self {
        DigestContext {
            hash_id: self.hash_id,
            state: self.state.as_ref().map(|h| h.clone_box()),
            phase: self.phase,
        }
    }

    pub fn digest_len(&self) -> usize {
        registry::hash_digest_len(self.hash_id)
    }
}

/// Streaming stream-cipher state machine (§4.3): identical phases to the
/// digest driver, but `update` transforms its buffer in place and there is
/// no `final` output.
pub struct StreamEncryptContext {
    cipher_id: StreamCipherId,
    state: Option<Box<dyn StreamCipher>>,
    phase: Phase,
}

impl StreamEncryptContext {
    pub fn alloc(cipher_id: StreamCipherId) -> Self {
        StreamEncryptContext {
            cipher_id,
            state: None,
            phase: Phase::Allocated,
        }
    }

    pub fn init(&mut self, key: &[u8]) -> Result<(), OrdoError> {
        let limits = registry::stream_cipher_limits(self.cipher_id);
        if key.len() < limits.key_min || key.len() > limits.key_max {
            return Err(OrdoError::KeyLen);
        }
        self.state = Some(registry::stream_cipher_new(self.cipher_id, key));
        self.phase = Phase::Initialized;
        Ok(())
    }

    /// `buf` is transformed in place; `len=0` is a legal no-op.
    pub fn update(&mut self, buf: &mut [u8]) -> Result<(), OrdoError> {
        if !self.phase.accepts_update() {
            return Err(OrdoError::Arg);
        }
        if !buf.is_empty() {
            self.state
                .as_mut()
                .expect("state is Some while phase ∈ {Initialized, Updating}")
                .apply_keystream(buf);
        }
        self.phase = Phase::Updating;
        Ok(())
    }

    pub fn try_clone(&self) -> Self {
        StreamEncryptContext {
            cipher_id: self.cipher_id,
            state: self.state.as_ref().map(|s| s.clone_box()),
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_update_before_init_fails() {
        let mut ctx = DigestContext::alloc(HashId::Sha256);
        assert_eq!(ctx.update(b"x"), Err(OrdoError::Arg));
    }

    #[test]
    fn digest_final_from_initialized_hashes_empty_message() {
        let mut ctx = DigestContext::alloc(HashId::Sha256);
        ctx.init(None).unwrap();
        let mut out = vec![0u8; 32];
        ctx.finalize(&mut out).unwrap();
        assert_eq!(
            hex::encode(out),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_update_after_final_fails() {
        let mut ctx = DigestContext::alloc(HashId::Sha256);
        ctx.init(None).unwrap();
        let mut out = vec![0u8; 32];
        ctx.finalize(&mut out).unwrap();
        assert_eq!(ctx.update(b"x"), Err(OrdoError::Arg));
    }

    #[test]
    fn digest_copy_is_independent() {
        let mut src = DigestContext::alloc(HashId::Sha256);
        src.init(None).unwrap();
        src.update(b"shared prefix").unwrap();
        let mut dst = src.try_clone();

        src.update(b" and src-only suffix").unwrap();
        let mut src_out = vec![0u8; 32];
        src.finalize(&mut src_out).unwrap();

        let mut dst_out = vec![0u8; 32];
        dst.finalize(&mut dst_out).unwrap();

        assert_ne!(src_out, dst_out);
    }

    #[test]
    fn stream_encrypt_empty_update_is_noop() {
        let mut ctx = StreamEncryptContext::alloc(StreamCipherId::Rc4);
        ctx.init(b"0123456789abcdef").unwrap();
        let mut empty: [u8; 0] = [];
        ctx.update(&mut empty).unwrap();
    }

    #[test]
    fn stream_encrypt_bad_key_length_fails() {
        let mut ctx = StreamEncryptContext::alloc(StreamCipherId::Rc4);
        assert_eq!(ctx.init(&[]), Err(OrdoError::KeyLen));
    }
}
