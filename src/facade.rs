//! High-level façade (§4.10): one-shot helpers that allocate, init, update
//! once, finalize, and free a driver in a single call. Each validates that
//! the supplied identifier names a primitive of the expected family,
//! failing with [`OrdoError::Arg`] otherwise, e.g. passing a block cipher
//! identifier to [`ordo_digest`] fails rather than silently misbehaving.

use crate::driver::block_encrypt::{BlockEncryptContext, EcbParams};
use crate::driver::mode::Direction;
use crate::driver::{DigestContext, StreamEncryptContext};
use crate::error::OrdoError;
use crate::hmac::HmacContext;
use crate::pbkdf2;
use crate::registry::{BlockCipherId, HashId, ModeId, StreamCipherId};

/// A type-erased primitive reference, mirroring the original design's
/// single dense identifier namespace. Every façade entry point validates
/// that the variant it receives matches the operation it performs.
#[derive(Debug, Clone, Copy)]
pub enum PrimitiveId {
    Hash(HashId),
    BlockCipher(BlockCipherId),
    StreamCipher(StreamCipherId),
    Mode(ModeId),
}

fn expect_hash(id: PrimitiveId) -> Result<HashId, OrdoError> {
    match id {
        PrimitiveId::Hash(h) => Ok(h),
        _ => Err(OrdoError::Arg),
    }
}

fn expect_block_cipher(id: PrimitiveId) -> Result<BlockCipherId, OrdoError> {
    match id {
        PrimitiveId::BlockCipher(c) => Ok(c),
        _ => Err(OrdoError::Arg),
    }
}

fn expect_stream_cipher(id: PrimitiveId) -> Result<StreamCipherId, OrdoError> {
    match id {
        PrimitiveId::StreamCipher(c) => Ok(c),
        _ => Err(OrdoError::Arg),
    }
}

fn expect_mode(id: PrimitiveId) -> Result<ModeId, OrdoError> {
    match id {
        PrimitiveId::Mode(m) => Ok(m),
        _ => Err(OrdoError::Arg),
    }
}

/// One-shot digest: `out` must be exactly `digest_length(hash)` bytes.
pub fn ordo_digest(hash: PrimitiveId, msg: &[u8], out: &mut [u8]) -> Result<(), OrdoError> {
    let hash_id = expect_hash(hash)?;
    let mut ctx = DigestContext::alloc(hash_id);
    ctx.init(None)?;
    ctx.update(msg)?;
    ctx.finalize(out)
}

/// One-shot HMAC.
pub fn ordo_hmac(hash: PrimitiveId, key: &[u8], msg: &[u8], mac: &mut [u8]) -> Result<(), OrdoError> {
    let hash_id = expect_hash(hash)?;
    let mut ctx = HmacContext::alloc(hash_id);
    ctx.init(key)?;
    ctx.update(msg)?;
    ctx.finalize(mac)
}

/// One-shot block-cipher-mode encrypt/decrypt. `out` is cleared and filled
/// with exactly the bytes the mode driver emits across update+final.
#[allow(clippy::too_many_arguments)]
pub fn ordo_enc_block(
    cipher: PrimitiveId,
    mode: PrimitiveId,
    key: &[u8],
    iv: &[u8],
    direction: Direction,
    params: EcbParams,
    input: &[u8],
    out: &mut Vec<u8>,
) -> Result<(), OrdoError> {
    let cipher_id = expect_block_cipher(cipher)?;
    let mode_id = expect_mode(mode)?;
    out.clear();
    let mut ctx = BlockEncryptContext::alloc(cipher_id, mode_id);
    ctx.init(key, iv, direction, params)?;
    ctx.update(input, out)?;
    ctx.finalize(out)
}

/// One-shot stream-cipher encrypt/decrypt, in place.
pub fn ordo_enc_stream(cipher: PrimitiveId, key: &[u8], buf: &mut [u8]) -> Result<(), OrdoError> {
    let cipher_id = expect_stream_cipher(cipher)?;
    let mut ctx = StreamEncryptContext::alloc(cipher_id);
    ctx.init(key)?;
    ctx.update(buf)
}

/// One-shot PBKDF2.
pub fn ordo_pbkdf2(
    hash: PrimitiveId,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    out: &mut [u8],
) -> Result<(), OrdoError> {
    let hash_id = expect_hash(hash)?;
    pbkdf2::pbkdf2(hash_id, password, salt, iterations, out)
}
