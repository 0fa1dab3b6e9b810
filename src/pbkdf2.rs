//! PBKDF2 (§4.7, RFC 2898): context-free iterated key derivation over
//! HMAC.

use crate::error::OrdoError;
use crate::hmac::hmac_oneshot;
use crate::registry::{self, HashId};
use crate::util::xor_buf;

pub fn pbkdf2(
    hash_id: HashId,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    out: &mut [u8],
) -> Result<(), OrdoError> {
    if iterations == 0 {
        return Err(OrdoError::Arg);
    }
    let digest_len = registry::hash_digest_len(hash_id);
    let block_count = out.len().div_ceil(digest_len).max(1);

    for block_index in 1..=block_count as u32 {
        let mut salt_block = salt.to_vec();
        salt_block.extend_from_slice(&block_index.to_be_bytes());

        let mut u = vec![0u8; digest_len];
        hmac_oneshot(hash_id, password, &salt_block, &mut u)?;
        let mut t = u.clone();

        for _ in 1..iterations {
            let mut next = vec![0u8; digest_len];
            hmac_oneshot(hash_id, password, &u, &mut next)?;
            u = next;
            xor_buf(&mut t, &u);
        }

        let offset = (block_index as usize - 1) * digest_len;
        let end = (offset + digest_len).min(out.len());
        if offset < out.len() {
            out[offset..end].copy_from_slice(&t[..end - offset]);
        }
    }
    Ok(())
}
