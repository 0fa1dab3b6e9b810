//! Leaf utilities: constant-time comparison, buffer XOR, counter increment,
//! and PKCS-style block padding.

use subtle::ConstantTimeEq;

use crate::error::OrdoError;

/// Constant-time comparison: returns `true` iff `a` and `b` have equal
/// length and agree on every byte. Timing is independent of the position
/// of the first differing byte (delegates to `subtle`'s bitwise-OR
/// accumulator, never short-circuiting).
pub fn ctcmp(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// XORs `keystream` into `buf` in place, one byte at a time. `keystream`
/// must be at least as long as `buf`.
pub fn xor_buf(buf: &mut [u8], keystream: &[u8]) {
    debug_assert!(keystream.len() >= buf.len());
    for (b, k) in buf.iter_mut().zip(keystream.iter()) {
        *b ^= k;
    }
}

/// Increments a little-endian counter buffer of arbitrary length by one,
/// propagating carry across bytes and wrapping silently on overflow.
pub fn inc_buffer(counter: &mut [u8]) {
    for byte in counter.iter_mut() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            return;
        }
    }
}

/// Computes the PKCS-style pad length for a message of length `len` against
/// block size `block_size`: `p = block_size - (len mod block_size)`, always
/// in `1..=block_size`.
pub fn pad_len(len: usize, block_size: usize) -> usize {
    block_size - (len % block_size)
}

/// Appends PKCS-style padding to `buf`: `p` bytes of value `p`, where
/// `p = block_size - (buf.len() mod block_size)`.
pub fn pkcs_pad(buf: &mut Vec<u8>, block_size: usize) {
    let p = pad_len(buf.len(), block_size);
    buf.resize(buf.len() + p, p as u8);
}

/// Validates and strips PKCS-style padding from the final block of a
/// decrypted buffer. `block` must be exactly `block_size` bytes, and is the
/// last plaintext block produced by decryption. Returns the number of
/// padding bytes to truncate from the overall output, or
/// [`OrdoError::Padding`] if the padding is malformed.
///
/// All `p` trailing bytes are checked before any branch on validity, per
/// spec.md's guidance to reduce padding-oracle timing signal.
pub fn pkcs_unpad_len(block: &[u8], block_size: usize) -> Result<usize, OrdoError> {
    debug_assert_eq!(block.len(), block_size);
    let p = *block.last().unwrap() as usize;
    let in_range = p >= 1 && p <= block_size;
    let check_len = if in_range { p } else { block_size };
    let start = block_size - check_len;
    let mut mismatch = 0u8;
    for &byte in &block[start..] {
        mismatch |= byte ^ (p as u8);
    }
    if in_range && mismatch == 0 {
        Ok(p)
    } else {
        Err(OrdoError::Padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctcmp_matches_and_mismatches() {
        assert!(ctcmp(b"abc", b"abc"));
        assert!(!ctcmp(b"abc", b"abd"));
        assert!(!ctcmp(b"abc", b"ab"));
    }

    #[test]
    fn xor_buf_roundtrip() {
        let key = [0xAA, 0xBB, 0xCC, 0xDD];
        let mut data = *b"test";
        xor_buf(&mut data, &key);
        xor_buf(&mut data, &key);
        assert_eq!(&data, b"test");
    }

    #[test]
    fn inc_buffer_carries() {
        let mut c = [0xFF, 0x00, 0x00];
        inc_buffer(&mut c);
        assert_eq!(c, [0x00, 0x01, 0x00]);
    }

    #[test]
    fn inc_buffer_wraps_silently() {
        let mut c = [0xFF, 0xFF, 0xFF];
        inc_buffer(&mut c);
        assert_eq!(c, [0x00, 0x00, 0x00]);
    }

    #[test]
    fn pad_then_unpad_roundtrips() {
        let mut buf = b"hello".to_vec();
        let orig_len = buf.len();
        pkcs_pad(&mut buf, 16);
        assert_eq!(buf.len() % 16, 0);
        let last_block = &buf[buf.len() - 16..];
        let p = pkcs_unpad_len(last_block, 16).unwrap();
        assert_eq!(buf.len() - p, orig_len);
    }

    #[test]
    fn pad_full_block_adds_full_block() {
        let mut buf = vec![0u8; 16];
        pkcs_pad(&mut buf, 16);
        assert_eq!(buf.len(), 32);
        assert!(buf[16..].iter().all(|&b| b == 16));
    }

    #[test]
    fn unpad_rejects_bad_padding() {
        let block = [0u8; 16];
        assert!(pkcs_unpad_len(&block, 16).is_err());
        let mut block2 = [5u8; 16];
        block2[13] = 0;
        assert!(pkcs_unpad_len(&block2, 16).is_err());
    }
}
