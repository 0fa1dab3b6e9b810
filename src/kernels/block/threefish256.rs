//! Threefish-256 (Skein v1.3), a 256-bit tweakable block cipher. Exposes a
//! word-level core ([`encrypt_words`]/[`decrypt_words`]) so the Skein-256
//! hash kernel can drive it directly with its own tweak schedule, in
//! addition to the byte-oriented [`BlockCipher`] impl used when Threefish
//! is registered as an ordinary block cipher (tweak fixed at zero).

use crate::kernels::BlockCipher;

pub const BLOCK_LEN: usize = 32;
const NW: usize = 4;
const ROUNDS: usize = 72;
const KS_PARITY: u64 = 0x1BD1_1BDA_A9FC_1A22;

/// Rotation constants `R[d % 8][j]`, `j ∈ {0, 1}` (one MIX per word pair).
const ROTATIONS: [[u32; 2]; 8] = [
    [14, 16],
    [52, 57],
    [23, 40],
    [5, 37],
    [25, 33],
    [46, 12],
    [58, 22],
    [32, 32],
];

fn mix(x0: u64, x1: u64, r: u32) -> (u64, u64) {
    let y0 = x0.wrapping_add(x1);
    let y1 = x1.rotate_left(r) ^ y0;
    (y0, y1)
}

fn inv_mix(y0: u64, y1: u64, r: u32) -> (u64, u64) {
    let x1 = (y1 ^ y0).rotate_right(r);
    let x0 = y0.wrapping_sub(x1);
    (x0, x1)
}

/// Expanded key schedule: `e[s][i]` for subkey index `s ∈ 0..=ROUNDS/4`.
struct KeySchedule {
    e: [[u64; NW]; ROUNDS / 4 + 1],
}

impl KeySchedule {
    fn new(key: &[u64; NW], tweak: (u64, u64)) -> Self {
        let mut k = [0u64; NW + 1];
        k[..NW].copy_from_slice(key);
        k[NW] = KS_PARITY ^ key.iter().fold(0u64, |acc, &w| acc ^ w);
        let t = [tweak.0, tweak.1, tweak.0 ^ tweak.1];

        let mut e = [[0u64; NW]; ROUNDS / 4 + 1];
        for (s, subkey) in e.iter_mut().enumerate() {
            subkey[0] = k[s % (NW + 1)];
            subkey[1] = k[(s + 1) % (NW + 1)].wrapping_add(t[s % 3]);
            subkey[2] = k[(s + 2) % (NW + 1)].wrapping_add(t[(s + 1) % 3]);
            subkey[3] = k[(s + 3) % (NW + 1)].wrapping_add(s as u64);
        }
        KeySchedule { e }
    }
}

/// Encrypts one 256-bit block (as 4 little-endian 64-bit words) under `key`
/// and 128-bit `tweak`.
pub fn encrypt_words(key: &[u64; NW], tweak: (u64, u64), block: &mut [u64; NW]) {
    let ks = KeySchedule::new(key, tweak);
    let mut v = *block;
    for d in 0..ROUNDS {
        if d % 4 == 0 {
            let sk = &ks.e[d / 4];
            for i in 0..NW {
                v[i] = v[i].wrapping_add(sk[i]);
            }
        }
        let r = ROTATIONS[d % 8];
        let (a, b) = mix(v[0], v[1], r[0]);
        let (c, dd) = mix(v[2], v[3], r[1]);
        v = [a, dd, c, b];
    }
    for i in 0..NW {
        v[i] = v[i].wrapping_add(ks.e[ROUNDS / 4][i]);
    }
    *block = v;
}

/// Inverse of [`encrypt_words`].
pub fn decrypt_words(key: &[u64; NW], tweak: (u64, u64), block: &mut [u64; NW]) {
    let ks = KeySchedule::new(key, tweak);
    let mut v = *block;
    for i in 0..NW {
        v[i] = v[i].wrapping_sub(ks.e[ROUNDS / 4][i]);
    }
    for d in (0..ROUNDS).rev() {
        let (a, dd, c, b) = (v[0], v[1], v[2], v[3]);
        v = [a, b, c, dd];
        let r = ROTATIONS[d % 8];
        let (x0, x1) = inv_mix(v[0], v[1], r[0]);
        let (x2, x3) = inv_mix(v[2], v[3], r[1]);
        v = [x0, x1, x2, x3];
        if d % 4 == 0 {
            let sk = &ks.e[d / 4];
            for i in 0..NW {
                v[i] = v[i].wrapping_sub(sk[i]);
            }
        }
    }
    *block = v;
}

/// Converts a (possibly shorter than 32-byte, zero-padded by the caller)
/// little-endian byte block into 4 64-bit words. Shared with the Skein-256
/// hash kernel, which drives this cipher's core directly.
pub(crate) fn words_from_bytes(bytes: &[u8]) -> [u64; NW] {
    let mut w = [0u64; NW];
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
        w[i] = u64::from_le_bytes(chunk.try_into().unwrap());
    }
    w
}

pub(crate) fn bytes_from_words(words: &[u64; NW], out: &mut [u8]) {
    for (i, w) in words.iter().enumerate() {
        out[i * 8..i * 8 + 8].copy_from_slice(&w.to_le_bytes());
    }
}

/// Threefish-256 registered as an ordinary block cipher: tweak fixed at
/// `(0, 0)`. Skein-256 bypasses this type and calls [`encrypt_words`]
/// directly with its own per-block tweak.
#[derive(Clone)]
pub struct Threefish256 {
    key: [u64; NW],
}

impl Threefish256 {
    pub fn new(key: &[u8]) -> Self {
        Threefish256 {
            key: words_from_bytes(key),
        }
    }
}

impl BlockCipher for Threefish256 {
    fn block_size(&self) -> usize {
        BLOCK_LEN
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        let mut words = words_from_bytes(block);
        encrypt_words(&self.key, (0, 0), &mut words);
        bytes_from_words(&words, block);
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        let mut words = words_from_bytes(block);
        decrypt_words(&self.key, (0, 0), &mut words);
        bytes_from_words(&words, block);
    }

    fn clone_box(&self) -> Box<dyn BlockCipher> {
        Box::new(self.clone())
    }
}
