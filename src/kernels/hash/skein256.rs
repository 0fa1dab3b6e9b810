//! Skein-256 (Skein v1.3), built on Threefish-256 via Unique Block Iteration
//! (UBI). Unlike the other hash kernels, Skein-256's output length is a
//! construction parameter rather than a constant, see [`SkeinParams`].

use crate::kernels::block::threefish256::{bytes_from_words, encrypt_words, words_from_bytes};
use crate::kernels::Hash;

pub const BLOCK_LEN: usize = 32;
const DEFAULT_OUT_BITS: u64 = 256;

const TYPE_CFG: u8 = 4;
const TYPE_MSG: u8 = 48;
const TYPE_OUT: u8 = 63;

/// Configuration accepted by `digest_init` for the Skein-256 primitive:
/// schema/version are fixed by the algorithm, only the desired output
/// length is caller-selectable. Per spec, `out_bits` is rounded down to a
/// byte boundary.
#[derive(Debug, Clone, Copy)]
pub struct SkeinParams {
    pub out_bits: u64,
}

impl Default for SkeinParams {
    fn default() -> Self {
        SkeinParams {
            out_bits: DEFAULT_OUT_BITS,
        }
    }
}

fn tweak(position: u64, first: bool, is_final: bool, ty: u8, bit_pad: bool) -> (u64, u64) {
    let mut t1 = (ty as u64) << 56;
    if first {
        t1 |= 1 << 62;
    }
    if is_final {
        t1 |= 1 << 63;
    }
    if bit_pad {
        t1 |= 1 << 55;
    }
    (position, t1)
}

/// One UBI compression: `E_g(m) XOR m` (Davies-Meyer feed-forward), `g`
/// acting as the Threefish-256 key and `tweak` seeding round subkeys.
fn ubi(g: &[u64; 4], msg: &[u64; 4], tw: (u64, u64)) -> [u64; 4] {
    let mut block = *msg;
    encrypt_words(g, tw, &mut block);
    for i in 0..4 {
        block[i] ^= msg[i];
    }
    block
}

fn config_block(out_bits: u64) -> [u64; 4] {
    let mut bytes = [0u8; BLOCK_LEN];
    bytes[0..4].copy_from_slice(b"SHA3");
    bytes[4..6].copy_from_slice(&1u16.to_le_bytes());
    bytes[8..16].copy_from_slice(&out_bits.to_le_bytes());
    words_from_bytes(&bytes)
}

#[derive(Clone)]
pub struct Skein256 {
    g: [u64; 4],
    buf: Vec<u8>,
    position: u64,
    first_block_done: bool,
    out_bits: u64,
}

impl Skein256 {
    pub fn new() -> Self {
        Self::with_params(SkeinParams::default())
    }

    pub fn with_params(params: SkeinParams) -> Self {
        let cfg = config_block(params.out_bits);
        let g = ubi(&[0u64; 4], &cfg, tweak(BLOCK_LEN as u64, true, true, TYPE_CFG, false));
        Skein256 {
            g,
            buf: Vec::with_capacity(BLOCK_LEN),
            position: 0,
            first_block_done: false,
            out_bits: params.out_bits,
        }
    }

    fn absorb_block(&mut self, block: &[u8; BLOCK_LEN], consumed: u64, is_final: bool, bit_pad: bool) {
        self.position += consumed;
        let words = words_from_bytes(block);
        let t = tweak(self.position, !self.first_block_done, is_final, TYPE_MSG, bit_pad);
        self.g = ubi(&self.g, &words, t);
        self.first_block_done = true;
    }
}

impl Default for Skein256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hash for Skein256 {
    fn update(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
        while self.buf.len() > BLOCK_LEN {
            let block: [u8; BLOCK_LEN] = self.buf[..BLOCK_LEN].try_into().unwrap();
            self.absorb_block(&block, BLOCK_LEN as u64, false, false);
            self.buf.drain(..BLOCK_LEN);
        }
    }

    fn finalize(mut self: Box<Self>, out: &mut [u8]) {
        let last_len = self.buf.len();
        let mut last_block = [0u8; BLOCK_LEN];
        last_block[..last_len].copy_from_slice(&self.buf);
        self.absorb_block(&last_block, last_len as u64, true, last_len < BLOCK_LEN);

        let out_bytes = (self.out_bits / 8) as usize;
        let mut produced = Vec::with_capacity(out_bytes + BLOCK_LEN);
        let mut counter = 0u64;
        while produced.len() < out_bytes {
            let mut ctr_bytes = [0u8; BLOCK_LEN];
            ctr_bytes[..8].copy_from_slice(&counter.to_le_bytes());
            let words = words_from_bytes(&ctr_bytes);
            let t = tweak(8, true, true, TYPE_OUT, true);
            let out_state = ubi(&self.g, &words, t);
            let mut produced_block = [0u8; BLOCK_LEN];
            bytes_from_words(&out_state, &mut produced_block);
            produced.extend_from_slice(&produced_block);
            counter += 1;
        }
        let n = out_bytes.min(out.len());
        out[..n].copy_from_slice(&produced[..n]);
    }

    fn clone_box(&self) -> Box<dyn Hash> {
        Box::new(self.clone())
    }

    fn digest_len(&self) -> usize {
        (self.out_bits / 8) as usize
    }

    fn block_len(&self) -> usize {
        BLOCK_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_is_deterministic_and_right_length() {
        let h = Box::new(Skein256::new());
        let mut out = vec![0u8; 32];
        h.finalize(&mut out);
        let h2 = Box::new(Skein256::new());
        let mut out2 = vec![0u8; 32];
        h2.finalize(&mut out2);
        assert_eq!(out, out2);
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn split_update_matches_single_update() {
        let msg = b"the quick brown fox jumps over the lazy dog, repeated for two blocks!!";
        let mut whole = Box::new(Skein256::new());
        whole.update(msg);
        let mut whole_out = vec![0u8; 32];
        whole.finalize(&mut whole_out);

        let mut split = Box::new(Skein256::new());
        split.update(&msg[..17]);
        split.update(&msg[17..]);
        let mut split_out = vec![0u8; 32];
        split.finalize(&mut split_out);

        assert_eq!(whole_out, split_out);
    }

    #[test]
    fn different_output_length_changes_digest_len() {
        let h = Box::new(Skein256::with_params(SkeinParams { out_bits: 128 }));
        assert_eq!(h.digest_len(), 16);
        let mut out = vec![0u8; 16];
        h.finalize(&mut out);
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn different_messages_differ() {
        let mut a = Box::new(Skein256::new());
        a.update(b"message one");
        let mut a_out = vec![0u8; 32];
        a.finalize(&mut a_out);

        let mut b = Box::new(Skein256::new());
        b.update(b"message two");
        let mut b_out = vec![0u8; 32];
        b.finalize(&mut b_out);

        assert_ne!(a_out, b_out);
    }
}
