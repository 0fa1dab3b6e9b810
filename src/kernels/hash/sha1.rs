//! SHA-1 (FIPS 180-4). Retained for RFC 2202/6070 test-vector compatibility
//! and as the default backing hash for PBKDF2 legacy vectors; SHA-256 is the
//! registry's default hash.

use crate::kernels::Hash;

const BLOCK_LEN: usize = 64;
const DIGEST_LEN: usize = 20;

#[derive(Clone)]
pub struct Sha1 {
    state: [u32; 5],
    buf: Vec<u8>,
    len: u64,
}

impl Sha1 {
    pub fn new() -> Self {
        Sha1 {
            state: [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0],
            buf: Vec::with_capacity(BLOCK_LEN),
            len: 0,
        }
    }

    fn compress(state: &mut [u32; 5], block: &[u8]) {
        let mut w = [0u32; 80];
        for (i, chunk) in block.chunks_exact(4).enumerate() {
            w[i] = u32::from_be_bytes(chunk.try_into().unwrap());
        }
        for i in 16..80 {
            w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
        }
        let (mut a, mut b, mut c, mut d, mut e) =
            (state[0], state[1], state[2], state[3], state[4]);
        for (i, &wi) in w.iter().enumerate() {
            let (f, k) = match i {
                0..=19 => ((b & c) | (!b & d), 0x5A827999u32),
                20..=39 => (b ^ c ^ d, 0x6ED9EBA1),
                40..=59 => ((b & c) | (b & d) | (c & d), 0x8F1BBCDC),
                _ => (b ^ c ^ d, 0xCA62C1D6),
            };
            let temp = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(wi);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = temp;
        }
        state[0] = state[0].wrapping_add(a);
        state[1] = state[1].wrapping_add(b);
        state[2] = state[2].wrapping_add(c);
        state[3] = state[3].wrapping_add(d);
        state[4] = state[4].wrapping_add(e);
    }
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hash for Sha1 {
    fn update(&mut self, data: &[u8]) {
        self.len = self.len.wrapping_add(data.len() as u64);
        self.buf.extend_from_slice(data);
        let mut chunks = self.buf.chunks_exact(BLOCK_LEN);
        for chunk in &mut chunks {
            Self::compress(&mut self.state, chunk);
        }
        let rem = chunks.remainder().to_vec();
        self.buf = rem;
    }

    fn finalize(mut self: Box<Self>, out: &mut [u8]) {
        let bit_len = self.len.wrapping_mul(8);
        self.buf.push(0x80);
        while self.buf.len() % BLOCK_LEN != 56 {
            self.buf.push(0);
        }
        self.buf.extend_from_slice(&bit_len.to_be_bytes());
        for chunk in self.buf.chunks_exact(BLOCK_LEN) {
            Self::compress(&mut self.state, chunk);
        }
        for (i, word) in self.state.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
        }
    }

    fn clone_box(&self) -> Box<dyn Hash> {
        Box::new(self.clone())
    }

    fn digest_len(&self) -> usize {
        DIGEST_LEN
    }

    fn block_len(&self) -> usize {
        BLOCK_LEN
    }
}
