//! Block-mode drivers (§4.4): ECB, CBC, CTR, CFB, OFB. All share one
//! framing discipline: buffer pending input bytes, emit complete output
//! blocks as soon as a full block of input is available, and differ only
//! in how a block is permuted and how chaining state evolves.
//!
//! ECB/CBC decrypting with padding enabled hold back one already-complete
//! block so that `finalize` can tell which block is last and unpad it.
//! CTR/OFB/CFB never hold anything back mid-stream; a genuine final
//! partial block (fewer than `block_size` bytes) is handled at `finalize`
//! by generating one more keystream value and consuming only what's left.

use crate::error::OrdoError;
use crate::kernels::BlockCipher;
use crate::registry::{self, ModeId};
use crate::util::{inc_buffer, pkcs_pad, pkcs_unpad_len, xor_buf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

pub struct ModeDriver {
    mode: ModeId,
    cipher: Box<dyn BlockCipher>,
    direction: Direction,
    padding: bool,
    buf: Vec<u8>,
    /// The mode's chaining register: previous ciphertext block (CBC),
    /// counter (CTR), previous keystream block (OFB), or previous state
    /// block (CFB). Unused by ECB.
    chain: Vec<u8>,
}

impl ModeDriver {
    pub fn new(
        mode: ModeId,
        cipher: Box<dyn BlockCipher>,
        direction: Direction,
        iv: &[u8],
        padding: bool,
    ) -> Result<Self, OrdoError> {
        let b = cipher.block_size();
        if iv.len() != registry::mode_iv_len(mode, b) {
            return Err(OrdoError::Arg);
        }
        Ok(ModeDriver {
            mode,
            cipher,
            direction,
            padding,
            buf: Vec::with_capacity(b),
            chain: iv.to_vec(),
        })
    }

    pub fn try_clone(&self) -> Self {
        ModeDriver {
            mode: self.mode,
            cipher: self.cipher.clone_box(),
            direction: self.direction,
            padding: self.padding,
            buf: self.buf.clone(),
            chain: self.chain.clone(),
        }
    }

    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    /// ECB/CBC decrypt-with-padding must always keep one complete block
    /// unprocessed, since only `finalize` knows which block is last.
    fn holds_back_final_block(&self) -> bool {
        self.padding
            && self.direction == Direction::Decrypt
            && matches!(self.mode, ModeId::Ecb | ModeId::Cbc)
    }

    fn process_block(&mut self, block_in: &[u8]) -> Vec<u8> {
        match self.mode {
            ModeId::Ecb => {
                let mut out = block_in.to_vec();
                match self.direction {
                    Direction::Encrypt => self.cipher.encrypt_block(&mut out),
                    Direction::Decrypt => self.cipher.decrypt_block(&mut out),
                }
                out
            }
            ModeId::Cbc => match self.direction {
                Direction::Encrypt => {
                    let mut tmp = block_in.to_vec();
                    xor_buf(&mut tmp, &self.chain);
                    self.cipher.encrypt_block(&mut tmp);
                    self.chain = tmp.clone();
                    tmp
                }
                Direction::Decrypt => {
                    let mut plain = block_in.to_vec();
                    self.cipher.decrypt_block(&mut plain);
                    xor_buf(&mut plain, &self.chain);
                    self.chain = block_in.to_vec();
                    plain
                }
            },
            ModeId::Ctr => {
                let mut ks = self.chain.clone();
                self.cipher.encrypt_block(&mut ks);
                inc_buffer(&mut self.chain);
                let mut out = block_in.to_vec();
                xor_buf(&mut out, &ks);
                out
            }
            ModeId::Ofb => {
                let mut ks = self.chain.clone();
                self.cipher.encrypt_block(&mut ks);
                self.chain = ks.clone();
                let mut out = block_in.to_vec();
                xor_buf(&mut out, &ks);
                out
            }
            ModeId::Cfb => {
                let mut ks = self.chain.clone();
                self.cipher.encrypt_block(&mut ks);
                let mut out = block_in.to_vec();
                xor_buf(&mut out, &ks);
                self.chain = match self.direction {
                    Direction::Encrypt => out.clone(),
                    Direction::Decrypt => block_in.to_vec(),
                };
                out
            }
        }
    }

    /// Tail handling for CTR/OFB/CFB: one more keystream value derived
    /// from the current chain register, consumed only as far as `partial`
    /// runs. The chain register is not advanced, there is no next block.
    fn process_partial(&self, partial: &[u8]) -> Vec<u8> {
        let mut ks = self.chain.clone();
        self.cipher.encrypt_block(&mut ks);
        let mut out = partial.to_vec();
        xor_buf(&mut out, &ks[..partial.len()]);
        out
    }

    pub fn update(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), OrdoError> {
        self.buf.extend_from_slice(input);
        let b = self.block_size();
        loop {
            let enough = if self.holds_back_final_block() {
                self.buf.len() > b
            } else {
                self.buf.len() >= b
            };
            if !enough {
                break;
            }
            let block: Vec<u8> = self.buf.drain(..b).collect();
            let produced = self.process_block(&block);
            out.extend_from_slice(&produced);
        }
        Ok(())
    }

    pub fn finalize(&mut self, out: &mut Vec<u8>) -> Result<(), OrdoError> {
        let b = self.block_size();
        match self.mode {
            ModeId::Ecb | ModeId::Cbc => {
                if self.padding {
                    match self.direction {
                        Direction::Encrypt => {
                            pkcs_pad(&mut self.buf, b);
                            while self.buf.len() >= b {
                                let block: Vec<u8> = self.buf.drain(..b).collect();
                                let produced = self.process_block(&block);
                                out.extend_from_slice(&produced);
                            }
                        }
                        Direction::Decrypt => {
                            if self.buf.len() != b {
                                return Err(OrdoError::Leftover);
                            }
                            let block: Vec<u8> = self.buf.drain(..).collect();
                            let produced = self.process_block(&block);
                            let p = pkcs_unpad_len(&produced, b)?;
                            out.extend_from_slice(&produced[..b - p]);
                        }
                    }
                } else if !self.buf.is_empty() {
                    return Err(OrdoError::Leftover);
                }
            }
            ModeId::Ctr | ModeId::Ofb | ModeId::Cfb => {
                if !self.buf.is_empty() {
                    let partial: Vec<u8> = self.buf.drain(..).collect();
                    let produced = self.process_partial(&partial);
                    out.extend_from_slice(&produced);
                }
            }
        }
        Ok(())
    }
}
