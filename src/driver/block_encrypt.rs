//! Block-encrypt driver (§4.5): wraps a (cipher, mode) pair as a single
//! streaming context. The cipher's key schedule lives inside the bound
//! [`ModeDriver`](super::mode::ModeDriver); this type only owns phase and
//! forwards update/final to it.

use super::mode::{Direction, ModeDriver};
use super::Phase;
use crate::error::OrdoError;
use crate::registry::{self, BlockCipherId, ModeId};

/// Mode-level parameters accepted by `init`. Only padding is configurable
/// in this revision, every mode's IV length is derived from the bound
/// cipher's block size (§4.4).
#[derive(Debug, Clone, Copy, Default)]
pub struct EcbParams {
    pub padding: bool,
}

pub struct BlockEncryptContext {
    cipher_id: BlockCipherId,
    mode_id: ModeId,
    driver: Option<ModeDriver>,
    phase: Phase,
}

impl BlockEncryptContext {
    pub fn alloc(cipher_id: BlockCipherId, mode_id: ModeId) -> Self {
        BlockEncryptContext {
            cipher_id,
            mode_id,
            driver: None,
            phase: Phase::Allocated,
        }
    }

    pub fn init(
        &mut self,
        key: &[u8],
        iv: &[u8],
        direction: Direction,
        params: EcbParams,
    ) -> Result<(), OrdoError> {
        let limits = registry::block_cipher_limits(self.cipher_id);
        if registry::key_len_query(&limits, key.len()) != key.len() {
            return Err(OrdoError::KeyLen);
        }
        let cipher = registry::block_cipher_new(self.cipher_id, key);
        let driver = ModeDriver::new(self.mode_id, cipher, direction, iv, params.padding)?;
        self.driver = Some(driver);
        self.phase = Phase::Initialized;
        Ok(())
    }

    pub fn update(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), OrdoError> {
        if !matches!(self.phase, Phase::Initialized | Phase::Updating) {
            return Err(OrdoError::Arg);
        }
        self.driver
            .as_mut()
            .expect("driver is Some while phase ∈ {Initialized, Updating}")
            .update(input, out)?;
        self.phase = Phase::Updating;
        Ok(())
    }

    pub fn finalize(&mut self, out: &mut Vec<u8>) -> Result<(), OrdoError> {
        if !matches!(self.phase, Phase::Initialized | Phase::Updating) {
            return Err(OrdoError::Arg);
        }
        let result = self
            .driver
            .as_mut()
            .expect("driver is Some while phase ∈ {Initialized, Updating}")
            .finalize(out);
        // Drivers never abort on error: the context still reaches Finalized
        // so callers can (and must) free it, per §7.
        self.phase = Phase::Finalized;
        result
    }

    pub fn try_clone(&self) -> Self {
        BlockEncryptContext {
            cipher_id: self.cipher_id,
            mode_id: self.mode_id,
            driver: self.driver.as_ref().map(|d| d.try_clone()),
            phase: self.phase,
        }
    }
}
