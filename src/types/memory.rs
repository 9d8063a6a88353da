use std::iter;

use crate::{
    types::{u256, FailStatus},
    utils::word_size,
};

/// The flat scratch memory of one invocation.
///
/// Zero-initialised and byte-addressed. Every access, reads included, first
/// grows the buffer to the next 32-byte boundary covering the accessed range,
/// so `len()` is always a multiple of 32 and untouched bytes read as zero.
/// Growth is unbounded here; a metering host would bound it through gas.
#[derive(Debug)]
pub struct Memory(Vec<u8>);

impl Memory {
    pub fn with_capacity(words: usize) -> Self {
        Self(Vec::with_capacity(words * 32))
    }

    pub fn len(&self) -> u64 {
        self.0.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    fn expand(&mut self, new_len_bytes: u64) -> Result<(), FailStatus> {
        let new_len = word_size(new_len_bytes)? * 32; // word_size divided by 32, no overflow
        let current_len = self.0.len() as u64;
        if new_len > current_len {
            self.0
                .extend(iter::repeat(0).take((new_len - current_len) as usize));
        }
        Ok(())
    }

    /// Mutable access to `[offset, offset + len)`, growing as needed.
    pub fn get_mut_slice(&mut self, offset: u256, len: u64) -> Result<&mut [u8], FailStatus> {
        if len == 0 {
            return Ok(&mut []);
        }
        let (offset, offset_overflow) = offset.into_u64_with_overflow();
        let (end, end_overflow) = offset.overflowing_add(len);
        if offset_overflow || end_overflow {
            return Err(FailStatus::InvalidMemoryAccess);
        }
        self.expand(end)?;

        Ok(&mut self.0[offset as usize..end as usize])
    }

    /// The 32-byte word at `offset`.
    pub fn get_word(&mut self, offset: u256) -> Result<u256, FailStatus> {
        let slice = self.get_mut_slice(offset, 32)?;
        let mut bytes = [0; 32];
        bytes.copy_from_slice(slice);
        Ok(u256::from_be_bytes(bytes))
    }

    /// The single byte at `offset`.
    pub fn get_mut_byte(&mut self, offset: u256) -> Result<&mut u8, FailStatus> {
        let slice = self.get_mut_slice(offset, 1)?;
        Ok(&mut slice[0])
    }
}
