//! Explicitly owned, explicitly seeded random source.
//!
//! A [`Csprng`] only exists once seeded, so an unseeded generator cannot reach
//! the protocol. Concurrent callers either [`fork`](Csprng::fork) one instance
//! per thread or share a [`SharedCsprng`], whose lock serializes draws.

use std::sync::{Arc, Mutex, PoisonError};

use mpin_primitives::{constants::TAG_SEED, h_tag, HashType};
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, OsRng, RngCore, SeedableRng};
use zeroize::Zeroizing;

use crate::errors::MpinError;

pub struct Csprng {
    inner: ChaCha20Rng,
}

impl Csprng {
    pub const MIN_SEED_LEN: usize = 16;

    /// Seed from caller-supplied entropy. The seed is hashed into the key.
    pub fn from_seed(seed: &[u8]) -> Result<Self, MpinError> {
        if seed.len() < Self::MIN_SEED_LEN {
            return Err(MpinError::InvalidSeed("seed shorter than 16 bytes"));
        }
        let digest = Zeroizing::new(h_tag(HashType::Sha256, TAG_SEED, &[seed]));
        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&digest[..32]);
        Ok(Self { inner: ChaCha20Rng::from_seed(*key) })
    }

    /// Seed from the operating system.
    pub fn from_entropy() -> Result<Self, MpinError> {
        let mut key = Zeroizing::new([0u8; 32]);
        OsRng.try_fill_bytes(&mut key[..]).map_err(|_| MpinError::RngUnavailable)?;
        Ok(Self { inner: ChaCha20Rng::from_seed(*key) })
    }

    /// Derive an independent generator, e.g. one per worker thread.
    pub fn fork(&mut self) -> Result<Self, MpinError> {
        let mut key = Zeroizing::new([0u8; 32]);
        self.inner.try_fill_bytes(&mut key[..]).map_err(|_| MpinError::RngUnavailable)?;
        Ok(Self { inner: ChaCha20Rng::from_seed(*key) })
    }
}

impl RngCore for Csprng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

impl CryptoRng for Csprng {}

/// A [`Csprng`] behind a mutex, cloneable across threads.
///
/// `try_fill_bytes` reports a poisoned lock as an error; the infallible
/// methods keep drawing from the recovered state.
#[derive(Clone)]
pub struct SharedCsprng(Arc<Mutex<Csprng>>);

impl SharedCsprng {
    #[must_use]
    pub fn new(rng: Csprng) -> Self {
        Self(Arc::new(Mutex::new(rng)))
    }
}

impl RngCore for SharedCsprng {
    fn next_u32(&mut self) -> u32 {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        match self.0.lock() {
            Ok(mut rng) => rng.try_fill_bytes(dest),
            Err(_) => Err(rand_core::Error::new("shared random source lock poisoned")),
        }
    }
}

impl CryptoRng for SharedCsprng {}

/// Fixed, non-random seed for tests and demos: bytes 1..=32.
#[must_use]
pub fn test_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    for (i, b) in seed.iter_mut().enumerate() {
        *b = u8::try_from(i + 1).unwrap_or(u8::MAX);
    }
    seed
}
