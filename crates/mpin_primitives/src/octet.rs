use alloc::vec::Vec;
use core::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OctetError {
    #[error("octet capacity {capacity} too small for {needed} bytes")]
    BufferTooSmall { capacity: usize, needed: usize },
}

/// Fixed-capacity byte buffer.
///
/// The capacity is declared up front and every write is validated against it.
/// A write that does not fit fails and leaves the previous contents untouched;
/// nothing is ever truncated. Contents are zeroed on drop and on [`Octet::clear`].
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Octet {
    val: Vec<u8>,
    max: usize,
}

impl Octet {
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self { val: Vec::with_capacity(max), max }
    }

    /// Build an octet of capacity `max` holding `bytes`.
    pub fn from_slice(max: usize, bytes: &[u8]) -> Result<Self, OctetError> {
        let mut o = Self::new(max);
        o.write(bytes)?;
        Ok(o)
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.max
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.val.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.val.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.val
    }

    /// Replace the contents with `bytes`.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), OctetError> {
        if bytes.len() > self.max {
            return Err(OctetError::BufferTooSmall { capacity: self.max, needed: bytes.len() });
        }
        self.val.zeroize();
        self.val.extend_from_slice(bytes);
        Ok(())
    }

    /// Append `bytes` after the current contents.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), OctetError> {
        let needed = self.val.len() + bytes.len();
        if needed > self.max {
            return Err(OctetError::BufferTooSmall { capacity: self.max, needed });
        }
        self.val.extend_from_slice(bytes);
        Ok(())
    }

    /// Zero and empty the buffer, keeping its capacity.
    pub fn clear(&mut self) {
        self.val.zeroize();
    }
}

// Contents may be secret; only the shape is printed.
impl fmt::Debug for Octet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Octet")
            .field("len", &self.val.len())
            .field("max", &self.max)
            .finish()
    }
}
