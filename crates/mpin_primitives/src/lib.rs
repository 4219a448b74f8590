#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

//! M-PIN primitives: hash selection, domain-tagged hashing, fixed-capacity octets.
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;
//
// Shared by the protocol crate, the e2e harness and the fuzz targets:
//
// - Selectable hash function (`HashType`) with a stable numeric identifier
// - Domain-tagged hashing with length framing
// - Fit-to-width digests (front zero padding, truncation)
// - `Octet`: capacity-checked byte buffer that never truncates
// - Constant-time equality helpers

use alloc::vec::Vec;
use sha2::{Digest, Sha256, Sha384, Sha512};
use sha3::Sha3_256;
use subtle::ConstantTimeEq;

pub mod constants;
mod octet;

pub use octet::{Octet, OctetError};

/// Hash function selector shared by every participant.
///
/// All parties must agree on the selector; a mismatch silently breaks the
/// pairing algebra downstream rather than producing an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum HashType {
    #[default]
    Sha256 = 1,
    Sha384 = 2,
    Sha512 = 3,
    Sha3_256 = 4,
}

impl HashType {
    /// Stable numeric identifier.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Digest output length in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 | Self::Sha3_256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Hash the concatenation of `parts`.
    #[must_use]
    pub fn digest(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            Self::Sha256 => run::<Sha256>(parts),
            Self::Sha384 => run::<Sha384>(parts),
            Self::Sha512 => run::<Sha512>(parts),
            Self::Sha3_256 => run::<Sha3_256>(parts),
        }
    }
}

impl TryFrom<u8> for HashType {
    type Error = u8;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::Sha256),
            2 => Ok(Self::Sha384),
            3 => Ok(Self::Sha512),
            4 => Ok(Self::Sha3_256),
            other => Err(other),
        }
    }
}

fn run<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for p in parts {
        hasher.update(p);
    }
    hasher.finalize().to_vec()
}

/// Domain-tagged hashing with length framing:
/// `H(tag, parts[])` = `hash_type`( UTF8(tag) || Σ ( BE(|p|,8) || p ) )
#[must_use]
pub fn h_tag(hash_type: HashType, tag: &str, parts: &[&[u8]]) -> Vec<u8> {
    debug_assert!(
        tag.starts_with("mpin."),
        "non-mpin.* tag used in protocol hashing: {tag}"
    );
    let mut framed: Vec<&[u8]> = Vec::with_capacity(1 + 2 * parts.len());
    let lens: Vec<[u8; 8]> = parts.iter().map(|p| (p.len() as u64).to_be_bytes()).collect();
    framed.push(tag.as_bytes());
    for (p, len) in parts.iter().zip(lens.iter()) {
        framed.push(len);
        framed.push(p);
    }
    hash_type.digest(&framed)
}

/// Fit a digest to exactly `W` bytes: longer digests are truncated, shorter
/// ones are zero-padded at the front.
#[must_use]
pub fn fit<const W: usize>(digest: &[u8]) -> [u8; W] {
    let mut out = [0u8; W];
    if digest.len() >= W {
        out.copy_from_slice(&digest[..W]);
    } else {
        out[W - digest.len()..].copy_from_slice(digest);
    }
    out
}

/// Constant-time equality for two byte strings of any length.
#[must_use]
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tag_asserts {
    use super::constants;

    #[test]
    fn all_public_tag_constants_are_mpin_namespaced() {
        let tags = [
            constants::TAG_DST_ID,
            constants::TAG_CHAL,
            constants::TAG_SEED,
            constants::TAG_AUTH,
            constants::TAG_COMMIT,
        ];
        for t in tags {
            assert!(t.starts_with("mpin."), "tag not mpin.*: {t}");
        }
    }

    #[test]
    fn size_classes_follow_field_and_group_units() {
        assert_eq!(constants::G1_LEN, 97);
        assert_eq!(constants::G2_LEN, 192);
        assert_eq!(constants::GT_LEN, 576);
        assert_eq!(constants::GS, 32);
    }
}
