//! Adapter over the BLS12-381 pairing library.
//!
//! Everything that touches curve arithmetic, point encodings or the pairing
//! goes through here; the protocol modules only see byte newtypes and the
//! small set of operations below. Encodings:
//!
//! - G1: `0x04 || uncompressed affine point` (97 bytes)
//! - G2: uncompressed affine point (192 bytes)
//! - scalars: 32-byte little-endian canonical
//! - GT: compressed target-field element (576 bytes)
//!
//! Decoding checks curve and subgroup membership.

use ark_bls12_381::{g1, Bls12_381, Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::hashing::curve_maps::wb::WBMap;
use ark_ec::hashing::map_to_curve_hasher::MapToCurveBasedHasher;
use ark_ec::hashing::HashToCurve;
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::AffineRepr;
use ark_ff::field_hashers::DefaultFieldHasher;
use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use mpin_primitives::constants::TAG_DST_ID;
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::errors::MpinError;
use crate::types::{G1_LEN, G1_TAG, G2_LEN, GS, GT_LEN};

pub(crate) type Gt = PairingOutput<Bls12_381>;

type G1Hasher = MapToCurveBasedHasher<G1Projective, DefaultFieldHasher<Sha256, 128>, WBMap<g1::Config>>;

/// Hash arbitrary bytes onto G1 (RFC 9380 simplified SWU with isogeny).
pub(crate) fn hash_to_g1(msg: &[u8]) -> Result<G1Affine, MpinError> {
    let hasher = G1Hasher::new(TAG_DST_ID.as_bytes()).map_err(|_| MpinError::HashToCurve)?;
    hasher.hash(msg).map_err(|_| MpinError::HashToCurve)
}

pub(crate) fn encode_g1(p: &G1Affine) -> Result<[u8; G1_LEN], MpinError> {
    let mut out = [0u8; G1_LEN];
    out[0] = G1_TAG;
    p.serialize_uncompressed(&mut out[1..]).map_err(|_| MpinError::InvalidPoint)?;
    Ok(out)
}

pub(crate) fn decode_g1(bytes: &[u8; G1_LEN]) -> Result<G1Affine, MpinError> {
    if bytes[0] != G1_TAG {
        return Err(MpinError::InvalidPoint);
    }
    G1Affine::deserialize_uncompressed(&bytes[1..]).map_err(|_| MpinError::InvalidPoint)
}

pub(crate) fn encode_g2(p: &G2Affine) -> Result<[u8; G2_LEN], MpinError> {
    let mut out = [0u8; G2_LEN];
    p.serialize_uncompressed(&mut out[..]).map_err(|_| MpinError::InvalidPoint)?;
    Ok(out)
}

pub(crate) fn decode_g2(bytes: &[u8; G2_LEN]) -> Result<G2Affine, MpinError> {
    G2Affine::deserialize_uncompressed(&bytes[..]).map_err(|_| MpinError::InvalidPoint)
}

pub(crate) fn encode_scalar(s: &Fr) -> Result<[u8; GS], MpinError> {
    let mut out = [0u8; GS];
    s.serialize_compressed(&mut out[..]).map_err(|_| MpinError::InvalidScalar)?;
    Ok(out)
}

pub(crate) fn decode_scalar(bytes: &[u8; GS]) -> Result<Fr, MpinError> {
    Fr::deserialize_compressed(&bytes[..]).map_err(|_| MpinError::InvalidScalar)
}

/// Reduce a digest to a scalar, big-endian.
pub(crate) fn scalar_from_digest(digest: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(digest)
}

/// Draw a uniformly random non-zero scalar.
///
/// A source that errors, or returns bytes reducing to zero (an all-zero
/// stream), is reported as `RngUnavailable`.
pub(crate) fn random_scalar<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Fr, MpinError> {
    let mut wide = Zeroizing::new([0u8; 64]);
    rng.try_fill_bytes(&mut wide[..]).map_err(|_| MpinError::RngUnavailable)?;
    let s = Fr::from_le_bytes_mod_order(&wide[..]);
    if s.is_zero() {
        return Err(MpinError::RngUnavailable);
    }
    Ok(s)
}

/// `e(v, Q) · e(w, sQ)`, with `Q` the G2 generator.
pub(crate) fn pairing_product(v: &G1Affine, w: &G1Affine, server: &G2Affine) -> Gt {
    Bls12_381::multi_pairing([*v, *w], [G2Affine::generator(), *server])
}

/// `e(w, Q)`.
pub(crate) fn pairing_with_generator(w: &G1Affine) -> Gt {
    Bls12_381::pairing(*w, G2Affine::generator())
}

pub(crate) fn is_unity(g: &Gt) -> bool {
    g.is_zero()
}

pub(crate) fn encode_gt(g: &Gt) -> Result<[u8; GT_LEN], MpinError> {
    let mut out = [0u8; GT_LEN];
    g.serialize_compressed(&mut out[..]).map_err(|_| MpinError::InvalidPoint)?;
    Ok(out)
}

pub(crate) fn decode_gt(bytes: &[u8; GT_LEN]) -> Result<Gt, MpinError> {
    Gt::deserialize_compressed(&bytes[..]).map_err(|_| MpinError::InvalidPoint)
}
