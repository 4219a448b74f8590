//! Per-authority secret shares and their recombination.
//!
//! Each trust authority holds its own [`MasterSecretShare`] and derives client
//! and server shares from it independently. Shares are combined by point
//! addition only; the master scalars are never added together. Any number of
//! authorities is handled by folding pairwise additions.

use ark_bls12_381::{G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{AffineRepr, CurveGroup};
use rand_core::{CryptoRng, RngCore};
use tracing::debug;
use zeroize::Zeroizing;

use crate::{
    curve,
    errors::MpinError,
    hashers,
    types::{
        ClientSecretShare, G1Share, HashedIdentity, MasterSecretShare, ServerSecret,
        ServerSecretShare,
    },
};

/// Generate a fresh master secret share. The only operation here that
/// consumes randomness.
pub fn random_generate<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
) -> Result<MasterSecretShare, MpinError> {
    let s = Zeroizing::new(curve::random_scalar(rng)?);
    let bytes = Zeroizing::new(curve::encode_scalar(&s)?);
    Ok(MasterSecretShare::from_array(*bytes))
}

/// Server secret share `s·Q`.
pub fn server_secret_share(master: &MasterSecretShare) -> Result<ServerSecretShare, MpinError> {
    let s = Zeroizing::new(curve::decode_scalar(master.as_bytes())?);
    let point = Zeroizing::new((G2Affine::generator() * *s).into_affine());
    Ok(ServerSecretShare::from_array(curve::encode_g2(&point)?))
}

/// Client secret share `s·H1(hid)`.
pub fn client_secret_share(
    master: &MasterSecretShare,
    hid: &HashedIdentity,
) -> Result<ClientSecretShare, MpinError> {
    let s = Zeroizing::new(curve::decode_scalar(master.as_bytes())?);
    let p = hashers::identity_point(hid)?;
    let share = Zeroizing::new((p * *s).into_affine());
    Ok(ClientSecretShare::from_array(curve::encode_g1(&share)?))
}

/// Add two G1 shares (client secret or time permit).
///
/// Both inputs are decoded before anything is produced, so an invalid
/// encoding yields `InvalidPoint` and no output.
pub fn recombine_g1<S: G1Share>(a: &S, b: &S) -> Result<S::Combined, MpinError> {
    let pa = Zeroizing::new(curve::decode_g1(a.share_bytes())?);
    let pb = Zeroizing::new(curve::decode_g1(b.share_bytes())?);
    let sum = Zeroizing::new((*pa + *pb).into_affine());
    Ok(S::combined(curve::encode_g1(&sum)?))
}

/// Add two server secret shares.
pub fn recombine_g2(a: &ServerSecretShare, b: &ServerSecretShare) -> Result<ServerSecret, MpinError> {
    let pa = Zeroizing::new(curve::decode_g2(a.as_bytes())?);
    let pb = Zeroizing::new(curve::decode_g2(b.as_bytes())?);
    let sum = Zeroizing::new((*pa + *pb).into_affine());
    Ok(ServerSecret::from_array(curve::encode_g2(&sum)?))
}

/// Fold any number of G1 shares pairwise.
pub fn recombine_all_g1<S: G1Share>(shares: &[S]) -> Result<S::Combined, MpinError> {
    if shares.is_empty() {
        return Err(MpinError::EmptyShares);
    }
    let mut acc = Zeroizing::new(G1Projective::from(G1Affine::zero()));
    for share in shares {
        let p = Zeroizing::new(curve::decode_g1(share.share_bytes())?);
        *acc += *p;
    }
    debug!(shares = shares.len(), "recombined G1 shares");
    Ok(S::combined(curve::encode_g1(&(*acc).into_affine())?))
}

/// Fold any number of server secret shares pairwise.
pub fn recombine_all_g2(shares: &[ServerSecretShare]) -> Result<ServerSecret, MpinError> {
    if shares.is_empty() {
        return Err(MpinError::EmptyShares);
    }
    let mut acc = Zeroizing::new(G2Projective::from(G2Affine::zero()));
    for share in shares {
        let p = Zeroizing::new(curve::decode_g2(share.as_bytes())?);
        *acc += *p;
    }
    debug!(shares = shares.len(), "recombined G2 shares");
    let sum = Zeroizing::new((*acc).into_affine());
    Ok(ServerSecret::from_array(curve::encode_g2(&sum)?))
}
