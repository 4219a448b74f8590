use ark_bls12_381::G1Affine;
use mpin_primitives::{constants::TAG_CHAL, fit, h_tag, HashType};

use crate::{
    curve,
    errors::MpinError,
    types::{Challenge, Commitment, HashedIdentity, FS, MAX_IDENTITY_LEN},
};

/// HID = `fit_FS`( hash(identity) )
///
/// # Errors
///
/// `IdentityTooLong` when the identity exceeds `MAX_IDENTITY_LEN` bytes.
pub fn hash_id(hash_type: HashType, identity: &[u8]) -> Result<HashedIdentity, MpinError> {
    if identity.len() > MAX_IDENTITY_LEN {
        return Err(MpinError::IdentityTooLong { len: identity.len(), max: MAX_IDENTITY_LEN });
    }
    let digest = hash_type.digest(&[identity]);
    Ok(HashedIdentity::from_array(fit::<FS>(&digest)))
}

/// HTID input = `fit_FS`( hash( BE32(date) || HID ) )
#[must_use]
pub fn hash_date_id(hash_type: HashType, date: u32, hid: &HashedIdentity) -> [u8; FS] {
    let digest = hash_type.digest(&[&date.to_be_bytes(), hid.as_bytes()]);
    fit::<FS>(&digest)
}

/// Y = hash( "mpin.chal" || BE32(time) || UT || message ) mod r
///
/// # Errors
///
/// `InvalidScalar` if the reduced challenge fails to encode.
pub fn hash_challenge(
    hash_type: HashType,
    time: u32,
    ut: &Commitment,
    message: Option<&[u8]>,
) -> Result<Challenge, MpinError> {
    let digest = h_tag(
        hash_type,
        TAG_CHAL,
        &[&time.to_be_bytes(), ut.as_bytes(), message.unwrap_or_default()],
    );
    let y = curve::scalar_from_digest(&digest);
    Ok(Challenge::from_array(curve::encode_scalar(&y)?))
}

/// `H1(hid)`: the identity point.
pub(crate) fn identity_point(hid: &HashedIdentity) -> Result<G1Affine, MpinError> {
    curve::hash_to_g1(hid.as_bytes())
}

/// `H1(hash_date_id(date, hid))`: the date-bound permit point.
pub(crate) fn date_point(hash_type: HashType, date: u32, hid: &HashedIdentity) -> Result<G1Affine, MpinError> {
    curve::hash_to_g1(&hash_date_id(hash_type, date, hid))
}
