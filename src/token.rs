//! PIN embedding.
//!
//! `Token = CS − pin·H1(hid)`. Adding `pin·H1(hid)` back with the same PIN
//! restores `CS` exactly; any other PIN leaves a residue of
//! `(pin' − pin)·H1(hid)` that the server's pairing check rejects.

use ark_bls12_381::{Fr, G1Affine};
use ark_ec::CurveGroup;
use mpin_primitives::HashType;
use zeroize::Zeroizing;

use crate::{
    curve,
    errors::MpinError,
    hashers,
    types::{ClientSecret, Token, MAX_PIN},
};

pub(crate) const fn check_pin(pin: u32) -> Result<(), MpinError> {
    if pin >= MAX_PIN {
        return Err(MpinError::PinOutOfRange { pin, max: MAX_PIN });
    }
    Ok(())
}

/// `pin·H1(hash_id(identity))`
pub(crate) fn pin_point(
    hash_type: HashType,
    identity: &[u8],
    pin: u32,
) -> Result<Zeroizing<G1Affine>, MpinError> {
    check_pin(pin)?;
    let hid = hashers::hash_id(hash_type, identity)?;
    let p = hashers::identity_point(&hid)?;
    let pin = Zeroizing::new(Fr::from(pin));
    Ok(Zeroizing::new((p * *pin).into_affine()))
}

/// Subtract the PIN from a full client secret, producing the long-lived token.
///
/// # Errors
///
/// `PinOutOfRange` unless `pin < MAX_PIN`; `InvalidPoint` for an undecodable
/// client secret.
pub fn extract_pin(
    hash_type: HashType,
    identity: &[u8],
    pin: u32,
    secret: &ClientSecret,
) -> Result<Token, MpinError> {
    let embed = pin_point(hash_type, identity, pin)?;
    let cs = Zeroizing::new(curve::decode_g1(secret.as_bytes())?);
    let token = Zeroizing::new((*cs - *embed).into_affine());
    Ok(Token::from_array(curve::encode_g1(&token)?))
}

/// Add the PIN back, recovering the client secret.
pub fn restore_pin(
    hash_type: HashType,
    identity: &[u8],
    pin: u32,
    token: &Token,
) -> Result<ClientSecret, MpinError> {
    let embed = pin_point(hash_type, identity, pin)?;
    let t = Zeroizing::new(curve::decode_g1(token.as_bytes())?);
    let cs = Zeroizing::new((*t + *embed).into_affine());
    Ok(ClientSecret::from_array(curve::encode_g1(&cs)?))
}
