//! Client side of the authentication protocol.
//!
//! The client rebuilds `T = Token + pin·HID` (plus the time permit when one
//! is used), commits to a fresh `x` with `UT = x·HTID`, and answers the
//! challenge `y` with `V = −(x+y)·T`. In the single-pass variant `y` is the
//! hash of the time value, `UT` and the optional message; in the multi-pass
//! variant the server supplies it.

use core::fmt;

use ark_bls12_381::{Fr, G1Affine};
use ark_ec::CurveGroup;
use rand_core::{CryptoRng, RngCore};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{
    config::ClientConfig,
    curve,
    errors::MpinError,
    hashers::{self, hash_challenge, hash_id},
    token::pin_point,
    types::{
        AuthMessage, Challenge, CommitMessage, Commitment, EphemeralScalar, HashedIdentity,
        IdentityClaim, Proof, TimePermit, Token, G1_LEN, MAX_MESSAGE_LEN,
    },
};

/// A time permit together with the date it was issued for.
#[derive(Clone, Copy, Debug)]
pub struct PermitUse<'a> {
    pub date: u32,
    pub permit: &'a TimePermit,
}

/// Everything one authentication attempt needs.
#[derive(Clone, Copy, Debug)]
pub struct ClientRequest<'a> {
    pub identity: &'a [u8],
    /// The PIN as entered; a wrong one is only detected by the server.
    pub pin: u32,
    pub token: &'a Token,
    pub permit: Option<PermitUse<'a>>,
    /// Payload signed by the proof.
    pub message: Option<&'a [u8]>,
    /// Seconds since the Unix epoch.
    pub time: u32,
}

#[derive(Clone, Debug)]
pub struct ClientOutput {
    pub message: AuthMessage,
    /// The challenge the proof answers.
    pub y: Challenge,
    pub x: EphemeralScalar,
}

/// Secret state between the two client passes. Consumed by [`client_2`].
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClientCommitment {
    x: EphemeralScalar,
    t: [u8; G1_LEN],
}

impl fmt::Debug for ClientCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientCommitment(..)")
    }
}

struct Prepared {
    hid: HashedIdentity,
    /// `HTID` with a permit, `HID` without.
    base: G1Affine,
    t: Zeroizing<G1Affine>,
    date: Option<u32>,
}

fn prepare(config: &ClientConfig, req: &ClientRequest<'_>) -> Result<Prepared, MpinError> {
    if let Some(m) = req.message {
        if m.len() > MAX_MESSAGE_LEN {
            return Err(MpinError::MessageTooLong { len: m.len(), max: MAX_MESSAGE_LEN });
        }
    }
    let embed = pin_point(config.hash_type, req.identity, req.pin)?;
    let hid = hash_id(config.hash_type, req.identity)?;
    let hid_point = hashers::identity_point(&hid)?;

    let token = Zeroizing::new(curve::decode_g1(req.token.as_bytes())?);
    let mut t = Zeroizing::new(*token + *embed);
    let mut base = hid_point;
    let mut date = None;

    if let Some(p) = req.permit {
        if p.date == 0 {
            return Err(MpinError::InvalidDate(p.date));
        }
        let tp = Zeroizing::new(curve::decode_g1(p.permit.as_bytes())?);
        *t += *tp;
        let date_point = hashers::date_point(config.hash_type, p.date, &hid)?;
        base = (hid_point + date_point).into_affine();
        date = Some(p.date);
    }

    Ok(Prepared { hid, base, t: Zeroizing::new((*t).into_affine()), date })
}

fn claim(config: &ClientConfig, identity: &[u8], hid: HashedIdentity) -> IdentityClaim {
    if config.anonymous {
        IdentityClaim::Hashed(hid)
    } else {
        IdentityClaim::Plain(identity.to_vec())
    }
}

/// `UT = x·base` for a fresh `x`.
fn commit<R: RngCore + CryptoRng + ?Sized>(
    base: &G1Affine,
    rng: &mut R,
) -> Result<(Zeroizing<Fr>, Commitment), MpinError> {
    let x = Zeroizing::new(curve::random_scalar(rng)?);
    let ut = (*base * *x).into_affine();
    Ok((x, Commitment::from_array(curve::encode_g1(&ut)?)))
}

/// `V = −(x+y)·T`
fn respond(x: &Fr, y: &Challenge, t: &G1Affine) -> Result<Proof, MpinError> {
    let y = curve::decode_scalar(y.as_bytes())?;
    let k = Zeroizing::new(*x + y);
    let v = (-(*t * *k)).into_affine();
    Ok(Proof::from_array(curve::encode_g1(&v)?))
}

/// Single-pass authentication: commitment and proof in one message.
///
/// # Errors
///
/// `InputError` for an out-of-range PIN, a zero permit date or an oversized
/// message; `CryptoError` for an undecodable token or permit; `RngError` when
/// the random source fails.
pub fn client<R: RngCore + CryptoRng + ?Sized>(
    config: &ClientConfig,
    req: &ClientRequest<'_>,
    rng: &mut R,
) -> Result<ClientOutput, MpinError> {
    let prep = prepare(config, req)?;
    let (x, ut) = commit(&prep.base, rng)?;
    let y = hash_challenge(config.hash_type, req.time, &ut, req.message)?;
    let sec = respond(&x, &y, &prep.t)?;
    debug!(anonymous = config.anonymous, permit = prep.date.is_some(), "client proof computed");

    let x_bytes = Zeroizing::new(curve::encode_scalar(&x)?);
    let message = AuthMessage {
        claim: claim(config, req.identity, prep.hid),
        ut,
        sec,
        date: prep.date,
        time: req.time,
        message: req.message.map(<[u8]>::to_vec),
    };
    Ok(ClientOutput { message, y, x: EphemeralScalar::from_array(*x_bytes) })
}

/// First pass of the multi-pass variant. `req.time` and `req.message` are
/// ignored; the server's challenge replaces them.
pub fn client_1<R: RngCore + CryptoRng + ?Sized>(
    config: &ClientConfig,
    req: &ClientRequest<'_>,
    rng: &mut R,
) -> Result<(ClientCommitment, CommitMessage), MpinError> {
    let prep = prepare(config, req)?;
    let (x, ut) = commit(&prep.base, rng)?;
    debug!(anonymous = config.anonymous, permit = prep.date.is_some(), "client commitment computed");

    let state = ClientCommitment {
        x: EphemeralScalar::from_array(curve::encode_scalar(&x)?),
        t: curve::encode_g1(&prep.t)?,
    };
    let msg = CommitMessage { claim: claim(config, req.identity, prep.hid), ut, date: prep.date };
    Ok((state, msg))
}

/// Second pass: answer the server's challenge.
pub fn client_2(state: ClientCommitment, y: &Challenge) -> Result<Proof, MpinError> {
    let x = Zeroizing::new(curve::decode_scalar(state.x.as_bytes())?);
    let t = Zeroizing::new(curve::decode_g1(&state.t)?);
    respond(&x, y, &t)
}
