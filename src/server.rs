//! Server side of the authentication protocol.
//!
//! Verification recomputes `HID` (and `HTID` for a permit-bearing message)
//! from the identity claim, derives or receives the challenge `y`, and accepts
//! iff `e(V, Q) · e(y·HTID + UT, sQ) = 1`. Cheap checks on the claim, the
//! time value and the permit date run before any pairing. A wrong PIN and a
//! forged message fail the same pairing check and report the same outcome.

use std::collections::HashMap;

use ark_bls12_381::{Fr, G1Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::{
    config::ServerConfig,
    curve::{self, Gt},
    errors::{MpinError, VerifyErr},
    hashers::{self, hash_challenge, hash_id},
    permit::{current_time, permit_date_ok, time_window_ok, today},
    types::{
        AuthMessage, Challenge, CommitMessage, Commitment, HashedIdentity, IdentityClaim,
        IdentityPoint, PairingValue, Proof, ServerSecret, G1_LEN, MAX_MESSAGE_LEN, MAX_PIN,
    },
};

/// Baby-step/giant-step stride; `STEP² ≥ 2·MAX_PIN`.
const STEP: u32 = 142;

/// The server's notion of now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerClock {
    /// Days since the Unix epoch.
    pub today: u32,
    /// Seconds since the Unix epoch.
    pub time: u32,
}

impl ServerClock {
    #[must_use]
    pub fn now() -> Self {
        Self { today: today(), time: current_time() }
    }
}

/// Values recomputed during a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOutput {
    pub hid: IdentityPoint,
    /// Present when the message used a time permit.
    pub htid: Option<IdentityPoint>,
    pub y: Challenge,
}

fn resolve_claim(config: &ServerConfig, claim: &IdentityClaim) -> Result<HashedIdentity, VerifyErr> {
    match (claim, config.anonymous) {
        (IdentityClaim::Plain(id), false) => {
            hash_id(config.hash_type, id).map_err(|_| VerifyErr::MalformedInput)
        }
        (IdentityClaim::Hashed(hid), true) => Ok(hid.clone()),
        _ => Err(VerifyErr::MalformedInput),
    }
}

fn check_date(config: &ServerConfig, date: Option<u32>, today: u32) -> Result<(), VerifyErr> {
    match date {
        Some(0) => Err(VerifyErr::MalformedInput),
        Some(d) if !permit_date_ok(d, today, config.permit_tolerance_days) => {
            Err(VerifyErr::PermitExpired)
        }
        None if config.require_time_permit => Err(VerifyErr::PermitExpired),
        _ => Ok(()),
    }
}

fn check_message(config: &ServerConfig, message: Option<&[u8]>) -> Result<(), VerifyErr> {
    match message {
        None if config.require_message => Err(VerifyErr::MalformedInput),
        Some(m) if m.len() > MAX_MESSAGE_LEN => Err(VerifyErr::MalformedInput),
        _ => Ok(()),
    }
}

/// Decode `UT` or `SEC` from the wire. An undecodable value or the identity
/// point fails exactly like a wrong PIN.
fn decode_wire_point(bytes: &[u8; G1_LEN]) -> Result<G1Affine, VerifyErr> {
    let p = curve::decode_g1(bytes).map_err(|_| VerifyErr::InvalidToken)?;
    if p.is_zero() {
        return Err(VerifyErr::InvalidToken);
    }
    Ok(p)
}

fn encode_point(p: &G1Affine) -> Result<IdentityPoint, VerifyErr> {
    curve::encode_g1(p)
        .map(IdentityPoint::from_array)
        .map_err(|_| VerifyErr::MalformedInput)
}

/// The pairing check shared by both protocol variants.
fn verify(
    config: &ServerConfig,
    secret: &ServerSecret,
    hid: &HashedIdentity,
    date: Option<u32>,
    ut: &Commitment,
    proof: &Proof,
    y: &Challenge,
) -> Result<ServerOutput, VerifyErr> {
    let ut_point = decode_wire_point(ut.as_bytes())?;
    let v = decode_wire_point(proof.as_bytes())?;
    let s_q = Zeroizing::new(
        curve::decode_g2(secret.as_bytes()).map_err(|_| VerifyErr::MalformedInput)?,
    );
    let y_scalar = curve::decode_scalar(y.as_bytes()).map_err(|_| VerifyErr::MalformedInput)?;
    let hid_point = hashers::identity_point(hid).map_err(|_| VerifyErr::MalformedInput)?;

    let htid = match date {
        Some(d) => {
            let date_point = hashers::date_point(config.hash_type, d, hid)
                .map_err(|_| VerifyErr::MalformedInput)?;
            Some((hid_point + date_point).into_affine())
        }
        None => None,
    };
    let base = htid.unwrap_or(hid_point);
    let w = (base * y_scalar + ut_point).into_affine();

    if !curve::is_unity(&curve::pairing_product(&v, &w, &s_q)) {
        return Err(VerifyErr::InvalidToken);
    }
    Ok(ServerOutput {
        hid: encode_point(&hid_point)?,
        htid: htid.as_ref().map(encode_point).transpose()?,
        y: y.clone(),
    })
}

fn log_outcome(outcome: &Result<ServerOutput, VerifyErr>, permit: bool) {
    match outcome {
        Ok(_) => debug!(permit, "authentication accepted"),
        Err(e) => warn!(outcome = %e, code = ?e.code(), permit, "authentication rejected"),
    }
}

fn single_pass(
    config: &ServerConfig,
    secret: &ServerSecret,
    msg: &AuthMessage,
    clock: ServerClock,
) -> Result<ServerOutput, VerifyErr> {
    let hid = resolve_claim(config, &msg.claim)?;
    check_message(config, msg.message.as_deref())?;
    if !time_window_ok(msg.time, clock.time, config.max_clock_skew_secs) {
        return Err(VerifyErr::TimeWindow);
    }
    check_date(config, msg.date, clock.today)?;
    let y = hash_challenge(config.hash_type, msg.time, &msg.ut, msg.message.as_deref())
        .map_err(|_| VerifyErr::InvalidToken)?;
    verify(config, secret, &hid, msg.date, &msg.ut, &msg.sec, &y)
}

/// Verify a single-pass authentication message.
///
/// # Errors
///
/// - `MalformedInput`: claim kind does not match the configured mode, a zero
///   permit date, or a missing/oversized message.
/// - `TimeWindow`: client time further than `max_clock_skew_secs` from `clock`.
/// - `PermitExpired`: permit date outside tolerance, or no permit when one is
///   required.
/// - `InvalidToken`: the pairing check failed, or `UT`/`SEC` is not a valid
///   non-identity point. Both look the same as a wrong PIN.
pub fn server(
    config: &ServerConfig,
    secret: &ServerSecret,
    msg: &AuthMessage,
    clock: ServerClock,
) -> Result<ServerOutput, VerifyErr> {
    let outcome = single_pass(config, secret, msg, clock);
    log_outcome(&outcome, msg.date.is_some());
    outcome
}

/// Fresh random challenge for the multi-pass variant.
pub fn server_challenge<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Challenge, MpinError> {
    let y = curve::random_scalar(rng)?;
    Ok(Challenge::from_array(curve::encode_scalar(&y)?))
}

/// Verify the client's response to a challenge issued by [`server_challenge`].
///
/// Same checks as [`server`] minus the time window, which the challenge
/// replaces.
pub fn server_2(
    config: &ServerConfig,
    secret: &ServerSecret,
    commit: &CommitMessage,
    y: &Challenge,
    proof: &Proof,
    today: u32,
) -> Result<ServerOutput, VerifyErr> {
    let outcome = resolve_claim(config, &commit.claim).and_then(|hid| {
        check_date(config, commit.date, today)?;
        verify(config, secret, &hid, commit.date, &commit.ut, proof, y)
    });
    log_outcome(&outcome, commit.date.is_some());
    outcome
}

/// `E = e(V, Q)·e(W, sQ)` and `F = e(W, Q)` with `W = y·HID + UT`, where `y`
/// is recomputed from the message exactly as [`server`] does.
///
/// For a message produced with a PIN off by `d`, `E = F^(−d)`.
///
/// # Errors
///
/// `Unsupported` for a message that used a time permit.
pub fn pin_error_values(
    config: &ServerConfig,
    secret: &ServerSecret,
    msg: &AuthMessage,
) -> Result<(PairingValue, PairingValue), MpinError> {
    if msg.date.is_some() {
        return Err(MpinError::Unsupported("PIN error diagnosis with a time permit"));
    }
    let hid = resolve_claim(config, &msg.claim)?;
    let ut = decode_wire_point(msg.ut.as_bytes())?;
    let v = decode_wire_point(msg.sec.as_bytes())?;
    let s_q = Zeroizing::new(curve::decode_g2(secret.as_bytes())?);
    let y = hash_challenge(config.hash_type, msg.time, &msg.ut, msg.message.as_deref())?;
    let y = curve::decode_scalar(y.as_bytes())?;
    let hid_point = hashers::identity_point(&hid)?;

    let w = (hid_point * y + ut).into_affine();
    let e = curve::pairing_product(&v, &w, &s_q);
    let f = curve::pairing_with_generator(&w);
    Ok((
        PairingValue::from_array(curve::encode_gt(&e)?),
        PairingValue::from_array(curve::encode_gt(&f)?),
    ))
}

/// Solve `E = F^(−d)` for `|d| < MAX_PIN`.
///
/// Returns `None` when no such `d` exists, i.e. the failure was not a
/// mistyped PIN.
pub fn recover_pin_error(e: &PairingValue, f: &PairingValue) -> Result<Option<i32>, MpinError> {
    let e = curve::decode_gt(e.as_bytes())?;
    let f = curve::decode_gt(f.as_bytes())?;
    solve_offset(&e, &f)
}

/// Signed difference between the entered and the registered PIN, recovered
/// from a failed single-pass attempt. Server-side only.
pub fn pin_error(
    config: &ServerConfig,
    secret: &ServerSecret,
    msg: &AuthMessage,
) -> Result<Option<i32>, MpinError> {
    let (e, f) = pin_error_values(config, secret, msg)?;
    let d = recover_pin_error(&e, &f)?;
    debug!(found = d.is_some(), "PIN error search finished");
    Ok(d)
}

fn solve_offset(e: &Gt, f: &Gt) -> Result<Option<i32>, MpinError> {
    // E + MAX_PIN·F = j·F with j = MAX_PIN − d in (0, 2·MAX_PIN).
    let target = *e + *f * Fr::from(MAX_PIN);

    let mut baby = HashMap::with_capacity(STEP as usize);
    let mut acc = Gt::zero();
    for b in 0..STEP {
        baby.entry(curve::encode_gt(&acc)?).or_insert(b);
        acc += *f;
    }

    let giant = -acc;
    let mut probe = target;
    for a in 0..STEP {
        if let Some(&b) = baby.get(&curve::encode_gt(&probe)?) {
            let d = i64::from(MAX_PIN) - i64::from(a * STEP + b);
            if d.unsigned_abs() < u64::from(MAX_PIN) {
                return Ok(i32::try_from(d).ok());
            }
        }
        probe += giant;
    }
    Ok(None)
}
