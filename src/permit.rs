use std::time::{SystemTime, UNIX_EPOCH};

use ark_ec::CurveGroup;
use mpin_primitives::{constants::SECONDS_PER_DAY, HashType};
use zeroize::Zeroizing;

use crate::{
    curve,
    errors::MpinError,
    hashers,
    types::{HashedIdentity, MasterSecretShare, TimePermitShare},
};

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Days since the Unix epoch.
#[must_use]
pub fn today() -> u32 {
    u32::try_from(unix_secs() / SECONDS_PER_DAY).unwrap_or(u32::MAX)
}

/// Seconds since the Unix epoch: the time value bound into single-pass
/// challenges.
#[must_use]
pub fn current_time() -> u32 {
    u32::try_from(unix_secs()).unwrap_or(u32::MAX)
}

/// Time permit share `s·H1(hash(date || hid))` for one authority.
///
/// # Errors
///
/// `InvalidDate` for date 0, which means "no permit" everywhere else.
pub fn client_permit_share(
    hash_type: HashType,
    date: u32,
    master: &MasterSecretShare,
    hid: &HashedIdentity,
) -> Result<TimePermitShare, MpinError> {
    if date == 0 {
        return Err(MpinError::InvalidDate(date));
    }
    let s = Zeroizing::new(curve::decode_scalar(master.as_bytes())?);
    let p = hashers::date_point(hash_type, date, hid)?;
    let share = Zeroizing::new((p * *s).into_affine());
    Ok(TimePermitShare::from_array(curve::encode_g1(&share)?))
}

/// Whether a permit issued for `date` is acceptable on `today`.
#[must_use]
pub const fn permit_date_ok(date: u32, today: u32, tolerance_days: u32) -> bool {
    date.abs_diff(today) <= tolerance_days
}

/// Whether a client time value lies within `max_skew` seconds of `now`.
#[must_use]
pub const fn time_window_ok(time: u32, now: u32, max_skew: u32) -> bool {
    time.abs_diff(now) <= max_skew
}
