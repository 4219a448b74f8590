//! Canonical wire encodings of the protocol messages.
//!
//! ```text
//! auth:   "mpin.auth.v1"   || flags || claim || UT || SEC || [BE32(date)] || BE32(time) || [BE16(len) || message]
//! commit: "mpin.commit.v1" || flags || claim || UT || [BE32(date)]
//! claim:  HID (48 bytes) when hashed, else BE16(len) || identity
//! ```
//!
//! Order is fixed, lengths are exact and trailing bytes are rejected.

use mpin_primitives::{
    constants::{TAG_AUTH, TAG_COMMIT},
    Octet,
};

use crate::{
    errors::MpinError,
    types::{
        AuthMessage, CommitMessage, Commitment, HashedIdentity, IdentityClaim, Proof, FS, G1_LEN,
        MAX_IDENTITY_LEN, MAX_MESSAGE_LEN,
    },
};

const FLAG_HASHED: u8 = 0b001;
const FLAG_DATE: u8 = 0b010;
const FLAG_MESSAGE: u8 = 0b100;

/// Largest possible encoded [`AuthMessage`].
pub const MAX_AUTH_MESSAGE_LEN: usize =
    TAG_AUTH.len() + 1 + 2 + MAX_IDENTITY_LEN + 2 * G1_LEN + 4 + 4 + 2 + MAX_MESSAGE_LEN;

/// Largest possible encoded [`CommitMessage`].
pub const MAX_COMMIT_MESSAGE_LEN: usize = TAG_COMMIT.len() + 1 + 2 + MAX_IDENTITY_LEN + G1_LEN + 4;

#[inline]
#[must_use]
pub const fn be16(x: u16) -> [u8; 2] {
    x.to_be_bytes()
}

#[inline]
#[must_use]
pub const fn be32(x: u32) -> [u8; 4] {
    x.to_be_bytes()
}

fn claim_flag(claim: &IdentityClaim) -> u8 {
    match claim {
        IdentityClaim::Hashed(_) => FLAG_HASHED,
        IdentityClaim::Plain(_) => 0,
    }
}

fn put_claim(v: &mut Vec<u8>, claim: &IdentityClaim) -> Result<(), MpinError> {
    match claim {
        IdentityClaim::Hashed(hid) => v.extend_from_slice(hid.as_bytes()),
        IdentityClaim::Plain(id) => {
            if id.len() > MAX_IDENTITY_LEN {
                return Err(MpinError::IdentityTooLong { len: id.len(), max: MAX_IDENTITY_LEN });
            }
            let len = u16::try_from(id.len()).map_err(|_| MpinError::DecodeError("identity length"))?;
            v.extend_from_slice(&be16(len));
            v.extend_from_slice(id);
        }
    }
    Ok(())
}

/// Encode a single-pass message.
///
/// # Errors
///
/// `IdentityTooLong` / `MessageTooLong` for fields over their caps.
pub fn encode_auth_message(msg: &AuthMessage) -> Result<Vec<u8>, MpinError> {
    let mut flags = claim_flag(&msg.claim);
    if msg.date.is_some() {
        flags |= FLAG_DATE;
    }
    if msg.message.is_some() {
        flags |= FLAG_MESSAGE;
    }

    let mut v = Vec::with_capacity(MAX_AUTH_MESSAGE_LEN);
    v.extend_from_slice(TAG_AUTH.as_bytes());
    v.push(flags);
    put_claim(&mut v, &msg.claim)?;
    v.extend_from_slice(msg.ut.as_bytes());
    v.extend_from_slice(msg.sec.as_bytes());
    if let Some(date) = msg.date {
        v.extend_from_slice(&be32(date));
    }
    v.extend_from_slice(&be32(msg.time));
    if let Some(m) = &msg.message {
        if m.len() > MAX_MESSAGE_LEN {
            return Err(MpinError::MessageTooLong { len: m.len(), max: MAX_MESSAGE_LEN });
        }
        let len = u16::try_from(m.len()).map_err(|_| MpinError::DecodeError("message length"))?;
        v.extend_from_slice(&be16(len));
        v.extend_from_slice(m);
    }
    Ok(v)
}

/// Encode into a fixed-capacity buffer; `out` is untouched on failure.
pub fn encode_auth_message_into(msg: &AuthMessage, out: &mut Octet) -> Result<(), MpinError> {
    let bytes = encode_auth_message(msg)?;
    out.write(&bytes)?;
    Ok(())
}

/// Encode the first multi-pass message.
pub fn encode_commit_message(msg: &CommitMessage) -> Result<Vec<u8>, MpinError> {
    let mut flags = claim_flag(&msg.claim);
    if msg.date.is_some() {
        flags |= FLAG_DATE;
    }
    let mut v = Vec::with_capacity(MAX_COMMIT_MESSAGE_LEN);
    v.extend_from_slice(TAG_COMMIT.as_bytes());
    v.push(flags);
    put_claim(&mut v, &msg.claim)?;
    v.extend_from_slice(msg.ut.as_bytes());
    if let Some(date) = msg.date {
        v.extend_from_slice(&be32(date));
    }
    Ok(v)
}

struct Reader<'a> {
    data: &'a [u8],
    off: usize,
}

impl<'a> Reader<'a> {
    const fn new(data: &'a [u8]) -> Self {
        Self { data, off: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], MpinError> {
        let end = self.off.checked_add(n).ok_or(MpinError::DecodeError("length overflow"))?;
        let out = self.data.get(self.off..end).ok_or(MpinError::DecodeError("truncated"))?;
        self.off = end;
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, MpinError> {
        Ok(self.take(1)?[0])
    }

    fn be16(&mut self) -> Result<u16, MpinError> {
        let mut b = [0u8; 2];
        b.copy_from_slice(self.take(2)?);
        Ok(u16::from_be_bytes(b))
    }

    fn be32(&mut self) -> Result<u32, MpinError> {
        let mut b = [0u8; 4];
        b.copy_from_slice(self.take(4)?);
        Ok(u32::from_be_bytes(b))
    }

    fn tag(&mut self, tag: &str) -> Result<(), MpinError> {
        if self.take(tag.len())? != tag.as_bytes() {
            return Err(MpinError::DecodeError("invalid domain tag"));
        }
        Ok(())
    }

    fn claim(&mut self, flags: u8) -> Result<IdentityClaim, MpinError> {
        if flags & FLAG_HASHED != 0 {
            return Ok(IdentityClaim::Hashed(HashedIdentity::try_from(self.take(FS)?)?));
        }
        let len = usize::from(self.be16()?);
        if len > MAX_IDENTITY_LEN {
            return Err(MpinError::IdentityTooLong { len, max: MAX_IDENTITY_LEN });
        }
        Ok(IdentityClaim::Plain(self.take(len)?.to_vec()))
    }

    fn finish(&self) -> Result<(), MpinError> {
        if self.off != self.data.len() {
            return Err(MpinError::DecodeError("trailing bytes"));
        }
        Ok(())
    }
}

/// Decode a single-pass message. Point validity is left to the server.
///
/// # Errors
///
/// `DecodeError` for a wrong tag, unknown flags, truncation or trailing bytes;
/// `IdentityTooLong` / `MessageTooLong` for oversized fields.
pub fn decode_auth_message(data: &[u8]) -> Result<AuthMessage, MpinError> {
    if data.len() > MAX_AUTH_MESSAGE_LEN {
        return Err(MpinError::DecodeError("message exceeds maximum length"));
    }
    let mut r = Reader::new(data);
    r.tag(TAG_AUTH)?;
    let flags = r.u8()?;
    if flags & !(FLAG_HASHED | FLAG_DATE | FLAG_MESSAGE) != 0 {
        return Err(MpinError::DecodeError("unknown flags"));
    }
    let claim = r.claim(flags)?;
    let ut = Commitment::try_from(r.take(G1_LEN)?)?;
    let sec = Proof::try_from(r.take(G1_LEN)?)?;
    let date = if flags & FLAG_DATE != 0 { Some(r.be32()?) } else { None };
    let time = r.be32()?;
    let message = if flags & FLAG_MESSAGE != 0 {
        let len = usize::from(r.be16()?);
        if len > MAX_MESSAGE_LEN {
            return Err(MpinError::MessageTooLong { len, max: MAX_MESSAGE_LEN });
        }
        Some(r.take(len)?.to_vec())
    } else {
        None
    };
    r.finish()?;
    Ok(AuthMessage { claim, ut, sec, date, time, message })
}

pub fn decode_commit_message(data: &[u8]) -> Result<CommitMessage, MpinError> {
    if data.len() > MAX_COMMIT_MESSAGE_LEN {
        return Err(MpinError::DecodeError("message exceeds maximum length"));
    }
    let mut r = Reader::new(data);
    r.tag(TAG_COMMIT)?;
    let flags = r.u8()?;
    if flags & !(FLAG_HASHED | FLAG_DATE) != 0 {
        return Err(MpinError::DecodeError("unknown flags"));
    }
    let claim = r.claim(flags)?;
    let ut = Commitment::try_from(r.take(G1_LEN)?)?;
    let date = if flags & FLAG_DATE != 0 { Some(r.be32()?) } else { None };
    r.finish()?;
    Ok(CommitMessage { claim, ut, date })
}

#[cfg(test)]
#[allow(clippy::missing_assert_message)]
mod tests {
    use super::*;
    use crate::{
        client::{client, client_1, ClientRequest, PermitUse},
        config::ClientConfig,
        errors::ErrorCode,
        fixtures::{Fixture, DATE, IDENTITY, PIN, TIME},
    };
    use mpin_primitives::HashType;

    fn sample(anonymous: bool, permit: bool, message: Option<&[u8]>) -> AuthMessage {
        let mut fx = Fixture::new(HashType::Sha256);
        let token = fx.token.clone();
        let tp = fx.permit(DATE);
        let req = ClientRequest {
            identity: IDENTITY,
            pin: PIN,
            token: &token,
            permit: permit.then_some(PermitUse { date: DATE, permit: &tp }),
            message,
            time: TIME,
        };
        let cfg = ClientConfig { anonymous, ..ClientConfig::default() };
        client(&cfg, &req, &mut fx.rng).unwrap().message
    }

    #[test]
    fn layout_of_plain_message() {
        let msg = sample(false, false, None);
        let enc = encode_auth_message(&msg).unwrap();
        assert_eq!(&enc[..TAG_AUTH.len()], TAG_AUTH.as_bytes());
        assert_eq!(enc[TAG_AUTH.len()], 0);
        assert_eq!(enc.len(), TAG_AUTH.len() + 1 + 2 + IDENTITY.len() + 2 * G1_LEN + 4);
        assert_eq!(decode_auth_message(&enc).unwrap(), msg);
    }

    #[test]
    fn every_optional_field_survives() {
        let msg = sample(true, true, Some(b"login to example.com"));
        let enc = encode_auth_message(&msg).unwrap();
        assert_eq!(enc[TAG_AUTH.len()], FLAG_HASHED | FLAG_DATE | FLAG_MESSAGE);
        let dec = decode_auth_message(&enc).unwrap();
        assert_eq!(dec, msg);
        assert_eq!(dec.date, Some(DATE));
    }

    #[test]
    fn truncation_and_trailing_bytes_rejected() {
        let enc = encode_auth_message(&sample(false, true, Some(b"m"))).unwrap();
        for cut in [0, 5, TAG_AUTH.len() + 1, enc.len() - 1] {
            assert!(matches!(decode_auth_message(&enc[..cut]), Err(MpinError::DecodeError(_))));
        }
        let mut long = enc;
        long.push(0);
        assert_eq!(decode_auth_message(&long), Err(MpinError::DecodeError("trailing bytes")));
    }

    #[test]
    fn bad_tag_and_flags_rejected() {
        let mut enc = encode_auth_message(&sample(false, false, None)).unwrap();
        enc[TAG_AUTH.len()] = 0b1000;
        assert_eq!(decode_auth_message(&enc), Err(MpinError::DecodeError("unknown flags")));
        enc[0] ^= 0xFF;
        assert_eq!(decode_auth_message(&enc), Err(MpinError::DecodeError("invalid domain tag")));
    }

    #[test]
    fn oversized_fields_rejected_on_encode() {
        let mut msg = sample(false, false, None);
        msg.message = Some(vec![0; MAX_MESSAGE_LEN + 1]);
        assert!(matches!(encode_auth_message(&msg), Err(MpinError::MessageTooLong { .. })));
        msg.message = None;
        msg.claim = IdentityClaim::Plain(vec![b'a'; MAX_IDENTITY_LEN + 1]);
        assert!(matches!(encode_auth_message(&msg), Err(MpinError::IdentityTooLong { .. })));
    }

    #[test]
    fn octet_capacity_is_enforced() {
        let msg = sample(false, false, None);
        let mut small = Octet::new(16);
        let err = encode_auth_message_into(&msg, &mut small).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InputError);
        assert!(small.is_empty());
        let mut out = Octet::new(MAX_AUTH_MESSAGE_LEN);
        encode_auth_message_into(&msg, &mut out).unwrap();
        assert_eq!(decode_auth_message(out.as_bytes()).unwrap(), msg);
    }

    #[test]
    fn commit_message_round_trip() {
        let mut fx = Fixture::new(HashType::Sha256);
        let token = fx.token.clone();
        let tp = fx.permit(DATE);
        let req = ClientRequest {
            identity: IDENTITY,
            pin: PIN,
            token: &token,
            permit: Some(PermitUse { date: DATE, permit: &tp }),
            message: None,
            time: 0,
        };
        let (_, commit) = client_1(&ClientConfig::default(), &req, &mut fx.rng).unwrap();
        let enc = encode_commit_message(&commit).unwrap();
        assert_eq!(&enc[..TAG_COMMIT.len()], TAG_COMMIT.as_bytes());
        assert_eq!(decode_commit_message(&enc).unwrap(), commit);
        assert!(decode_auth_message(&enc).is_err());
    }
}
