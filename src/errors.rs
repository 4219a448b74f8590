use mpin_primitives::OctetError;
use thiserror::Error;

/// Outcome classes every failure maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed length or encoding, out-of-range PIN or date, short buffer.
    InputError,
    /// Entropy source unavailable or failing.
    RngError,
    /// Invalid point encoding, or a failed pairing check.
    CryptoError,
    PermitExpired,
    TimeWindowError,
}

/// Server verification outcomes other than success.
///
/// `InvalidToken` covers both a wrong PIN and a corrupted or forged message;
/// the two are deliberately indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyErr {
    #[error("invalid token")]
    InvalidToken,
    #[error("time permit expired")]
    PermitExpired,
    #[error("time value outside the accepted window")]
    TimeWindow,
    #[error("malformed input")]
    MalformedInput,
}

impl VerifyErr {
    #[must_use]
    pub const fn code(self) -> ErrorCode {
        match self {
            Self::InvalidToken => ErrorCode::CryptoError,
            Self::PermitExpired => ErrorCode::PermitExpired,
            Self::TimeWindow => ErrorCode::TimeWindowError,
            Self::MalformedInput => ErrorCode::InputError,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MpinError {
    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("buffer too small: capacity {capacity}, needed {needed}")]
    BufferTooSmall { capacity: usize, needed: usize },

    #[error("identity too long: {len} bytes, max {max}")]
    IdentityTooLong { len: usize, max: usize },

    #[error("pin {pin} out of range [0, {max})")]
    PinOutOfRange { pin: u32, max: u32 },

    #[error("invalid date: {0}")]
    InvalidDate(u32),

    #[error("message too long: {len} bytes, max {max}")]
    MessageTooLong { len: usize, max: usize },

    #[error("no shares to recombine")]
    EmptyShares,

    #[error("decode error: {0}")]
    DecodeError(&'static str),

    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    #[error("invalid seed: {0}")]
    InvalidSeed(&'static str),

    #[error("random source unavailable")]
    RngUnavailable,

    #[error("invalid curve point encoding")]
    InvalidPoint,

    #[error("invalid scalar encoding")]
    InvalidScalar,

    #[error("hash to curve failed")]
    HashToCurve,

    #[error("verification failed: {0}")]
    Verify(#[from] VerifyErr),
}

impl MpinError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidLength { .. }
            | Self::BufferTooSmall { .. }
            | Self::IdentityTooLong { .. }
            | Self::PinOutOfRange { .. }
            | Self::InvalidDate(_)
            | Self::MessageTooLong { .. }
            | Self::EmptyShares
            | Self::DecodeError(_)
            | Self::Unsupported(_) => ErrorCode::InputError,
            Self::InvalidSeed(_) | Self::RngUnavailable => ErrorCode::RngError,
            Self::InvalidPoint | Self::InvalidScalar | Self::HashToCurve => ErrorCode::CryptoError,
            Self::Verify(v) => v.code(),
        }
    }
}

impl From<OctetError> for MpinError {
    fn from(e: OctetError) -> Self {
        match e {
            OctetError::BufferTooSmall { capacity, needed } => Self::BufferTooSmall { capacity, needed },
        }
    }
}
