#![forbid(unsafe_code)]

/// Field-size unit: bytes of one BLS12-381 base-field coordinate.
pub const FS: usize = 48;
/// Group-order-size unit: bytes of one scalar.
pub const GS: usize = 32;

pub const G1_LEN: usize = 2 * FS + 1;
pub const G2_LEN: usize = 4 * FS;
pub const GT_LEN: usize = 12 * FS;

/// Leading byte of every encoded G1 value (uncompressed form).
pub const G1_TAG: u8 = 0x04;

pub const MAX_IDENTITY_LEN: usize = 256;
pub const MAX_MESSAGE_LEN: usize = 12 * FS;
/// PINs live in `[0, MAX_PIN)`.
pub const MAX_PIN: u32 = 10_000;

pub const SECONDS_PER_DAY: u64 = 60 * 60 * 24;

pub const TAG_DST_ID: &str = "mpin.h2c.id";
pub const TAG_CHAL: &str = "mpin.chal";
pub const TAG_SEED: &str = "mpin.seed";
pub const TAG_AUTH: &str = "mpin.auth.v1";
pub const TAG_COMMIT: &str = "mpin.commit.v1";
