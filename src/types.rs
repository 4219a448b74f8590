use core::convert::TryFrom;
use core::fmt;

use mpin_primitives::{ct_eq, Octet};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::MpinError;

pub use mpin_primitives::constants::{
    FS, G1_LEN, G1_TAG, G2_LEN, GS, GT_LEN, MAX_IDENTITY_LEN, MAX_MESSAGE_LEN, MAX_PIN,
};

// Fixed-size newtypes prevent misuse. Secret ones compare in constant time,
// never print their bytes and zero themselves on drop.
macro_rules! byte_type {
    (@common $name:ident, $len:expr) => {
        impl $name {
            pub const LEN: usize = $len;

            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub(crate) const fn from_array(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Write the encoding into `out`, failing if its capacity is too small.
            pub fn write_to(&self, out: &mut Octet) -> Result<(), MpinError> {
                out.write(&self.0)?;
                Ok(())
            }

            pub fn from_octet(octet: &Octet) -> Result<Self, MpinError> {
                Self::try_from(octet.as_bytes())
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = MpinError;
            fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
                if b.len() != $len {
                    return Err(MpinError::InvalidLength { expected: $len, got: b.len() });
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(b);
                Ok(Self(arr))
            }
        }
    };
    ($(#[$doc:meta])* secret $name:ident, $len:expr) => {
        $(#[$doc])*
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct $name([u8; $len]);

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                ct_eq(&self.0, &other.0)
            }
        }
        impl Eq for $name {}

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(..)"))
            }
        }

        byte_type!(@common $name, $len);
    };
    ($(#[$doc:meta])* public $name:ident, $len:expr) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name([u8; $len]);

        byte_type!(@common $name, $len);
    };
}

byte_type!(
    /// Hash of a raw identity, identical on every participant.
    public HashedIdentity, FS
);
byte_type!(
    /// `H1(hid)` or `HID + H1(date || hid)`, as recomputed by the server.
    public IdentityPoint, G1_LEN
);
byte_type!(
    /// `UT`: the ephemeral commitment `x·HID` (or `x·HTID` with a time permit).
    public Commitment, G1_LEN
);
byte_type!(
    /// `SEC` / `V`: `−(x+y)·T`, the value proving knowledge of the secret.
    public Proof, G1_LEN
);
byte_type!(
    /// `Y`: the challenge scalar.
    public Challenge, GS
);
byte_type!(
    /// Compressed target-group element (`E`, `F` of the PIN-error diagnosis).
    public PairingValue, GT_LEN
);

byte_type!(
    /// One authority's master secret scalar. Never combined with other shares.
    secret MasterSecretShare, GS
);
byte_type!(secret ClientSecretShare, G1_LEN);
byte_type!(
    /// Sum of all authorities' client secret shares for one identity.
    secret ClientSecret, G1_LEN
);
byte_type!(
    /// Client secret with the PIN-derived component subtracted.
    secret Token, G1_LEN
);
byte_type!(secret TimePermitShare, G1_LEN);
byte_type!(
    /// Sum of time permit shares, valid for one date only.
    secret TimePermit, G1_LEN
);
byte_type!(secret ServerSecretShare, G2_LEN);
byte_type!(
    /// Sum of all authorities' server secret shares.
    secret ServerSecret, G2_LEN
);
byte_type!(
    /// `X`: the per-attempt random scalar.
    secret EphemeralScalar, GS
);

/// G1 material produced per authority and recombined by point addition.
pub trait G1Share {
    type Combined;

    fn share_bytes(&self) -> &[u8; G1_LEN];

    #[doc(hidden)]
    fn combined(bytes: [u8; G1_LEN]) -> Self::Combined;
}

impl G1Share for ClientSecretShare {
    type Combined = ClientSecret;

    fn share_bytes(&self) -> &[u8; G1_LEN] {
        self.as_bytes()
    }

    fn combined(bytes: [u8; G1_LEN]) -> ClientSecret {
        ClientSecret::from_array(bytes)
    }
}

impl G1Share for TimePermitShare {
    type Combined = TimePermit;

    fn share_bytes(&self) -> &[u8; G1_LEN] {
        self.as_bytes()
    }

    fn combined(bytes: [u8; G1_LEN]) -> TimePermit {
        TimePermit::from_array(bytes)
    }
}

/// How the client identifies itself to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentityClaim {
    /// Raw identity bytes.
    Plain(Vec<u8>),
    /// Anonymous mode: only the hashed identity travels.
    Hashed(HashedIdentity),
}

/// Single-pass authentication message, client to server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthMessage {
    pub claim: IdentityClaim,
    pub ut: Commitment,
    pub sec: Proof,
    /// Date the time permit was issued for; `None` when no permit is used.
    pub date: Option<u32>,
    pub time: u32,
    /// Extra message bound into the challenge transcript.
    pub message: Option<Vec<u8>>,
}

/// First message of the multi-pass variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitMessage {
    pub claim: IdentityClaim,
    pub ut: Commitment,
    pub date: Option<u32>,
}
