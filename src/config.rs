use mpin_primitives::HashType;

/// Client-side protocol switches. Must agree with the server's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientConfig {
    pub hash_type: HashType,
    /// Send only the hashed identity.
    pub anonymous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServerConfig {
    pub hash_type: HashType,
    /// Expect hashed identity claims instead of raw identities.
    pub anonymous: bool,
    /// Maximum distance in seconds between the client's time value and ours.
    pub max_clock_skew_secs: u32,
    /// Days either side of today on which a time permit is still honoured.
    pub permit_tolerance_days: u32,
    pub require_time_permit: bool,
    /// Reject messages that carry no signed payload.
    pub require_message: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hash_type: HashType::default(),
            anonymous: false,
            max_clock_skew_secs: 60,
            permit_tolerance_days: 0,
            require_time_permit: false,
            require_message: false,
        }
    }
}

impl ServerConfig {
    /// A server configuration matching `client`'s mode.
    #[must_use]
    pub fn for_client(client: ClientConfig) -> Self {
        Self { hash_type: client.hash_type, anonymous: client.anonymous, ..Self::default() }
    }
}
