#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

//! M-PIN two-factor authentication over BLS12-381.
//!
//! Trust authorities each hold a master secret share and independently issue
//! client secret shares, time permit shares and server secret shares; the
//! shares are recombined by point addition. The client splits its secret
//! into a stored token and a memorized PIN, and proves knowledge of both with
//! a single message (or a commit/challenge/response exchange) that the
//! server checks with one pairing product.
//!
//! Fixed choices:
//! - Curve: BLS12-381, G1 for identities and client material, G2 for the server
//! - Hash to G1: RFC 9380 SSWU, domain tag `mpin.h2c.id`
//! - Identity hash: SHA-256 by default, selectable through [`HashType`]
//! - Randomness: ChaCha20 seeded from caller entropy or the OS

pub mod client;
pub mod config;
mod curve;
pub mod errors;
pub mod hashers;
pub mod permit;
pub mod rng;
pub mod ser;
pub mod server;
pub mod sharing;
pub mod token;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use mpin_primitives::{HashType, Octet};

pub use client::{client, client_1, client_2, ClientCommitment, ClientOutput, ClientRequest, PermitUse};
pub use config::{ClientConfig, ServerConfig};
pub use errors::{ErrorCode, MpinError, VerifyErr};
pub use hashers::{hash_challenge, hash_date_id, hash_id};
pub use permit::{client_permit_share, current_time, today};
pub use rng::{Csprng, SharedCsprng};
pub use ser::{decode_auth_message, decode_commit_message, encode_auth_message, encode_commit_message};
pub use server::{
    pin_error, recover_pin_error, server, server_2, server_challenge, ServerClock, ServerOutput,
};
pub use sharing::{
    client_secret_share, random_generate, recombine_all_g1, recombine_all_g2, recombine_g1,
    recombine_g2, server_secret_share,
};
pub use token::{extract_pin, restore_pin};
pub use types::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROTOCOL_VERSION: u32 = 1;
