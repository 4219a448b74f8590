//! End-to-end integration tests for the M-PIN engine.
//!
//! The tests run the full lifecycle across two trust authorities: share
//! issuance, recombination, PIN extraction, time permits and both protocol
//! variants, including the wire encoding in between.

#![forbid(unsafe_code)]
