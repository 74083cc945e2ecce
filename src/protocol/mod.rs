//! Wire Protocol
//!
//! The keyed-mutex protocol the daemon speaks with its clients: fixed-width
//! binary keys inbound, single-byte replies outbound. See [`types`] for the
//! exact format.
//!
//! Compatibility with existing clients is a correctness concern, so the
//! constants here are the protocol: any byte the server sends other than
//! [`OWNER_REPLY`] or [`RELEASE_BYTE`] is not defined.

pub mod types;

pub use types::{Key, KEY_SIZE, OWNER_REPLY, RELEASE_BYTE};
