//! Session token generation and hashing.

use rand::RngCore;
use sha2::{Digest, Sha256};

use super::hex_encode;

const TOKEN_BYTES: usize = 32;

/// A fresh random session token, hex-encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex_encode(&bytes)
}

/// Storage hash of a session token.
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
