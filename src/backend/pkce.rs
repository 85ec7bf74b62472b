//! PKCE verifier/challenge pairs for the OAuth and magic-link flows.
//!
//! The verifier stays with the client; only the S256 challenge travels with
//! the authorize request. The auth server later checks the verifier presented
//! at code exchange against that challenge.

use std::fmt::Write;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use sha2::{Digest, Sha256};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

/// Fresh pair with a 64-char hex verifier from 32 random bytes.
#[must_use]
pub fn generate() -> PkcePair {
    let bytes: [u8; 32] = rand::rng().random();
    let verifier = bytes_to_hex(&bytes);
    let challenge = challenge_for(&verifier);
    PkcePair { verifier, challenge }
}

/// Random 32-char hex id tying a callback to the verifier that started it.
#[must_use]
pub fn flow_id() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// `BASE64URL(SHA256(verifier))` without padding.
#[must_use]
pub fn challenge_for(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

#[cfg(test)]
#[path = "pkce_test.rs"]
mod tests;
