//! Session token generation
//!
//! Tokens are 32 bytes from the OS CSPRNG, encoded as URL-safe base64 without
//! padding, so they are safe to carry in a cookie or a bearer header as-is.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

/// Number of random bytes in a session token
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Encoded length of a session token
pub const SESSION_TOKEN_LENGTH: usize = 43;

/// Generate a fresh, unguessable session token
#[must_use]
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Cheap shape check used to skip store lookups for values that could never
/// have been issued
#[must_use]
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LENGTH
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
