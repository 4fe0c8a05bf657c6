//! Credential and session token utilities

mod password;
mod token;

pub use password::{
    hash_password, validate_password_strength, verify_password, PasswordService,
    MIN_PASSWORD_LENGTH,
};
pub use token::{
    generate_session_token, is_well_formed_token, SESSION_TOKEN_BYTES, SESSION_TOKEN_LENGTH,
};
