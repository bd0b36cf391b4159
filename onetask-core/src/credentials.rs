//! HTTP Basic credential encoding
//!
//! The backend re-authenticates every request from the `Authorization`
//! header; there is no server-side session to reference. The encoded
//! `Basic` value produced at login is therefore the client's opaque auth
//! token: it is persisted with the session and replayed verbatim on every
//! authorized request.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::{Error, Result};

/// Header scheme prefix for Basic credentials
pub const BASIC_PREFIX: &str = "Basic ";

/// Encode a username/password pair as an RFC 7617 `Authorization` value
pub fn basic_credentials(username: &str, password: &str) -> String {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    format!("{BASIC_PREFIX}{encoded}")
}

/// Decode a `Basic` `Authorization` value back into (username, password)
///
/// The password may itself contain `:`; only the first separator splits.
pub fn decode_basic(header: &str) -> Result<(String, String)> {
    let encoded = header
        .strip_prefix(BASIC_PREFIX)
        .ok_or(Error::MalformedCredentials)?;
    let decoded = STANDARD.decode(encoded)?;
    let decoded = String::from_utf8(decoded).map_err(|_| Error::MalformedCredentials)?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(Error::MalformedCredentials)?;
    Ok((username.to_string(), password.to_string()))
}
