//! Bearer-token payload inspection.
//!
//! Decoding is deliberately lenient. A token that is not a three-segment
//! JWT — opaque or encrypted credentials included — is "undecodable",
//! which is a different outcome from "decodable but expired": undecodable
//! tokens are deferred to backend verification instead of being rejected
//! locally.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::Deserialize;

/// Claims of interest in a decodable token payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiry instant, whole seconds since epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the payload segment of a three-segment token. `None` when the
/// token has fewer than three segments or the payload is not base64 JSON.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    segments.next()?;

    // Real JWTs use the URL-safe alphabet; some issuers still pad with the
    // standard one.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD.decode(payload))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether the token is locally known to be expired at `now_ms`.
///
/// Pure in (token, now). Undecodable tokens and payloads without `exp` are
/// treated as not expired and left for the backend to judge.
pub fn is_expired(token: &str, now_ms: i64) -> bool {
    match decode_claims(token) {
        Some(TokenClaims { exp: Some(exp) }) => now_ms >= exp.saturating_mul(1000),
        _ => false,
    }
}

/// Current wall-clock instant in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
