//! Bearer-token issuance for authenticated test requests.
//!
//! Tokens are `subject.expiry.signature` where the signature is the
//! hex-encoded SHA-256 of `secret.subject.expiry`. This is test scaffolding,
//! not a general-purpose credential scheme: the verifying side is the test
//! server, which shares the same secret.

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};

/// Default token lifetime.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Issue a bearer token for `subject`, valid for [`TOKEN_TTL_SECS`].
pub fn issue_bearer_token(subject: &str, secret: &str) -> String {
    let expiry = (Utc::now() + Duration::seconds(TOKEN_TTL_SECS)).timestamp();
    format!("{subject}.{expiry}.{}", sign(subject, expiry, secret))
}

/// Check a token's signature and expiry against `secret`.
pub fn verify_bearer_token(token: &str, secret: &str) -> bool {
    // The subject may itself contain dots (emails), so split from the right.
    let mut parts = token.rsplitn(3, '.');
    let (Some(signature), Some(expiry), Some(subject)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let Ok(expiry) = expiry.parse::<i64>() else {
        return false;
    };

    if expiry < Utc::now().timestamp() {
        return false;
    }

    sign(subject, expiry, secret) == signature
}

fn sign(subject: &str, expiry: i64, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b".");
    hasher.update(subject.as_bytes());
    hasher.update(b".");
    hasher.update(expiry.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
