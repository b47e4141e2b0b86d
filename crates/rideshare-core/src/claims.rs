//! Bearer-token verification and claim extraction.
//!
//! Tokens are compact JWS strings signed with HMAC-SHA256 (`HS256`). The
//! decoder is a pure function of `(token, now, secret)`: it never consults a
//! clock or any other ambient state on its own.
//!
//! Decode order is fixed: structure, header, typed claims, expiry, and only
//! then the signature. An expired token therefore always reports
//! [`AuthenticationError::Expired`], whether or not its signature verifies.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{AuthenticationError, model::Id, role::Role};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

/// Default session length for issued tokens.
pub const DEFAULT_TTL_HOURS: i64 = 24;

// ─── Identity ────────────────────────────────────────────────────────────────

/// The authenticated caller, rebuilt from the token on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub subject_id: Id,
  pub role:       Role,
  pub issued_at:  DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct Header {
  alg: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  typ: Option<String>,
}

/// Claims carried in the token payload. `aud` holds the role name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub sub: Id,
  pub aud: String,
  pub exp: i64,
  pub iat: i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub iss: Option<String>,
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Verifies and mints tokens with a single shared secret.
#[derive(Clone)]
pub struct ClaimDecoder {
  secret: Vec<u8>,
  issuer: String,
  ttl:    TimeDelta,
}

impl std::fmt::Debug for ClaimDecoder {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ClaimDecoder")
      .field("issuer", &self.issuer)
      .field("ttl", &self.ttl)
      .finish_non_exhaustive()
  }
}

impl ClaimDecoder {
  pub fn new(secret: impl Into<Vec<u8>>) -> Self {
    Self {
      secret: secret.into(),
      issuer: "rideshare".to_owned(),
      ttl:    TimeDelta::hours(DEFAULT_TTL_HOURS),
    }
  }

  pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
    self.issuer = issuer.into();
    self
  }

  pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
    self.ttl = ttl;
    self
  }

  /// Verify `token` as of `now` and extract the caller's [`Identity`].
  pub fn decode(
    &self,
    token: &str,
    now: DateTime<Utc>,
  ) -> Result<Identity, AuthenticationError> {
    let mut segments = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
      segments.next(),
      segments.next(),
      segments.next(),
      segments.next(),
    ) else {
      return Err(malformed("expected three dot-separated segments"));
    };

    let header: Header = decode_json(header_b64, "header")?;
    if header.alg != ALGORITHM {
      return Err(malformed(format!("unsupported alg {:?}", header.alg)));
    }

    let claims: Claims = decode_json(payload_b64, "claims")?;
    let role = claims
      .aud
      .parse::<Role>()
      .map_err(|e| malformed(format!("aud: {e}")))?;
    let expires_at = timestamp(claims.exp, "exp")?;
    let issued_at = timestamp(claims.iat, "iat")?;

    if expires_at <= now {
      return Err(AuthenticationError::Expired);
    }

    let signature = B64
      .decode(signature_b64)
      .map_err(|e| malformed(format!("signature: {e}")))?;
    let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
    self
      .mac(signing_input.as_bytes())
      .verify_slice(&signature)
      .map_err(|_| AuthenticationError::InvalidSignature)?;

    Ok(Identity {
      subject_id: claims.sub,
      role,
      issued_at,
      expires_at,
    })
  }

  /// Mint a token for `subject` acting as `role`, valid for the configured
  /// TTL from `issued_at`.
  pub fn issue(&self, subject: Id, role: Role, issued_at: DateTime<Utc>) -> String {
    let claims = Claims {
      sub: subject,
      aud: role.as_str().to_owned(),
      exp: (issued_at + self.ttl).timestamp(),
      iat: issued_at.timestamp(),
      iss: Some(self.issuer.clone()),
    };
    self.sign_claims(&claims)
  }

  /// Sign arbitrary claims. Exposed for tooling and tests that need tokens
  /// with hand-picked timestamps.
  pub fn sign_claims(&self, claims: &Claims) -> String {
    let header = Header {
      alg: ALGORITHM.to_owned(),
      typ: Some("JWT".to_owned()),
    };
    // Serialising these plain structs cannot fail.
    let header = serde_json::to_vec(&header).unwrap_or_default();
    let payload = serde_json::to_vec(claims).unwrap_or_default();
    self.compose(&header, &payload)
  }

  fn compose(&self, header: &[u8], payload: &[u8]) -> String {
    let signing_input = format!("{}.{}", B64.encode(header), B64.encode(payload));
    let signature = self.mac(signing_input.as_bytes()).finalize().into_bytes();
    format!("{signing_input}.{}", B64.encode(signature))
  }

  fn mac(&self, data: &[u8]) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(&self.secret)
      .expect("HMAC can take key of any size");
    mac.update(data);
    mac
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn malformed(reason: impl Into<String>) -> AuthenticationError {
  AuthenticationError::Malformed(reason.into())
}

fn decode_json<T: serde::de::DeserializeOwned>(
  segment: &str,
  what: &str,
) -> Result<T, AuthenticationError> {
  let bytes = B64
    .decode(segment)
    .map_err(|e| malformed(format!("{what}: {e}")))?;
  serde_json::from_slice(&bytes).map_err(|e| malformed(format!("{what}: {e}")))
}

fn timestamp(secs: i64, claim: &str) -> Result<DateTime<Utc>, AuthenticationError> {
  DateTime::from_timestamp(secs, 0)
    .ok_or_else(|| malformed(format!("{claim} out of range")))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn decoder() -> ClaimDecoder { ClaimDecoder::new("test-secret") }

  fn at(secs: i64) -> DateTime<Utc> { DateTime::from_timestamp(secs, 0).unwrap() }

  fn claims(exp: i64) -> Claims {
    Claims {
      sub: 42,
      aud: "user".into(),
      exp,
      iat: 1_000,
      iss: None,
    }
  }

  #[test]
  fn issued_token_decodes_to_identity() {
    let d = decoder();
    let token = d.issue(7, Role::Admin, at(1_000));
    let id = d.decode(&token, at(2_000)).unwrap();
    assert_eq!(id.subject_id, 7);
    assert_eq!(id.role, Role::Admin);
    assert_eq!(id.issued_at, at(1_000));
    assert_eq!(id.expires_at, at(1_000 + DEFAULT_TTL_HOURS * 3600));
  }

  #[test]
  fn expiry_at_now_is_expired() {
    let d = decoder();
    let token = d.sign_claims(&claims(5_000));
    assert_eq!(d.decode(&token, at(5_000)), Err(AuthenticationError::Expired));
    assert!(d.decode(&token, at(4_999)).is_ok());
  }

  #[test]
  fn expired_wins_over_bad_signature() {
    let token = ClaimDecoder::new("other-secret").sign_claims(&claims(5_000));
    assert_eq!(
      decoder().decode(&token, at(6_000)),
      Err(AuthenticationError::Expired)
    );
  }

  #[test]
  fn wrong_secret_is_rejected() {
    let token = ClaimDecoder::new("other-secret").sign_claims(&claims(5_000));
    assert_eq!(
      decoder().decode(&token, at(2_000)),
      Err(AuthenticationError::InvalidSignature)
    );
  }

  #[test]
  fn tampered_payload_is_rejected() {
    let d = decoder();
    let token = d.sign_claims(&claims(5_000));
    let forged = B64.encode(
      serde_json::to_vec(&Claims {
        aud: "admin".into(),
        ..claims(5_000)
      })
      .unwrap(),
    );
    let mut parts: Vec<&str> = token.split('.').collect();
    parts[1] = &forged;
    let forged_token = parts.join(".");
    assert_eq!(
      d.decode(&forged_token, at(2_000)),
      Err(AuthenticationError::InvalidSignature)
    );
  }

  #[test]
  fn missing_subject_is_malformed() {
    let d = decoder();
    let token = d.compose(
      br#"{"alg":"HS256","typ":"JWT"}"#,
      br#"{"aud":"user","exp":5000,"iat":1000}"#,
    );
    assert!(matches!(
      d.decode(&token, at(2_000)),
      Err(AuthenticationError::Malformed(_))
    ));
  }

  #[test]
  fn mistyped_subject_is_malformed() {
    let d = decoder();
    let token = d.compose(
      br#"{"alg":"HS256"}"#,
      br#"{"sub":"42","aud":"user","exp":5000,"iat":1000}"#,
    );
    assert!(matches!(
      d.decode(&token, at(2_000)),
      Err(AuthenticationError::Malformed(_))
    ));
  }

  #[test]
  fn unknown_role_is_malformed() {
    let d = decoder();
    let token = d.sign_claims(&Claims {
      aud: "root".into(),
      ..claims(5_000)
    });
    assert!(matches!(
      d.decode(&token, at(2_000)),
      Err(AuthenticationError::Malformed(_))
    ));
  }

  #[test]
  fn alg_none_is_malformed() {
    let d = decoder();
    let token = d.compose(
      br#"{"alg":"none"}"#,
      br#"{"sub":42,"aud":"admin","exp":5000,"iat":1000}"#,
    );
    assert!(matches!(
      d.decode(&token, at(2_000)),
      Err(AuthenticationError::Malformed(_))
    ));
  }

  #[test]
  fn garbage_is_malformed() {
    let d = decoder();
    for token in ["", "abc", "a.b", "a.b.c.d", "!!!.???.***"] {
      assert!(
        matches!(d.decode(token, at(0)), Err(AuthenticationError::Malformed(_))),
        "{token:?}"
      );
    }
  }
}
