//! Credential handling: argon2 password hashes, HS256 session tokens, and
//! the `Authenticated` request extractor.
//!
//! Tokens are accepted from `Authorization: Bearer <token>` or from a
//! `token` cookie (the login handler sets the cookie so browser clients work
//! without extra plumbing).

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dojo_core::{identity::Identity, store::PlatformStore};
use dojo_exec::ExecutionService;

use crate::{AppState, error::ApiError};

/// Token lifetime. The platform has no refresh flow; sessions simply live
/// this long.
const TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Signing configuration for session tokens.
#[derive(Clone)]
pub struct TokenConfig {
  /// HMAC-SHA256 secret used to sign and verify tokens.
  pub secret: String,
}

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  /// The identity's id.
  pub sub:   Uuid,
  pub email: String,
  pub iat:   i64,
  pub exp:   i64,
}

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::BadRequest(format!("cannot hash password: {e}")))
}

/// Verify a password against a stored PHC string. A malformed stored hash
/// counts as a mismatch.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// Issue a signed session token for `identity`.
pub fn issue_token(
  identity: &Identity,
  config: &TokenConfig,
) -> Result<String, ApiError> {
  let now = Utc::now().timestamp();
  let claims = Claims {
    sub:   identity.identity_id,
    email: identity.email.clone(),
    iat:   now,
    exp:   now + TOKEN_TTL_SECS,
  };

  encode(
    &Header::default(), // HS256
    &claims,
    &EncodingKey::from_secret(config.secret.as_bytes()),
  )
  .map_err(|e| ApiError::BadRequest(format!("cannot issue token: {e}")))
}

/// Validate a token's signature and expiry and return its claims.
pub fn verify_token(
  token: &str,
  config: &TokenConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
  let data = decode::<Claims>(
    token,
    &DecodingKey::from_secret(config.secret.as_bytes()),
    &Validation::default(),
  )?;
  Ok(data.claims)
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Present in a handler's signature means the request carried a valid token.
pub struct Authenticated {
  pub identity_id: Uuid,
  pub email:       String,
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::to_owned)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
  headers
    .get(header::COOKIE)
    .and_then(|v| v.to_str().ok())?
    .split("; ")
    .find_map(|pair| pair.strip_prefix("token="))
    .map(str::to_owned)
}

impl<S, E> FromRequestParts<AppState<S, E>> for Authenticated
where
  S: PlatformStore + 'static,
  E: ExecutionService + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, E>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)
      .or_else(|| cookie_token(&parts.headers))
      .ok_or(ApiError::Unauthorized)?;

    let claims = verify_token(&token, &state.tokens)
      .map_err(|_| ApiError::Unauthorized)?;

    Ok(Authenticated {
      identity_id: claims.sub,
      email:       claims.email,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn password_hash_verifies_and_rejects() {
    let phc = hash_password("hunter2").unwrap();
    assert!(verify_password("hunter2", &phc));
    assert!(!verify_password("wrong", &phc));
    assert!(!verify_password("hunter2", "not-a-phc-string"));
  }

  #[test]
  fn token_roundtrip_preserves_claims() {
    let config = TokenConfig { secret: "test-secret".into() };
    let identity = Identity {
      identity_id:     Uuid::new_v4(),
      name:            "Alice".into(),
      username:        "alice".into(),
      email:           "alice@example.com".into(),
      credential_hash: String::new(),
      created_at:      Utc::now(),
    };

    let token = issue_token(&identity, &config).unwrap();
    let claims = verify_token(&token, &config).unwrap();
    assert_eq!(claims.sub, identity.identity_id);
    assert_eq!(claims.email, "alice@example.com");
  }

  #[test]
  fn token_signed_with_another_secret_is_rejected() {
    let config = TokenConfig { secret: "test-secret".into() };
    let other  = TokenConfig { secret: "other-secret".into() };
    let identity = Identity {
      identity_id:     Uuid::new_v4(),
      name:            "Alice".into(),
      username:        "alice".into(),
      email:           "alice@example.com".into(),
      credential_hash: String::new(),
      created_at:      Utc::now(),
    };

    let token = issue_token(&identity, &config).unwrap();
    assert!(verify_token(&token, &other).is_err());
  }

  #[test]
  fn cookie_and_bearer_parsing() {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, "theme=dark; token=abc.def.ghi".parse().unwrap());
    assert_eq!(cookie_token(&headers).as_deref(), Some("abc.def.ghi"));

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, "Bearer xyz".parse().unwrap());
    assert_eq!(bearer_token(&headers).as_deref(), Some("xyz"));
    assert_eq!(cookie_token(&headers), None);
  }
}
