//! Identity — a registered user record.
//!
//! Identities are created at registration and never deleted. Username and
//! email are unique across the store (enforced by unique indexes in the
//! backend, surfaced as typed errors there).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, error::MIN_PASSWORD_LEN};

/// A full identity row. The credential hash never leaves the process: the
/// struct is serialise-only and the hash field is skipped.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
  pub identity_id:     Uuid,
  pub name:            String,
  pub username:        String,
  pub email:           String,
  #[serde(skip_serializing)]
  pub credential_hash: String,
  pub created_at:      DateTime<Utc>,
}

/// Lightweight projection used in follower/following lists — everything a
/// profile page shows about a related user, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRef {
  pub identity_id: Uuid,
  pub name:        String,
  pub username:    String,
  pub email:       String,
}

impl From<&Identity> for IdentityRef {
  fn from(identity: &Identity) -> Self {
    Self {
      identity_id: identity.identity_id,
      name:        identity.name.clone(),
      username:    identity.username.clone(),
      email:       identity.email.clone(),
    }
  }
}

/// Store-facing input: the credential has already been hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub name:            String,
  pub username:        String,
  pub email:           String,
  pub credential_hash: String,
}

/// Raw registration input, validated before the password is hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
  pub name:     String,
  pub username: String,
  pub email:    String,
  pub password: String,
}

impl Registration {
  /// Boundary validation: non-empty name and username, a plausible email,
  /// and a minimum password length.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyField("name"));
    }
    if self.username.trim().is_empty() {
      return Err(Error::EmptyField("username"));
    }
    if !plausible_email(&self.email) {
      return Err(Error::InvalidEmail(self.email.clone()));
    }
    if self.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(Error::PasswordTooShort);
    }
    Ok(())
  }
}

/// `local@domain.tld` with a non-empty local part and a dot in the domain.
fn plausible_email(email: &str) -> bool {
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.starts_with('.') || domain.ends_with('.') {
    return false;
  }
  domain.contains('.') && !domain.contains('@') && !domain.contains(' ')
}
