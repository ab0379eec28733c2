//! JSON REST API for the Dojo challenge platform.
//!
//! Exposes an axum [`Router`] backed by any [`dojo_core::store::PlatformStore`]
//! and any [`dojo_exec::ExecutionService`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", dojo_api::api_router(state))
//! ```

pub mod auth;
pub mod challenges;
pub mod error;
pub mod feed;
pub mod follows;
pub mod profiles;
pub mod sessions;
pub mod solutions;
pub mod users;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;

use dojo_core::store::PlatformStore;
use dojo_exec::ExecutionService;

use auth::TokenConfig;
pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  /// HMAC secret for session tokens.
  pub token_secret: String,
  /// Base URL of the Piston-compatible execution service.
  pub exec_url:     String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, E> {
  pub store:  Arc<S>,
  pub exec:   Arc<E>,
  pub tokens: Arc<TokenConfig>,
}

impl<S, E> Clone for AppState<S, E> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      exec:   self.exec.clone(),
      tokens: self.tokens.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, E>(state: AppState<S, E>) -> Router<()>
where
  S: PlatformStore + 'static,
  E: ExecutionService + 'static,
{
  Router::new()
    // Registration and sessions (the only unauthenticated routes)
    .route(
      "/users",
      post(users::register::<S, E>).get(users::search::<S, E>),
    )
    .route("/sessions", post(sessions::login::<S, E>))
    // Profiles
    .route("/profile", get(profiles::own::<S, E>))
    .route("/profiles/{username}", get(profiles::by_username::<S, E>))
    // Social graph
    .route("/follows", post(follows::toggle::<S, E>))
    // Challenges
    .route(
      "/challenges",
      get(challenges::list::<S, E>).post(challenges::create::<S, E>),
    )
    .route("/challenges/{id}", get(challenges::get_one::<S, E>))
    .route("/challenges/{id}/submit", post(solutions::submit::<S, E>))
    // Feed and selection
    .route("/feed", get(feed::list::<S, E>))
    .route("/next-challenge", get(feed::next::<S, E>))
    // Solutions
    .route("/solutions", post(solutions::upsert::<S, E>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
