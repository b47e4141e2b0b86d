//! Core types and decision logic for the rideshare marketplace.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! decides *who* may act ([`guard`]) and *whether* a proposed state is
//! consistent ([`validate`]); it never persists anything itself. Storage
//! backends implement [`store::RideshareStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod capacity;
pub mod claims;
pub mod error;
pub mod guard;
pub mod model;
pub mod role;
pub mod store;
pub mod validate;

pub use error::{
  AuthenticationError, AuthorizationError, Error, Result, ValidationError,
  ValidationKind,
};
