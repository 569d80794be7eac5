//! # dform-client — Descriptor Client and Form Session
//!
//! Client side of the dynamic form: fetch the descriptor list once, build
//! the validation schema from it, and hold the values a user enters.
//!
//! - [`DescriptorClient`] talks to the service over HTTP (`reqwest`).
//! - [`FormSession`] is the per-form state machine
//!   (`Loading` → `Ready` | `Failed`). It is plain data mutated through
//!   `&mut self`; validation runs synchronously in memory.
//!
//! ## Crate Policy
//!
//! - Fetch failures are reported once and make the session terminal. No
//!   retries.
//! - Validation failures are values, never errors or panics.

pub mod client;
pub mod error;
pub mod session;

pub use client::{ClientConfig, DescriptorClient, SubmitResponse};
pub use error::{FetchError, SessionError};
pub use session::{FormSession, SessionState, Submission};
