//! # API Route Modules
//!
//! - `form`: descriptor list and submission validation.

pub mod form;
