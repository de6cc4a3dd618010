//! Completion callbacks: the payload posted when a job ends, and its signature.
//!
//! The signature travels in the [`SIGNATURE_HEADER`] header as
//! `sha256=<lowercase hex HMAC-SHA256 of the raw body>`. Receivers recompute
//! it over the bytes they received, not over a re-serialized value.

pub mod payload;
pub mod signer;

pub use payload::WebhookPayload;
pub use signer::{SIGNATURE_PREFIX, sign, verify};

/// Header carrying the payload signature. Absent when no secret is configured.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";
