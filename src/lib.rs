//! Mutating admission webhook that injects node tolerations into pods
//!
//! The API server POSTs an AdmissionReview to `/mutate`; the webhook answers
//! with an AdmissionResponse carrying a JSON-Patch that replaces
//! `/spec/tolerations` with the pod's existing tolerations plus the
//! configured ones. Non-pod objects are denied inside the admission protocol,
//! transport-level problems are rejected with HTTP 400. TLS termination and
//! webhook registration are external concerns.

#![deny(missing_docs)]

/// Admission review request/response envelope
pub mod admission;
/// Webhook configuration (tolerations to enforce)
pub mod config;
/// Error types for the webhook
pub mod error;
/// Mutation deciders, one per supported admission use-case
pub mod mutate;
/// JSON-Patch construction for the tolerations field
pub mod patch;
/// Minimal view of the admitted object
pub mod pod;
/// HTTP dispatcher: router, state, and the `/mutate` handler
pub mod webhook;
