//! Ledger API Errors
//!
//! Error classification and response shaping for the ledger platform's API
//! boundary. Any error produced by a subsystem (accounts, transaction
//! building, block signing, access tokens, queries, the mock HSM) is
//! resolved to a stable, versioned error code, an HTTP status, a message,
//! optional detail, and a retry hint.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │  ApiError, handlers, auth/rate/timeout layer │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │     Error registry, classifier, config       │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │  Sentinel errors, wrapping, response types   │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │          Tracing and metrics setup           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use ledger_api_errors::app::classify;
//! use ledger_api_errors::domain::{AccountError, ErrorExt};
//!
//! let err = AccountError::Reserved
//!     .wrap("building transfer")
//!     .with_detail("asset 8f2c has no unreserved outputs");
//!
//! let (body, entry) = classify(&err);
//! assert_eq!(entry.http_status, 400);
//! assert_eq!(body.code, "CH761");
//! assert_eq!(body.detail, "asset 8f2c has no unreserved outputs");
//! assert!(body.temporary);
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
